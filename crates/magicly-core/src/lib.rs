//! Polling adapter between `magicly-api` and a host monitoring platform.
//!
//! This crate owns the caching, presentation, and control logic for a
//! MagicInfo-managed display fleet:
//!
//! - **[`Adapter`]**: central facade. Host calls
//!   ([`list_aggregated`](Adapter::list_aggregated),
//!   [`get_statistics`](Adapter::get_statistics),
//!   [`apply_control`](Adapter::apply_control)) read a cached snapshot and
//!   never wait on a bulk refresh; one background worker refreshes it on a
//!   cool-down and pauses when the host stops polling.
//!
//! - **[`FleetSnapshot`]**: raw per-device field bags, replaced device by
//!   device on each refresh and pruned only when the monitored set shrinks.
//!
//! - **Presentation** ([`presentation`]): formats raw values, translates
//!   server codes through the [`tables`], and decorates each device with the
//!   control affordances listed in the [`registry`].
//!
//! - **Control protocol** ([`control`]): validates host input, writes whole
//!   composite settings groups, and confirms the write with a bounded poll.

pub mod adapter;
pub mod config;
pub mod control;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod model;
pub mod ping;
pub mod presentation;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod tables;

// ── Primary re-exports ──────────────────────────────────────────────
pub use adapter::Adapter;
pub use config::{AdapterConfig, DeviceFilters, PingConfig, RefreshTuning, TlsVerification};
pub use control::ControlEntry;
pub use error::CoreError;
pub use store::{FleetSnapshot, RefreshState};

pub use model::{
    ControlAffordance, ControlKind, DeviceId, DeviceRecord, DeviceType, PresentedDevice,
    RawProperties,
};

pub use magicly_api::Credentials;
