// magicly-api: Async Rust client for the Samsung MagicInfo Server REST API

pub mod auth;
pub mod error;
pub mod rest;
pub mod transport;

pub use auth::{AuthSession, Credentials, TOKEN_TTL};
pub use error::Error;
pub use rest::MagicInfoClient;
pub use rest::models::{
    BatchResult, DashboardStatus, DeviceFilterRequest, DeviceSummary, DeviceType,
};
pub use transport::{TlsMode, TransportConfig};
