// MagicInfo REST v2.0 client modules
//
// Hand-written client for the `MagicInfo/restapi/v2.0/` endpoints, all of
// which (except `auth`) wrap their payload in the
// `{ status: "Success", items: ... }` envelope.

pub mod auth;
pub mod client;
pub mod dashboard;
pub mod devices;
pub mod display;
pub mod models;

pub use client::MagicInfoClient;
