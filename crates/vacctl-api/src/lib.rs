// vacctl-api: Async HTTP client and wire models for Valetudo vacuum firmware
//
// Two firmware generations are supported side by side: the legacy flat
// JSON API (`/api/current_status`, one endpoint per action) and the v2
// attribute/capability API (`/api/v2/robot/...`). This crate only knows
// how to move bytes and decode raw wire shapes; canonical state lives in
// `vacctl-core`.

pub mod client;
pub mod error;
pub mod legacy;
pub mod modern;
pub mod transport;

pub use client::HttpClient;
pub use error::Error;
pub use transport::{ApiRequest, BasicAuth, Transport, TransportConfig};
