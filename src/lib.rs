pub mod client;
pub mod config;
pub mod error;
pub mod proxy;
pub mod routes;

pub use client::RelayClient;
pub use config::{Config, ResponseMode};
pub use error::RelayError;
pub use proxy::{execute_request, ProxyResult, RequestSpec};
pub use routes::{router, AppState};
