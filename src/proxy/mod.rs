pub mod executor;
pub mod response_builder;
pub mod service;
pub mod types;

pub use executor::execute_request;
pub use response_builder::{build_result, format_size, is_truthy, parse_body, response_size};
pub use service::{HttpUpstreamService, UpstreamService};
pub use types::*;
