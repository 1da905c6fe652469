// Network layer: route configuration, the fetch-backed API client, and the
// typed response payloads the panels decode.
pub mod api_client;
pub mod config;
pub mod responses;

pub use api_client::ApiClient;
pub use config::ApiConfig;
