// eetly-api: Async Rust client for the Eetlijst GraphQL API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{DEFAULT_ENDPOINT, GraphqlClient};
pub use error::Error;
pub use transport::TransportConfig;
