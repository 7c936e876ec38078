//! HTTP fizzbuzz service that counts how often each request signature is seen.

pub mod configuration;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query_params;
pub mod server;
pub mod signature;
pub mod stats;
