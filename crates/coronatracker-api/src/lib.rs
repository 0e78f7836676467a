// coronatracker-api: Async Rust client for the COVID-19 statistics API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::StatsClient;
pub use error::Error;
pub use transport::TransportConfig;
