//! PostgreSQL data source adapter

pub mod adapter;
pub mod client;

pub use adapter::PostgresSource;
pub use client::PostgresClient;
