//! External system integrations for Merkur.
//!
//! This module provides the adapters that isolate external dependencies
//! behind traits so the core pipeline can be tested without a live
//! store:
//!
//! - [`source`] - Relational data source abstraction and implementations
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern**: the engine only ever talks to
//! [`source::RelationalSource`]; the PostgreSQL implementation is wired in
//! by the CLI, the in-memory implementation by tests.
//!
//! ```rust,no_run
//! use merkur::adapters::source::{PostgresClient, PostgresSource};
//! use merkur::config::schema::DatabaseConfig;
//!
//! # fn example() -> merkur::domain::Result<()> {
//! let config = DatabaseConfig {
//!     connection_string: "postgresql://merkur@localhost:5432/sales".to_string(),
//!     ..Default::default()
//! };
//!
//! let client = PostgresClient::new(config)?;
//! let source = PostgresSource::new(client);
//! // Hand the source to the export service
//! # Ok(())
//! # }
//! ```

pub mod source;
