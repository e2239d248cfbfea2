//! Storage seams used by the HTTP layer.
//!
//! Each trait has an in-memory implementation for dev/tests and a Postgres
//! implementation selected at startup when a database URL is configured.

pub mod accounts;
pub mod children;
pub mod error;
pub mod postgres;

pub use accounts::{AccountStore, InMemoryAccountStore};
pub use children::{ChildStore, InMemoryChildStore};
pub use error::StoreError;
pub use postgres::{PostgresStore, connect_postgres};
