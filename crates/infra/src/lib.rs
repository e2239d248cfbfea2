//! Infrastructure layer: account and child-record persistence.

pub mod store;

pub use store::{
    AccountStore, ChildStore, InMemoryAccountStore, InMemoryChildStore, PostgresStore, StoreError,
    connect_postgres,
};
