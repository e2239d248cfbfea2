//! `lumora-core`: domain building blocks shared by every Lumora crate.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod child;
pub mod error;
pub mod id;
pub mod validation;
pub mod value_object;

pub use child::{ChildRecord, ProgressSnapshot};
pub use error::DomainError;
pub use id::{AccountId, ChildId};
pub use validation::{validate_display_name, validate_password_strength};
pub use value_object::Email;
