//! `lumora-auth`: the credential and access gate.
//!
//! Password hashing, bearer-token issuance/verification, the static API-key
//! check and role-based authorization. This crate is intentionally decoupled
//! from HTTP and storage: everything it needs is injected at construction.

pub mod account;
pub mod api_key;
pub mod authorize;
pub mod claims;
pub mod gate;
pub mod password;
pub mod permissions;
pub mod roles;
pub mod token;

pub use account::Account;
pub use api_key::{StaticKey, StaticKeyError};
pub use authorize::{authorize, AuthzError, Principal};
pub use claims::{validate_claims, ClaimsValidationError, SessionClaims};
pub use gate::{CredentialGate, GateConfig};
pub use password::{CredentialError, PasswordHash, PasswordHasher, DEFAULT_COST};
pub use permissions::Permission;
pub use roles::{Role, UnknownRole};
pub use token::{
    IssuedToken, SigningKey, SigningKeyError, SigningKeys, TokenError, TokenService,
    TokenValidator, TOKEN_TTL_SECONDS,
};
