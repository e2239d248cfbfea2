use lumora_auth::{Principal, Role, SessionClaims};
use lumora_core::AccountId;

/// Principal context for a request (authenticated identity + role).
///
/// Inserted by the token middleware; absent in API-key mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn account_id(&self) -> AccountId {
        self.principal.account_id
    }

    pub fn role(&self) -> Role {
        self.principal.role
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}

impl From<&SessionClaims> for PrincipalContext {
    fn from(claims: &SessionClaims) -> Self {
        Self::new(Principal::from(claims))
    }
}
