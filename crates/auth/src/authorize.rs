use thiserror::Error;

use lumora_core::AccountId;

use crate::{Permission, Role, SessionClaims};

/// An authenticated caller, as asserted by verified session claims.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Principal {
    pub account_id: AccountId,
    pub role: Role,
}

impl From<&SessionClaims> for Principal {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            account_id: claims.sub,
            role: claims.role,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: role '{role}' lacks permission '{permission}'")]
    Forbidden { role: Role, permission: Permission },
}

/// Authorize a principal for a permission.
///
/// - No IO
/// - No panics
/// - Uses the role carried by the claims (may be stale until token expiry)
pub fn authorize(principal: &Principal, required: Permission) -> Result<(), AuthzError> {
    if Permission::granted_to(principal.role).contains(&required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            role: principal.role,
            permission: required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> Principal {
        Principal {
            account_id: AccountId::new(),
            role,
        }
    }

    #[test]
    fn parent_can_create_children() {
        assert!(authorize(&principal(Role::Parent), Permission::ChildrenCreate).is_ok());
    }

    #[test]
    fn school_and_teacher_cannot_create_children() {
        for role in [Role::School, Role::Teacher] {
            let err = authorize(&principal(role), Permission::ChildrenCreate).unwrap_err();
            assert_eq!(
                err,
                AuthzError::Forbidden {
                    role,
                    permission: Permission::ChildrenCreate
                }
            );
        }
    }

    #[test]
    fn parent_and_school_can_read_and_record_progress() {
        for role in [Role::Parent, Role::School] {
            assert!(authorize(&principal(role), Permission::ChildrenRead).is_ok());
            assert!(authorize(&principal(role), Permission::ProgressWrite).is_ok());
        }
    }

    #[test]
    fn teacher_holds_no_child_permissions() {
        assert!(Permission::granted_to(Role::Teacher).is_empty());
        for permission in [Permission::ChildrenRead, Permission::ProgressWrite] {
            assert!(authorize(&principal(Role::Teacher), permission).is_err());
        }
    }
}
