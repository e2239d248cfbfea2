use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of account. Copied into session claims at login.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Parent,
    Teacher,
    School,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Parent, Role::Teacher, Role::School];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Parent => "parent",
            Role::Teacher => "teacher",
            Role::School => "school",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}' (expected one of: parent, teacher, school)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles_only() {
        assert_eq!("parent".parse::<Role>().unwrap(), Role::Parent);
        assert_eq!("school".parse::<Role>().unwrap(), Role::School);
        assert!("admin".parse::<Role>().is_err());
        assert!("Parent".parse::<Role>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"teacher\"");
        let role: Role = serde_json::from_str("\"school\"").unwrap();
        assert_eq!(role, Role::School);
        assert!(serde_json::from_str::<Role>("\"principal\"").is_err());
    }
}
