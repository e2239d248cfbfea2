use serde::{Deserialize, Serialize};

use crate::Role;

/// Permission identifier checked at the route boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "children.create")]
    ChildrenCreate,
    #[serde(rename = "children.read")]
    ChildrenRead,
    #[serde(rename = "progress.write")]
    ProgressWrite,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ChildrenCreate => "children.create",
            Permission::ChildrenRead => "children.read",
            Permission::ProgressWrite => "progress.write",
        }
    }

    /// Static role policy. Only parents register children. Child records link a
    /// parent and a school, never a teacher, so teachers hold no grants yet.
    pub fn granted_to(role: Role) -> &'static [Permission] {
        match role {
            Role::Parent => &[
                Permission::ChildrenCreate,
                Permission::ChildrenRead,
                Permission::ProgressWrite,
            ],
            Role::School => &[Permission::ChildrenRead, Permission::ProgressWrite],
            Role::Teacher => &[],
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
