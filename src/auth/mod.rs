pub mod directory;
pub mod password;
pub mod session;

use serde::{Deserialize, Serialize};

pub use directory::{Directory, Profile};
pub use session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Designer,
    Machinist,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Designer => write!(f, "designer"),
            Role::Machinist => write!(f, "machinist"),
        }
    }
}

/// Every mutating operation names the capability it needs; `Role::allows`
/// is the single authorization table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    SubmitJob,
    ClaimJob,
    CompleteJob,
    ReorderQueue,
    EditJob,
    DeleteJob,
    ManageUsers,
}

impl Role {
    pub fn allows(self, cap: Capability) -> bool {
        use Capability::*;
        match cap {
            SubmitJob => true,
            ClaimJob | CompleteJob => matches!(self, Role::Machinist | Role::Admin),
            ReorderQueue | EditJob | DeleteJob => matches!(self, Role::Designer | Role::Admin),
            ManageUsers => self == Role::Admin,
        }
    }
}
