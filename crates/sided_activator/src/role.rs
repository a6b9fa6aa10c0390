//! Execution roles and the role tags attached to constructors

use serde::{Deserialize, Serialize};
use std::fmt;

/// The runtime side activation happens on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionRole {
    Client,
    #[default]
    Server,
}

impl ExecutionRole {
    /// Both roles, in index order
    pub const ALL: [ExecutionRole; 2] = [ExecutionRole::Client, ExecutionRole::Server];

    pub(crate) fn index(self) -> usize {
        match self {
            ExecutionRole::Client => 0,
            ExecutionRole::Server => 1,
        }
    }
}

impl fmt::Display for ExecutionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionRole::Client => f.write_str("client"),
            ExecutionRole::Server => f.write_str("server"),
        }
    }
}

/// Role a constructor is reserved for.
///
/// A constructor is *preferred* for a role only when its tag names that role.
/// `Any` never makes a constructor preferred; it only keeps it eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoleTag {
    #[default]
    Any,
    Client,
    Server,
}

impl RoleTag {
    /// True when the tag names exactly `role`
    pub fn prefers(self, role: ExecutionRole) -> bool {
        matches!(
            (self, role),
            (RoleTag::Client, ExecutionRole::Client) | (RoleTag::Server, ExecutionRole::Server)
        )
    }

    /// True when the tag names a role other than `role`
    pub fn is_foreign_to(self, role: ExecutionRole) -> bool {
        self != RoleTag::Any && !self.prefers(role)
    }
}

impl From<ExecutionRole> for RoleTag {
    fn from(role: ExecutionRole) -> Self {
        match role {
            ExecutionRole::Client => RoleTag::Client,
            ExecutionRole::Server => RoleTag::Server,
        }
    }
}

/// How constructors tagged for another role are treated during selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForeignRolePolicy {
    /// Constructors tagged for another role are skipped unless they are the
    /// type's only constructor
    #[default]
    Exclude,
    /// Constructors tagged for another role compete as non-preferred candidates
    Allow,
}

impl ForeignRolePolicy {
    /// Whether a constructor carrying `tag` may be considered under `role`
    pub fn admits(self, tag: RoleTag, role: ExecutionRole) -> bool {
        match self {
            ForeignRolePolicy::Exclude => !tag.is_foreign_to(role),
            ForeignRolePolicy::Allow => true,
        }
    }
}

/// Reports the role the current process is running as
pub trait RoleDetector: Send + Sync {
    fn current_role(&self) -> ExecutionRole;
}

/// Detector that always reports the same role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRole(pub ExecutionRole);

impl RoleDetector for FixedRole {
    fn current_role(&self) -> ExecutionRole {
        self.0
    }
}

impl<F> RoleDetector for F
where
    F: Fn() -> ExecutionRole + Send + Sync,
{
    fn current_role(&self) -> ExecutionRole {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_is_never_preferred() {
        for role in ExecutionRole::ALL {
            assert!(!RoleTag::Any.prefers(role));
            assert!(!RoleTag::Any.is_foreign_to(role));
        }
        assert!(RoleTag::Client.prefers(ExecutionRole::Client));
        assert!(RoleTag::Client.is_foreign_to(ExecutionRole::Server));
    }

    #[test]
    fn test_foreign_policy() {
        assert!(!ForeignRolePolicy::Exclude.admits(RoleTag::Server, ExecutionRole::Client));
        assert!(ForeignRolePolicy::Exclude.admits(RoleTag::Any, ExecutionRole::Client));
        assert!(ForeignRolePolicy::Allow.admits(RoleTag::Server, ExecutionRole::Client));
    }

    #[test]
    fn test_closure_detector() {
        let detector = || ExecutionRole::Client;
        assert_eq!(detector.current_role(), ExecutionRole::Client);
        assert_eq!(FixedRole(ExecutionRole::Server).current_role(), ExecutionRole::Server);
    }
}
