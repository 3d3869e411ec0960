//! Membership delta planning
//!
//! Identities are compared by exact string equality. No case folding or
//! trimming happens here; callers supply canonical logins.

use std::collections::BTreeSet;

use serde::Serialize;

/// Identities to add to and remove from a team
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MembershipDelta {
    pub to_add: BTreeSet<String>,
    pub to_remove: BTreeSet<String>,
}

impl MembershipDelta {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// `to_add = desired - live`, `to_remove = live - desired`
pub fn plan_membership(desired: &BTreeSet<String>, live: &BTreeSet<String>) -> MembershipDelta {
    MembershipDelta {
        to_add: desired.difference(live).cloned().collect(),
        to_remove: live.difference(desired).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_add_and_remove() {
        let delta = plan_membership(&set(&["a", "b"]), &set(&["b", "c"]));

        assert_eq!(delta.to_add, set(&["a"]));
        assert_eq!(delta.to_remove, set(&["c"]));
    }

    #[test]
    fn test_in_sync_is_empty() {
        let delta = plan_membership(&set(&["a", "b"]), &set(&["b", "a"]));
        assert!(delta.is_empty());
    }

    #[test]
    fn test_empty_desired_removes_all() {
        let delta = plan_membership(&BTreeSet::new(), &set(&["a", "b"]));

        assert!(delta.to_add.is_empty());
        assert_eq!(delta.to_remove, set(&["a", "b"]));
    }

    #[test]
    fn test_case_sensitive_comparison() {
        let delta = plan_membership(&set(&["Octocat"]), &set(&["octocat"]));

        assert_eq!(delta.to_add, set(&["Octocat"]));
        assert_eq!(delta.to_remove, set(&["octocat"]));
    }
}
