//! Permission selection engine
//!
//! Pure functions over a working set of permission ids. Nothing here checks
//! ids against the catalog; that happens when a role is saved.

use crate::models::permission::{PermissionDomain, PermissionSet, SelectionState};

/// Add the id if absent, remove it if present.
pub fn toggle_permission(selected: &PermissionSet, permission_id: &str) -> PermissionSet {
    let mut next = selected.clone();
    if !next.remove(permission_id) {
        next.insert(permission_id.to_string());
    }
    next
}

/// Select-all / deselect-all for one domain. A partially selected domain
/// counts as "not all", so the toggle selects the rest of it.
pub fn toggle_domain(selected: &PermissionSet, domain: &PermissionDomain) -> PermissionSet {
    let mut next = selected.clone();
    if is_fully_selected(selected, domain) {
        for id in domain.permission_ids() {
            next.remove(id);
        }
    } else {
        next.extend(domain.permission_ids().map(str::to_string));
    }
    next
}

/// Indicator state of a domain. An empty domain reports `None`.
pub fn domain_selection_state(selected: &PermissionSet, domain: &PermissionDomain) -> SelectionState {
    let total = domain.permissions.len();
    let held = domain
        .permission_ids()
        .filter(|id| selected.contains(*id))
        .count();

    match held {
        0 => SelectionState::None,
        n if n == total => SelectionState::All,
        _ => SelectionState::Some,
    }
}

fn is_fully_selected(selected: &PermissionSet, domain: &PermissionDomain) -> bool {
    domain.permission_ids().all(|id| selected.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::permission::{PermissionDefinition, PermissionLevel};

    fn domain(ids: &[&str]) -> PermissionDomain {
        PermissionDomain {
            id: "leaves".to_string(),
            name: "Leaves".to_string(),
            description: String::new(),
            permissions: ids
                .iter()
                .map(|id| PermissionDefinition {
                    id: id.to_string(),
                    name: id.to_string(),
                    description: String::new(),
                    level: PermissionLevel::Read,
                })
                .collect(),
        }
    }

    fn set(ids: &[&str]) -> PermissionSet {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_toggle_permission() {
        let selected = toggle_permission(&set(&[]), "leaves.apply");
        assert_eq!(selected, set(&["leaves.apply"]));
        assert!(toggle_permission(&selected, "leaves.apply").is_empty());
    }

    #[test]
    fn test_partial_domain_toggles_to_all() {
        let d = domain(&["leaves.a", "leaves.b", "leaves.c"]);
        let partial = set(&["leaves.a", "eod.submit"]);

        let next = toggle_domain(&partial, &d);
        assert_eq!(next, set(&["leaves.a", "leaves.b", "leaves.c", "eod.submit"]));

        let cleared = toggle_domain(&next, &d);
        assert_eq!(cleared, set(&["eod.submit"]));
    }

    #[test]
    fn test_selection_state() {
        let d = domain(&["leaves.a", "leaves.b"]);
        assert_eq!(domain_selection_state(&set(&[]), &d), SelectionState::None);
        assert_eq!(domain_selection_state(&set(&["leaves.a"]), &d), SelectionState::Some);
        assert_eq!(
            domain_selection_state(&set(&["leaves.a", "leaves.b"]), &d),
            SelectionState::All
        );
        assert_eq!(domain_selection_state(&set(&["leaves.a"]), &domain(&[])), SelectionState::None);
    }
}
