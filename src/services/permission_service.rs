//! 权限检查服务
//! 在调用方提供的角色集合上做并集判断，无 I/O、不加锁

use std::sync::Arc;

use crate::{
    models::{permission::PermissionSet, role::Role},
    repository::{RoleRepository, RoleSnapshot},
};

/// Whether any non-archived role grants `permission_id`.
pub fn has_permission<'a, I>(assigned_roles: I, permission_id: &str) -> bool
where
    I: IntoIterator<Item = &'a Role>,
{
    let granted = assigned_roles.into_iter().any(|role| role.grants(permission_id));
    record_check(granted);
    granted
}

/// Whether at least one of `permission_ids` is granted. Empty input is `false`.
pub fn has_any_of<'a, I, S>(assigned_roles: I, permission_ids: &[S]) -> bool
where
    I: IntoIterator<Item = &'a Role>,
    S: AsRef<str>,
{
    let roles: Vec<&Role> = active_roles(assigned_roles);
    let granted = permission_ids
        .iter()
        .any(|id| roles.iter().any(|role| role.permission_ids.contains(id.as_ref())));
    record_check(granted);
    granted
}

/// Whether every one of `permission_ids` is granted. Empty input is `true`.
pub fn has_all_of<'a, I, S>(assigned_roles: I, permission_ids: &[S]) -> bool
where
    I: IntoIterator<Item = &'a Role>,
    S: AsRef<str>,
{
    let roles: Vec<&Role> = active_roles(assigned_roles);
    let granted = permission_ids
        .iter()
        .all(|id| roles.iter().any(|role| role.permission_ids.contains(id.as_ref())));
    record_check(granted);
    granted
}

/// Union of the permission sets of all non-archived roles.
pub fn effective_permissions<'a, I>(assigned_roles: I) -> PermissionSet
where
    I: IntoIterator<Item = &'a Role>,
{
    assigned_roles
        .into_iter()
        .filter(|role| role.is_active())
        .flat_map(|role| role.permission_ids.iter().cloned())
        .collect()
}

fn active_roles<'a, I>(assigned_roles: I) -> Vec<&'a Role>
where
    I: IntoIterator<Item = &'a Role>,
{
    assigned_roles
        .into_iter()
        .filter(|role| role.is_active())
        .collect()
}

fn record_check(granted: bool) {
    let result = if granted { "granted" } else { "denied" };
    metrics::counter!("authz_checks_total", "result" => result).increment(1);
}

/// Checks a principal's role ids against the store's committed state.
/// In-flight edits are never visible; each check reads one snapshot.
pub struct PermissionService {
    roles: Arc<RoleRepository>,
}

impl PermissionService {
    pub fn new(roles: Arc<RoleRepository>) -> Self {
        Self { roles }
    }

    /// 检查角色集合是否拥有权限
    pub fn check_permission<S: AsRef<str>>(&self, role_ids: &[S], permission_id: &str) -> bool {
        let snapshot = self.roles.snapshot();
        let granted = has_permission(snapshot.resolve(role_ids), permission_id);
        if !granted {
            tracing::debug!(permission_id = %permission_id, "Permission denied");
        }
        granted
    }

    pub fn check_any<S: AsRef<str>, P: AsRef<str>>(&self, role_ids: &[S], permission_ids: &[P]) -> bool {
        let snapshot = self.roles.snapshot();
        has_any_of(snapshot.resolve(role_ids), permission_ids)
    }

    pub fn check_all<S: AsRef<str>, P: AsRef<str>>(&self, role_ids: &[S], permission_ids: &[P]) -> bool {
        let snapshot = self.roles.snapshot();
        has_all_of(snapshot.resolve(role_ids), permission_ids)
    }

    /// 获取角色集合的全部有效权限
    pub fn user_permissions<S: AsRef<str>>(&self, role_ids: &[S]) -> PermissionSet {
        let snapshot: Arc<RoleSnapshot> = self.roles.snapshot();
        effective_permissions(snapshot.resolve(role_ids))
    }
}
