//! 审计日志
//! 每次提交的角色变更输出一条结构化审计事件

use crate::models::role::Role;

/// 审计操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleAuditAction {
    RoleCreate,
    RoleUpdate,
    RoleDuplicate,
    RoleArchive,
    RoleRestore,
    RoleDelete,
    RoleUserCount,
}

impl RoleAuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleAuditAction::RoleCreate => "role.create",
            RoleAuditAction::RoleUpdate => "role.update",
            RoleAuditAction::RoleDuplicate => "role.duplicate",
            RoleAuditAction::RoleArchive => "role.archive",
            RoleAuditAction::RoleRestore => "role.restore",
            RoleAuditAction::RoleDelete => "role.delete",
            RoleAuditAction::RoleUserCount => "role.user_count",
        }
    }
}

impl std::fmt::Display for RoleAuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 记录审计事件
pub fn record(action: RoleAuditAction, role: &Role) {
    tracing::info!(
        target: "audit",
        action = action.as_str(),
        role_id = %role.id,
        role_name = %role.name,
        is_system = role.is_system,
        permissions = role.permission_ids.len(),
        version = role.version,
        "Role audit event"
    );
}
