//! 测试公共模块
//! 提供测试用权限目录与角色存储

#![allow(dead_code)]

use hr_authz::{
    catalog::{AllPermissions, PermissionCatalog, PermissionGrant, SystemRoleDefinition},
    models::{CreateRoleRequest, PermissionLevel, PermissionSet, RoleRules},
    repository::RoleRepository,
};
use std::sync::Arc;

pub const SYSTEM_ADMIN_ID: &str = "system_admin";
pub const SYSTEM_STAFF_ID: &str = "staff";

/// 创建测试权限目录
pub fn create_test_catalog() -> Arc<PermissionCatalog> {
    Arc::new(
        PermissionCatalog::builder()
            .domain("leaves", "Leaves", "Leave requests")
            .permission("leaves.apply", "Apply for leave", "", PermissionLevel::Write)
            .permission("leaves.manage", "Manage leaves", "", PermissionLevel::Manage)
            .domain("eod", "EOD Reports", "End-of-day reports")
            .permission("eod.submit", "Submit EOD", "", PermissionLevel::Write)
            .permission("eod.view_team", "View team EODs", "", PermissionLevel::Read)
            .permission("eod.manage", "Manage EODs", "", PermissionLevel::Manage)
            .domain("settings", "Settings & Administration", "")
            .permission("settings.view", "View settings", "", PermissionLevel::Read)
            .permission("settings.roles", "Manage roles", "", PermissionLevel::Manage)
            .build()
            .expect("test catalog is valid"),
    )
}

/// 测试用系统角色
pub fn test_system_roles() -> Vec<SystemRoleDefinition> {
    vec![
        SystemRoleDefinition {
            id: SYSTEM_ADMIN_ID.to_string(),
            name: "System Admin".to_string(),
            description: "Everything".to_string(),
            permissions: PermissionGrant::All(AllPermissions::All),
        },
        SystemRoleDefinition {
            id: SYSTEM_STAFF_ID.to_string(),
            name: "Staff".to_string(),
            description: "Default access".to_string(),
            permissions: PermissionGrant::List(vec![
                "leaves.apply".to_string(),
                "eod.submit".to_string(),
            ]),
        },
    ]
}

/// 创建带系统角色的测试存储
pub fn setup_test_repo() -> RoleRepository {
    RoleRepository::with_system_roles(create_test_catalog(), RoleRules::default(), &test_system_roles())
        .expect("Failed to bootstrap test repository")
}

pub fn perms(ids: &[&str]) -> PermissionSet {
    ids.iter().map(|s| s.to_string()).collect()
}

/// 创建测试角色
pub fn create_test_role(repo: &RoleRepository, name: &str, ids: &[&str]) -> hr_authz::models::Role {
    repo.create(CreateRoleRequest::new(name, "", ids.iter().copied()))
        .expect("Failed to create test role")
}
