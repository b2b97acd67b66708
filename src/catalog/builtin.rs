//! HR console permission catalog shipped with the application

use once_cell::sync::Lazy;
use std::sync::Arc;

use super::{PermissionCatalog, PermissionGrant, SystemRoleDefinition};
use crate::models::permission::PermissionLevel::{Manage, Read, Write};

static BUILTIN: Lazy<Arc<PermissionCatalog>> = Lazy::new(|| {
    // 静态定义，构建失败属于编码错误
    Arc::new(build_builtin().expect("built-in permission catalog is valid"))
});

/// Process-wide built-in catalog
pub fn builtin() -> Arc<PermissionCatalog> {
    BUILTIN.clone()
}

fn build_builtin() -> Result<PermissionCatalog, crate::error::CatalogError> {
    PermissionCatalog::builder()
        .domain("dashboard", "Dashboard", "Home dashboard and organization analytics")
        .permission("dashboard.view", "View dashboard", "Open the home dashboard", Read)
        .permission("dashboard.analytics", "View analytics", "Headcount, attrition and attendance charts", Read)
        .domain("employees", "Employees", "Employee directory and records")
        .permission("employees.view", "View employees", "Browse the employee directory", Read)
        .permission("employees.create", "Add employees", "Onboard new employees", Write)
        .permission("employees.edit", "Edit employees", "Update employee profiles", Write)
        .permission("employees.manage", "Manage employees", "Full control over employee records, including offboarding", Manage)
        .domain("leaves", "Leaves", "Leave requests and balances")
        .permission("leaves.view", "View leaves", "See own leave history and balances", Read)
        .permission("leaves.apply", "Apply for leave", "Submit leave requests", Write)
        .permission("leaves.approve", "Approve leaves", "Approve or reject team leave requests", Write)
        .permission("leaves.manage", "Manage leaves", "Manage leave requests and balances for everyone", Manage)
        .domain("eod", "EOD Reports", "End-of-day reporting")
        .permission("eod.submit", "Submit EOD", "Submit own end-of-day reports", Write)
        .permission("eod.view_team", "View team EODs", "Read reports submitted by direct reports", Read)
        .permission("eod.manage", "Manage EODs", "Review and annotate every EOD report", Manage)
        .domain("policies", "Policies", "Company policy documents")
        .permission("policies.view", "View policies", "Read published policies", Read)
        .permission("policies.publish", "Publish policies", "Publish new policy versions", Write)
        .permission("policies.manage", "Manage policies", "Create, archive and version policy documents", Manage)
        .domain("promotions", "Promotions", "Promotion cycles and recommendations")
        .permission("promotions.view", "View promotions", "See promotion cycles", Read)
        .permission("promotions.recommend", "Recommend promotions", "Nominate employees for promotion", Write)
        .permission("promotions.approve", "Approve promotions", "Approve or decline promotion recommendations", Manage)
        .domain("time_tracking", "Time Tracking", "Working hours and timesheets")
        .permission("time_tracking.view_own", "View own time", "See own tracked hours", Read)
        .permission("time_tracking.view_team", "View team time", "See hours tracked by the team", Read)
        .permission("time_tracking.manage", "Manage time tracking", "Adjust timesheets for anyone", Manage)
        .domain("hr_issues", "HR Issues", "Employee issue threads")
        .permission("hr_issues.raise", "Raise issues", "Open an issue with HR", Write)
        .permission("hr_issues.respond", "Respond to issues", "Reply on assigned issue threads", Write)
        .permission("hr_issues.manage", "Manage issues", "Assign, resolve and close any issue", Manage)
        .domain("settings", "Settings & Administration", "Organization settings, roles and permissions")
        .permission("settings.view", "View settings", "Read organization settings", Read)
        .permission("settings.manage", "Manage settings", "Change organization settings", Manage)
        .permission("settings.roles", "Manage roles", "Create, edit and archive roles", Manage)
        .build()
}

/// System roles in declared (display) order
pub fn system_roles() -> Vec<SystemRoleDefinition> {
    fn list(ids: &[&str]) -> PermissionGrant {
        PermissionGrant::List(ids.iter().map(|id| id.to_string()).collect())
    }

    vec![
        SystemRoleDefinition {
            id: "super_admin".to_string(),
            name: "Super Admin".to_string(),
            description: "Unrestricted access to every part of the console".to_string(),
            permissions: PermissionGrant::All(super::AllPermissions::All),
        },
        SystemRoleDefinition {
            id: "hr_admin".to_string(),
            name: "HR Admin".to_string(),
            description: "Runs day-to-day HR operations".to_string(),
            permissions: list(&[
                "dashboard.view",
                "dashboard.analytics",
                "employees.view",
                "employees.create",
                "employees.edit",
                "employees.manage",
                "leaves.view",
                "leaves.apply",
                "leaves.approve",
                "leaves.manage",
                "eod.submit",
                "eod.manage",
                "policies.view",
                "policies.publish",
                "policies.manage",
                "promotions.view",
                "promotions.approve",
                "time_tracking.view_own",
                "time_tracking.manage",
                "hr_issues.raise",
                "hr_issues.respond",
                "hr_issues.manage",
                "settings.view",
            ]),
        },
        SystemRoleDefinition {
            id: "manager".to_string(),
            name: "Manager".to_string(),
            description: "Leads a team and approves its requests".to_string(),
            permissions: list(&[
                "dashboard.view",
                "employees.view",
                "leaves.view",
                "leaves.apply",
                "leaves.approve",
                "eod.submit",
                "eod.view_team",
                "policies.view",
                "promotions.view",
                "promotions.recommend",
                "time_tracking.view_own",
                "time_tracking.view_team",
                "hr_issues.raise",
            ]),
        },
        SystemRoleDefinition {
            id: "employee".to_string(),
            name: "Employee".to_string(),
            description: "Default access for every employee".to_string(),
            permissions: list(&[
                "dashboard.view",
                "leaves.view",
                "leaves.apply",
                "eod.submit",
                "policies.view",
                "time_tracking.view_own",
                "hr_issues.raise",
            ]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::check_system_roles;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = builtin();
        assert_eq!(catalog.list_domains().len(), 9);
        assert_eq!(catalog.list_domains()[0].id, "dashboard");
        assert_eq!(catalog.list_domains()[8].name, "Settings & Administration");
        assert!(catalog.exists("settings.roles"));
    }

    #[test]
    fn test_builtin_system_roles_reference_catalog() {
        let catalog = builtin();
        assert!(check_system_roles(&catalog, &system_roles()).is_ok());
    }

    #[test]
    fn test_builtin_is_shared() {
        assert!(Arc::ptr_eq(&builtin(), &builtin()));
    }
}
