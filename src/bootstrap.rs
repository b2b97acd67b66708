//! 启动装配
//! 构建权限目录，并用系统角色初始化角色存储

use std::sync::Arc;

use crate::{
    catalog::{self, CatalogDefinition, PermissionCatalog, SystemRoleDefinition},
    config::AppConfig,
    error::Result,
    repository::RoleRepository,
    services::{CapabilitySummarizer, PermissionService},
};

/// Everything a host needs, wired once at startup.
pub struct AccessControl {
    pub catalog: Arc<PermissionCatalog>,
    pub roles: Arc<RoleRepository>,
    pub summarizer: CapabilitySummarizer,
}

impl AccessControl {
    pub fn permission_service(&self) -> PermissionService {
        PermissionService::new(self.roles.clone())
    }
}

/// Load the catalog (file or built-in) and seed the system roles.
pub fn bootstrap(config: &AppConfig) -> Result<AccessControl> {
    let (catalog, system_roles) = load_catalog(config)?;
    let roles = RoleRepository::with_system_roles(catalog.clone(), config.roles.rules(), &system_roles)?;

    tracing::info!(
        domains = catalog.list_domains().len(),
        permissions = catalog.len(),
        system_roles = system_roles.len(),
        "Access control ready"
    );

    Ok(AccessControl {
        catalog,
        roles: Arc::new(roles),
        summarizer: CapabilitySummarizer::default().max_items(config.roles.summary_max_items),
    })
}

fn load_catalog(config: &AppConfig) -> Result<(Arc<PermissionCatalog>, Vec<SystemRoleDefinition>)> {
    match &config.catalog.path {
        Some(path) => {
            tracing::info!(path = %path, "Loading permission catalog from file");
            let (catalog, system_roles) = CatalogDefinition::from_file(path)?.build()?;
            Ok((Arc::new(catalog), system_roles))
        }
        None => Ok((catalog::builtin(), catalog::builtin::system_roles())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_builtin() {
        let access = bootstrap(&AppConfig::default()).unwrap();
        let roles = access.roles.list(false);
        let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Super Admin", "HR Admin", "Manager", "Employee"]);
        assert!(roles.iter().all(|r| r.is_system));
        assert_eq!(roles[0].permission_ids, access.catalog.all_permission_ids());
    }

    #[test]
    fn test_bootstrap_missing_file() {
        let mut config = AppConfig::default();
        config.catalog.path = Some("/nonexistent/hr-catalog.json".to_string());
        let result = bootstrap(&config);
        assert!(matches!(result, Err(crate::error::AuthzError::Config(_))));
    }
}
