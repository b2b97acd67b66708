//! 权限目录
//! 启动时构建一次，之后只读，可被任意并发读者共享

pub mod builtin;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::{
    error::{AuthzError, CatalogError, Result},
    models::permission::*,
};

pub use builtin::builtin;

/// Immutable registry of permission domains.
#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    domains: Vec<PermissionDomain>,
    /// permission id -> (domain index, permission index)
    index: HashMap<String, (usize, usize)>,
}

impl PermissionCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// 按声明顺序列出所有领域
    pub fn list_domains(&self) -> &[PermissionDomain] {
        &self.domains
    }

    /// 领域内的权限；未知领域返回空切片
    pub fn list_permissions(&self, domain_id: &str) -> &[PermissionDefinition] {
        self.domain(domain_id)
            .map(|d| d.permissions.as_slice())
            .unwrap_or(&[])
    }

    pub fn all_permission_ids(&self) -> PermissionSet {
        self.index.keys().cloned().collect()
    }

    pub fn exists(&self, permission_id: &str) -> bool {
        self.index.contains_key(permission_id)
    }

    pub fn domain(&self, domain_id: &str) -> Option<&PermissionDomain> {
        self.domains.iter().find(|d| d.id == domain_id)
    }

    pub fn permission(&self, permission_id: &str) -> Option<&PermissionDefinition> {
        self.index
            .get(permission_id)
            .map(|&(d, p)| &self.domains[d].permissions[p])
    }

    pub fn domain_of(&self, permission_id: &str) -> Option<&PermissionDomain> {
        self.index.get(permission_id).map(|&(d, _)| &self.domains[d])
    }

    /// 权限总数
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// The only way to populate a [`PermissionCatalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    domains: Vec<PermissionDomain>,
    errors: Vec<CatalogError>,
}

impl CatalogBuilder {
    /// Start a new domain; subsequent `permission` calls attach to it.
    pub fn domain(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.domains.push(PermissionDomain {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            permissions: Vec::new(),
        });
        self
    }

    pub fn permission(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        level: PermissionLevel,
    ) -> Self {
        let definition = PermissionDefinition {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            level,
        };
        match self.domains.last_mut() {
            Some(domain) => domain.permissions.push(definition),
            None => self.errors.push(CatalogError::OrphanPermission(definition.id)),
        }
        self
    }

    pub fn build(self) -> std::result::Result<PermissionCatalog, CatalogError> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }

        let mut seen_domains = HashSet::new();
        let mut index = HashMap::new();

        for (d, domain) in self.domains.iter().enumerate() {
            if !seen_domains.insert(domain.id.as_str()) {
                return Err(CatalogError::DuplicateDomain(domain.id.clone()));
            }
            if domain.permissions.is_empty() {
                return Err(CatalogError::EmptyDomain(domain.id.clone()));
            }
            for (p, permission) in domain.permissions.iter().enumerate() {
                let well_formed = permission
                    .id
                    .strip_prefix(domain.id.as_str())
                    .and_then(|rest| rest.strip_prefix('.'))
                    .is_some_and(|action| !action.is_empty());
                if !well_formed {
                    return Err(CatalogError::MalformedPermissionId {
                        domain_id: domain.id.clone(),
                        permission_id: permission.id.clone(),
                    });
                }
                if index.insert(permission.id.clone(), (d, p)).is_some() {
                    return Err(CatalogError::DuplicatePermission(permission.id.clone()));
                }
            }
        }

        tracing::debug!(
            domains = self.domains.len(),
            permissions = index.len(),
            "Permission catalog built"
        );

        Ok(PermissionCatalog {
            domains: self.domains,
            index,
        })
    }
}

// ==================== 静态定义文件 ====================

/// Permissions granted to a system role by its bootstrap definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionGrant {
    /// `"all"`: every permission in the catalog
    All(AllPermissions),
    List(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllPermissions {
    All,
}

impl PermissionGrant {
    pub fn resolve(&self, catalog: &PermissionCatalog) -> PermissionSet {
        match self {
            PermissionGrant::All(_) => catalog.all_permission_ids(),
            PermissionGrant::List(ids) => ids.iter().cloned().collect(),
        }
    }
}

/// Built-in role seeded at bootstrap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemRoleDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub permissions: PermissionGrant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub level: PermissionLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub permissions: Vec<PermissionEntry>,
}

/// Deployment-shipped catalog document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDefinition {
    pub domains: Vec<DomainDefinition>,
    #[serde(default)]
    pub system_roles: Vec<SystemRoleDefinition>,
}

impl CatalogDefinition {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AuthzError::Config(format!("Failed to read catalog {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Build the catalog and check the system roles against it.
    pub fn build(self) -> Result<(PermissionCatalog, Vec<SystemRoleDefinition>)> {
        let mut builder = PermissionCatalog::builder();
        for domain in self.domains {
            builder = builder.domain(domain.id, domain.name, domain.description);
            for p in domain.permissions {
                builder = builder.permission(p.id, p.name, p.description, p.level);
            }
        }
        let catalog = builder.build()?;
        check_system_roles(&catalog, &self.system_roles)?;
        Ok((catalog, self.system_roles))
    }
}

pub(crate) fn check_system_roles(
    catalog: &PermissionCatalog,
    roles: &[SystemRoleDefinition],
) -> std::result::Result<(), CatalogError> {
    let mut ids = HashSet::new();
    for role in roles {
        if !ids.insert(role.id.as_str()) {
            return Err(CatalogError::DuplicateSystemRole(role.id.clone()));
        }
        if let PermissionGrant::List(permission_ids) = &role.permissions {
            if let Some(unknown) = permission_ids.iter().find(|id| !catalog.exists(id)) {
                return Err(CatalogError::UnknownSystemRolePermission {
                    role_id: role.id.clone(),
                    permission_id: unknown.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaves_catalog() -> PermissionCatalog {
        PermissionCatalog::builder()
            .domain("leaves", "Leaves", "Leave requests")
            .permission("leaves.apply", "Apply", "", PermissionLevel::Write)
            .permission("leaves.manage", "Manage", "", PermissionLevel::Manage)
            .build()
            .unwrap()
    }

    #[test]
    fn test_lookup() {
        let catalog = leaves_catalog();
        assert!(catalog.exists("leaves.apply"));
        assert!(!catalog.exists("leaves.delete"));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.domain_of("leaves.manage").unwrap().id, "leaves");
        assert_eq!(
            catalog.permission("leaves.manage").unwrap().level,
            PermissionLevel::Manage
        );
    }

    #[test]
    fn test_unknown_domain_lists_nothing() {
        let catalog = leaves_catalog();
        assert!(catalog.list_permissions("payroll").is_empty());
        assert_eq!(catalog.list_permissions("leaves").len(), 2);
    }

    #[test]
    fn test_rejects_malformed_id() {
        let result = PermissionCatalog::builder()
            .domain("leaves", "Leaves", "")
            .permission("leavesapply", "Apply", "", PermissionLevel::Write)
            .build();
        assert!(matches!(result, Err(CatalogError::MalformedPermissionId { .. })));

        let result = PermissionCatalog::builder()
            .domain("leaves", "Leaves", "")
            .permission("leaves.", "Apply", "", PermissionLevel::Write)
            .build();
        assert!(matches!(result, Err(CatalogError::MalformedPermissionId { .. })));
    }

    #[test]
    fn test_rejects_duplicates() {
        let result = PermissionCatalog::builder()
            .domain("leaves", "Leaves", "")
            .permission("leaves.apply", "Apply", "", PermissionLevel::Write)
            .domain("leaves", "Leaves again", "")
            .permission("leaves.view", "View", "", PermissionLevel::Read)
            .build();
        assert_eq!(result.unwrap_err(), CatalogError::DuplicateDomain("leaves".to_string()));

        let result = PermissionCatalog::builder()
            .domain("leaves", "Leaves", "")
            .permission("leaves.apply", "Apply", "", PermissionLevel::Write)
            .permission("leaves.apply", "Apply", "", PermissionLevel::Write)
            .build();
        assert_eq!(
            result.unwrap_err(),
            CatalogError::DuplicatePermission("leaves.apply".to_string())
        );
    }

    #[test]
    fn test_rejects_empty_and_orphan() {
        let result = PermissionCatalog::builder().domain("eod", "EOD", "").build();
        assert_eq!(result.unwrap_err(), CatalogError::EmptyDomain("eod".to_string()));

        let result = PermissionCatalog::builder()
            .permission("eod.submit", "Submit", "", PermissionLevel::Write)
            .build();
        assert!(matches!(result, Err(CatalogError::OrphanPermission(_))));
    }

    #[test]
    fn test_definition_from_json() {
        let json = r#"{
            "domains": [{
                "id": "leaves",
                "name": "Leaves",
                "permissions": [
                    {"id": "leaves.apply", "name": "Apply", "level": "write"},
                    {"id": "leaves.manage", "name": "Manage", "level": "manage"}
                ]
            }],
            "system_roles": [
                {"id": "admin", "name": "Admin", "permissions": "all"},
                {"id": "staff", "name": "Staff", "permissions": ["leaves.apply"]}
            ]
        }"#;

        let (catalog, roles) = CatalogDefinition::from_json(json).unwrap().build().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(roles.len(), 2);
        assert_eq!(roles[0].permissions.resolve(&catalog).len(), 2);
        assert_eq!(roles[1].permissions.resolve(&catalog).len(), 1);
    }

    #[test]
    fn test_definition_rejects_unknown_system_permission() {
        let json = r#"{
            "domains": [{"id": "eod", "name": "EOD", "permissions": [
                {"id": "eod.submit", "name": "Submit", "level": "write"}
            ]}],
            "system_roles": [{"id": "staff", "name": "Staff", "permissions": ["eod.approve"]}]
        }"#;

        let result = CatalogDefinition::from_json(json).unwrap().build();
        assert!(matches!(
            result,
            Err(AuthzError::Catalog(CatalogError::UnknownSystemRolePermission { .. }))
        ));
    }
}
