//! Role domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::permission::PermissionSet;

/// Role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_system: bool,
    pub permission_ids: PermissionSet,
    pub is_archived: bool,
    /// Cached count of principals holding this role, owned by the assignment store
    pub user_count: u64,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn is_active(&self) -> bool {
        !self.is_archived
    }

    pub fn grants(&self, permission_id: &str) -> bool {
        !self.is_archived && self.permission_ids.contains(permission_id)
    }

    /// 大小写无关的名称键
    pub(crate) fn name_key(&self) -> String {
        name_key(&self.name)
    }
}

pub(crate) fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Create role request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub permission_ids: PermissionSet,
}

impl CreateRoleRequest {
    pub fn new<I, S>(name: impl Into<String>, description: impl Into<String>, permission_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            description: description.into(),
            permission_ids: permission_ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Update role request. `expected_version` enables optimistic concurrency.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub permission_ids: PermissionSet,
    #[serde(default)]
    pub expected_version: Option<u64>,
}

impl UpdateRoleRequest {
    pub fn new<I, S>(name: impl Into<String>, description: impl Into<String>, permission_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            description: description.into(),
            permission_ids: permission_ids.into_iter().map(Into::into).collect(),
            expected_version: None,
        }
    }

    pub fn with_expected_version(mut self, version: u64) -> Self {
        self.expected_version = Some(version);
        self
    }

    /// Same fields as the stored role, ready for editing
    pub fn from_role(role: &Role) -> Self {
        Self {
            name: role.name.clone(),
            description: role.description.clone(),
            permission_ids: role.permission_ids.clone(),
            expected_version: Some(role.version),
        }
    }
}

/// Role validation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRules {
    pub name_min_length: usize,
    pub name_max_length: usize,
}

impl Default for RoleRules {
    fn default() -> Self {
        Self {
            name_min_length: 2,
            name_max_length: 64,
        }
    }
}
