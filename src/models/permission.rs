//! Permission catalog domain models

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 权限 id 集合（有序，便于稳定序列化）
pub type PermissionSet = BTreeSet<String>;

/// Capability level. Advisory only: `Manage` does not imply `Write`,
/// `Write` does not imply `Read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    Read,
    Write,
    Manage,
}

impl PermissionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionLevel::Read => "read",
            PermissionLevel::Write => "write",
            PermissionLevel::Manage => "manage",
        }
    }
}

/// Permission definition, `id` is `<domain>.<action>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub level: PermissionLevel,
}

/// Permission domain; owns its permission definitions in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDomain {
    pub id: String,
    pub name: String,
    pub description: String,
    pub permissions: Vec<PermissionDefinition>,
}

impl PermissionDomain {
    /// 领域内所有权限 id
    pub fn permission_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.permissions.iter().map(|p| p.id.as_str())
    }
}

/// Domain-level selection indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    None,
    Some,
    All,
}
