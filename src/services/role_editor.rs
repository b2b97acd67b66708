//! Role editing session
//!
//! A `RoleDraft` is the working copy an administrator edits before saving:
//! selection changes go through the selection engine, the summary is
//! recomputed on demand, and `save` hands the result to the store.

use crate::{
    error::Result,
    models::{
        permission::{PermissionDomain, PermissionSet, SelectionState},
        role::{CreateRoleRequest, Role, UpdateRoleRequest},
    },
    repository::RoleRepository,
    services::{capability_summary::CapabilitySummarizer, selection},
};

#[derive(Debug, Clone)]
pub struct RoleDraft {
    /// Existing role id and the version the draft was taken from
    origin: Option<(String, u64)>,
    is_system: bool,
    pub name: String,
    pub description: String,
    selected: PermissionSet,
}

impl RoleDraft {
    /// Draft for a new role
    pub fn new() -> Self {
        Self {
            origin: None,
            is_system: false,
            name: String::new(),
            description: String::new(),
            selected: PermissionSet::new(),
        }
    }

    pub fn from_role(role: &Role) -> Self {
        Self {
            origin: Some((role.id.clone(), role.version)),
            is_system: role.is_system,
            name: role.name.clone(),
            description: role.description.clone(),
            selected: role.permission_ids.clone(),
        }
    }

    pub fn role_id(&self) -> Option<&str> {
        self.origin.as_ref().map(|(id, _)| id.as_str())
    }

    /// System role names are fixed; the UI disables the field.
    pub fn name_editable(&self) -> bool {
        !self.is_system
    }

    pub fn selected(&self) -> &PermissionSet {
        &self.selected
    }

    pub fn permission_count(&self) -> usize {
        self.selected.len()
    }

    pub fn toggle_permission(&mut self, permission_id: &str) {
        self.selected = selection::toggle_permission(&self.selected, permission_id);
    }

    pub fn toggle_domain(&mut self, domain: &PermissionDomain) {
        self.selected = selection::toggle_domain(&self.selected, domain);
    }

    pub fn domain_state(&self, domain: &PermissionDomain) -> SelectionState {
        selection::domain_selection_state(&self.selected, domain)
    }

    pub fn summary(&self, summarizer: &CapabilitySummarizer) -> Vec<String> {
        summarizer.summarize(&self.selected)
    }

    /// Create or update. Updates carry the version the draft started from, so
    /// a concurrent edit surfaces as `VersionConflict` instead of being lost.
    pub fn save(&self, repo: &RoleRepository) -> Result<Role> {
        match &self.origin {
            None => repo.create(CreateRoleRequest {
                name: self.name.clone(),
                description: self.description.clone(),
                permission_ids: self.selected.clone(),
            }),
            Some((id, version)) => repo.update(
                id,
                UpdateRoleRequest {
                    name: self.name.clone(),
                    description: self.description.clone(),
                    permission_ids: self.selected.clone(),
                    expected_version: Some(*version),
                },
            ),
        }
    }
}

impl Default for RoleDraft {
    fn default() -> Self {
        Self::new()
    }
}
