//! Business logic services layer

pub mod capability_summary;
pub mod permission_service;
pub mod role_editor;
pub mod selection;

pub use capability_summary::{summarize, CapabilitySummarizer};
pub use permission_service::{
    effective_permissions, has_all_of, has_any_of, has_permission, PermissionService,
};
pub use role_editor::RoleDraft;
pub use selection::{domain_selection_state, toggle_domain, toggle_permission};
