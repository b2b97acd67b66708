//! Capability summary models

use serde::{Deserialize, Serialize};

/// One curated entry: a permission id and the sentence shown when it is held
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityRule {
    pub permission_id: String,
    pub text: String,
}

impl CapabilityRule {
    pub fn new(permission_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            permission_id: permission_id.into(),
            text: text.into(),
        }
    }
}

/// Derived display value, never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityStatement {
    /// Position of the matching rule in the priority table (0 = most senior)
    pub priority_rank: usize,
    pub text: String,
}
