//! 能力摘要
//! 按固定优先级表把权限集合转换为少量可读语句

use once_cell::sync::Lazy;

use crate::models::{
    capability::{CapabilityRule, CapabilityStatement},
    permission::PermissionSet,
};

pub const DEFAULT_MAX_ITEMS: usize = 5;

/// Most senior capability first. Only these ids ever produce a summary line.
const CURATED: &[(&str, &str)] = &[
    ("settings.roles", "Manage roles and permissions"),
    ("settings.manage", "Change organization settings"),
    ("employees.manage", "Manage employee records"),
    ("promotions.approve", "Approve promotions"),
    ("leaves.manage", "Manage all leaves"),
    ("policies.manage", "Manage company policies"),
    ("hr_issues.manage", "Resolve HR issues"),
    ("time_tracking.manage", "Manage time tracking"),
    ("eod.manage", "Review all EOD reports"),
    ("leaves.approve", "Approve team leave requests"),
    ("policies.publish", "Publish policy documents"),
    ("employees.create", "Onboard new employees"),
    ("promotions.recommend", "Recommend promotions"),
    ("dashboard.analytics", "View organization analytics"),
    ("dashboard.view", "View dashboard"),
];

static DEFAULT_SUMMARIZER: Lazy<CapabilitySummarizer> = Lazy::new(CapabilitySummarizer::default);

/// Built-in rule table in priority order
pub fn curated_rules() -> Vec<CapabilityRule> {
    CURATED
        .iter()
        .map(|(id, text)| CapabilityRule::new(*id, *text))
        .collect()
}

/// Summarize with the built-in table.
pub fn summarize(selected: &PermissionSet, max_items: usize) -> Vec<String> {
    DEFAULT_SUMMARIZER.summarize_with_limit(selected, max_items)
}

#[derive(Debug, Clone)]
pub struct CapabilitySummarizer {
    rules: Vec<CapabilityRule>,
    max_items: usize,
}

impl Default for CapabilitySummarizer {
    fn default() -> Self {
        Self {
            rules: curated_rules(),
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

impl CapabilitySummarizer {
    /// Custom ordered rule table
    pub fn with_rules(rules: Vec<CapabilityRule>) -> Self {
        Self {
            rules,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }

    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn rules(&self) -> &[CapabilityRule] {
        &self.rules
    }

    pub fn statements(&self, selected: &PermissionSet, max_items: usize) -> Vec<CapabilityStatement> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| selected.contains(&rule.permission_id))
            .take(max_items)
            .map(|(rank, rule)| CapabilityStatement {
                priority_rank: rank,
                text: rule.text.clone(),
            })
            .collect()
    }

    /// Empty result means "nothing notable", not an error.
    pub fn summarize(&self, selected: &PermissionSet) -> Vec<String> {
        self.summarize_with_limit(selected, self.max_items)
    }

    pub fn summarize_with_limit(&self, selected: &PermissionSet, max_items: usize) -> Vec<String> {
        self.statements(selected, max_items)
            .into_iter()
            .map(|s| s.text)
            .collect()
    }
}
