//! Role repository (角色存储)
//!
//! 状态保存在 `ArcSwap` 快照中：读者无锁加载，写者基于当前快照校验并构建新快照，
//! 通过 compare-and-swap 发布；若期间快照已变化，则基于新快照重新校验并重试。

use arc_swap::ArcSwap;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    audit::{self, RoleAuditAction},
    catalog::{check_system_roles, PermissionCatalog, SystemRoleDefinition},
    error::{AuthzError, ProtectedOperation, Result, ValidationError},
    models::{permission::PermissionSet, role::*},
};

/// Point-in-time view of every role, including archived ones.
#[derive(Debug, Clone, Default)]
pub struct RoleSnapshot {
    version: u64,
    roles: Vec<Role>,
}

impl RoleSnapshot {
    /// Incremented on every committed change
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Storage order: system roles in declared order, then custom roles by creation
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn get(&self, role_id: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == role_id)
    }

    pub fn active(&self) -> impl Iterator<Item = &Role> + '_ {
        self.roles.iter().filter(|r| r.is_active())
    }

    /// Roles referenced by id; unknown ids are skipped
    pub fn resolve<'a, I, S>(&'a self, role_ids: I) -> Vec<&'a Role>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        role_ids
            .into_iter()
            .filter_map(|id| self.get(id.as_ref()))
            .collect()
    }

    fn position(&self, role_id: &str) -> Option<usize> {
        self.roles.iter().position(|r| r.id == role_id)
    }

    fn active_position(&self, role_id: &str) -> Result<usize> {
        match self.position(role_id) {
            Some(i) if self.roles[i].is_active() => Ok(i),
            _ => Err(AuthzError::NotFound(role_id.to_string())),
        }
    }

    fn name_taken(&self, name: &str, exclude_id: Option<&str>) -> bool {
        let key = name_key(name);
        self.active()
            .any(|r| Some(r.id.as_str()) != exclude_id && r.name_key() == key)
    }
}

pub struct RoleRepository {
    catalog: Arc<PermissionCatalog>,
    rules: RoleRules,
    state: ArcSwap<RoleSnapshot>,
}

impl RoleRepository {
    /// 创建空的角色存储
    pub fn new(catalog: Arc<PermissionCatalog>, rules: RoleRules) -> Self {
        Self {
            catalog,
            rules,
            state: ArcSwap::from_pointee(RoleSnapshot::default()),
        }
    }

    /// Bootstrap a store seeded with system roles. This is the only way a
    /// role gets `is_system = true` besides rehydrating persisted records.
    pub fn with_system_roles(
        catalog: Arc<PermissionCatalog>,
        rules: RoleRules,
        definitions: &[SystemRoleDefinition],
    ) -> Result<Self> {
        check_system_roles(&catalog, definitions)?;

        let repo = Self::new(catalog, rules);
        let mut snapshot = RoleSnapshot::default();
        let now = Utc::now();

        for definition in definitions {
            let permission_ids = definition.permissions.resolve(&repo.catalog);
            let name = repo.validate(&snapshot, &definition.name, &permission_ids, None)?;
            snapshot.roles.push(Role {
                id: definition.id.clone(),
                name,
                description: definition.description.clone(),
                is_system: true,
                permission_ids,
                is_archived: false,
                user_count: 0,
                version: 1,
                created_at: now,
                updated_at: now,
            });
        }

        tracing::info!(system_roles = snapshot.roles.len(), "Role store bootstrapped");
        repo.state.store(Arc::new(snapshot));
        Ok(repo)
    }

    /// Rehydrate from records held by an external store, re-checking invariants.
    /// System roles keep the order they arrive in.
    pub fn from_records(
        catalog: Arc<PermissionCatalog>,
        rules: RoleRules,
        records: Vec<Role>,
    ) -> Result<Self> {
        Self::from_records_with_system_roles(catalog, rules, &[], records)
    }

    /// Same as [`from_records`](Self::from_records), but system roles are
    /// listed in the order of `definitions`, matching a freshly bootstrapped
    /// store. System records not named there follow in record order.
    pub fn from_records_with_system_roles(
        catalog: Arc<PermissionCatalog>,
        rules: RoleRules,
        definitions: &[SystemRoleDefinition],
        records: Vec<Role>,
    ) -> Result<Self> {
        let repo = Self::new(catalog, rules);
        let mut snapshot = RoleSnapshot::default();
        let mut ids = HashSet::new();

        for mut role in records {
            if !ids.insert(role.id.clone()) {
                return Err(AuthzError::Config(format!("Duplicate role id in records: {}", role.id)));
            }
            if role.is_system && role.is_archived {
                return Err(AuthzError::Config(format!(
                    "System role cannot be archived in records: {}",
                    role.id
                )));
            }
            // 已归档角色不参与名称唯一性校验
            let name = if role.is_archived {
                repo.validate_fields(&role.name, &role.permission_ids)?
            } else {
                repo.validate(&snapshot, &role.name, &role.permission_ids, None)?
            };
            role.name = name;
            snapshot.roles.push(role);
        }

        // 系统角色始终排在前面，按定义顺序
        let rank = |role: &Role| -> usize {
            if !role.is_system {
                return definitions.len() + 1;
            }
            definitions
                .iter()
                .position(|d| d.id == role.id)
                .unwrap_or(definitions.len())
        };
        snapshot.roles.sort_by_key(rank);
        tracing::info!(roles = snapshot.roles.len(), "Role store loaded from records");
        repo.state.store(Arc::new(snapshot));
        Ok(repo)
    }

    pub fn catalog(&self) -> &Arc<PermissionCatalog> {
        &self.catalog
    }

    pub fn rules(&self) -> RoleRules {
        self.rules
    }

    /// Lock-free read of the current state
    pub fn snapshot(&self) -> Arc<RoleSnapshot> {
        self.state.load_full()
    }

    // ==================== Queries ====================

    /// 根据 ID 查找角色（包括已归档）
    pub fn get(&self, role_id: &str) -> Option<Role> {
        self.state.load().get(role_id).cloned()
    }

    /// 根据名称查找活跃角色（大小写无关）
    pub fn find_by_name(&self, name: &str) -> Option<Role> {
        let key = name_key(name);
        self.state.load().active().find(|r| r.name_key() == key).cloned()
    }

    /// Presentation order: system roles first in declared order, then custom
    /// roles by descending `user_count` (ties keep creation order).
    pub fn list(&self, include_archived: bool) -> Vec<Role> {
        let snapshot = self.state.load();
        let visible = |r: &&Role| include_archived || r.is_active();

        let mut custom: Vec<Role> = snapshot
            .roles
            .iter()
            .filter(visible)
            .filter(|r| !r.is_system)
            .cloned()
            .collect();
        custom.sort_by(|a, b| b.user_count.cmp(&a.user_count));

        snapshot
            .roles
            .iter()
            .filter(visible)
            .filter(|r| r.is_system)
            .cloned()
            .chain(custom)
            .collect()
    }

    // ==================== Mutations ====================

    /// 创建角色
    pub fn create(&self, req: CreateRoleRequest) -> Result<Role> {
        let id = Uuid::new_v4().to_string();

        let role = self.commit(RoleAuditAction::RoleCreate, |snapshot, roles| {
            let name = self.validate(snapshot, &req.name, &req.permission_ids, None)?;
            let now = Utc::now();
            let role = Role {
                id: id.clone(),
                name,
                description: req.description.trim().to_string(),
                is_system: false,
                permission_ids: req.permission_ids.clone(),
                is_archived: false,
                user_count: 0,
                version: 1,
                created_at: now,
                updated_at: now,
            };
            roles.push(role.clone());
            Ok(role)
        })?;

        tracing::info!(role_id = %role.id, name = %role.name, "Role created");
        Ok(role)
    }

    /// 更新角色。系统角色可修改描述与权限，但不能改名。
    pub fn update(&self, role_id: &str, req: UpdateRoleRequest) -> Result<Role> {
        let role = self.commit(RoleAuditAction::RoleUpdate, |snapshot, roles| {
            let index = snapshot.active_position(role_id)?;
            let current = &snapshot.roles[index];

            if let Some(expected) = req.expected_version {
                if expected != current.version {
                    return Err(AuthzError::VersionConflict {
                        role_id: role_id.to_string(),
                        expected,
                        actual: current.version,
                    });
                }
            }

            if current.is_system && req.name.trim() != current.name {
                return Err(AuthzError::SystemRoleProtected {
                    role_id: role_id.to_string(),
                    operation: ProtectedOperation::Rename,
                });
            }

            let name = self.validate(snapshot, &req.name, &req.permission_ids, Some(role_id))?;
            let role = &mut roles[index];
            role.name = name;
            role.description = req.description.trim().to_string();
            role.permission_ids = req.permission_ids.clone();
            role.version += 1;
            role.updated_at = Utc::now();
            Ok(role.clone())
        })
        .inspect_err(|e| tracing::warn!(role_id = %role_id, error = %e, "Role update rejected"))?;

        tracing::info!(role_id = %role.id, name = %role.name, version = role.version, "Role updated");
        Ok(role)
    }

    /// 复制角色。名称冲突时追加序号；最大长度连一个字符都放不下时返回 NameTooLong。
    pub fn duplicate(&self, role_id: &str) -> Result<Role> {
        let id = Uuid::new_v4().to_string();

        let role = self.commit(RoleAuditAction::RoleDuplicate, |snapshot, roles| {
            let index = snapshot.active_position(role_id)?;
            let source = &snapshot.roles[index];
            let now = Utc::now();
            let role = Role {
                id: id.clone(),
                name: self.copy_name(snapshot, &source.name)?,
                description: source.description.clone(),
                is_system: false,
                permission_ids: source.permission_ids.clone(),
                is_archived: false,
                user_count: 0,
                version: 1,
                created_at: now,
                updated_at: now,
            };
            roles.push(role.clone());
            Ok(role)
        })?;

        tracing::info!(source_id = %role_id, role_id = %role.id, name = %role.name, "Role duplicated");
        Ok(role)
    }

    /// 归档角色（软删除）
    pub fn archive(&self, role_id: &str) -> Result<()> {
        self.commit(RoleAuditAction::RoleArchive, |snapshot, roles| {
            let index = snapshot.active_position(role_id)?;
            Self::guard_system(&snapshot.roles[index], ProtectedOperation::Archive)?;

            let role = &mut roles[index];
            role.is_archived = true;
            role.version += 1;
            role.updated_at = Utc::now();
            Ok(role.clone())
        })
        .inspect_err(|e| tracing::warn!(role_id = %role_id, error = %e, "Role archive rejected"))?;

        tracing::info!(role_id = %role_id, "Role archived");
        Ok(())
    }

    /// 恢复已归档角色；若名称已被占用则失败
    pub fn restore(&self, role_id: &str) -> Result<Role> {
        let role = self.commit(RoleAuditAction::RoleRestore, |snapshot, roles| {
            let index = match snapshot.position(role_id) {
                Some(i) if snapshot.roles[i].is_archived => i,
                _ => return Err(AuthzError::NotFound(role_id.to_string())),
            };
            let name = &snapshot.roles[index].name;
            if snapshot.name_taken(name, Some(role_id)) {
                return Err(ValidationError::NameTaken(name.clone()).into());
            }

            let role = &mut roles[index];
            role.is_archived = false;
            role.version += 1;
            role.updated_at = Utc::now();
            Ok(role.clone())
        })?;

        tracing::info!(role_id = %role_id, name = %role.name, "Role restored");
        Ok(role)
    }

    /// 删除角色（不可恢复）。不会修改外部的用户-角色绑定。
    pub fn delete(&self, role_id: &str) -> Result<()> {
        let removed = self
            .commit(RoleAuditAction::RoleDelete, |snapshot, roles| {
                let index = snapshot.active_position(role_id)?;
                Self::guard_system(&snapshot.roles[index], ProtectedOperation::Delete)?;
                Ok(roles.remove(index))
            })
            .inspect_err(|e| tracing::warn!(role_id = %role_id, error = %e, "Role delete rejected"))?;

        if removed.user_count > 0 {
            tracing::warn!(
                role_id = %role_id,
                user_count = removed.user_count,
                "Deleted role is still assigned to users; assignments must be reconciled by the caller"
            );
        }
        tracing::info!(role_id = %role_id, name = %removed.name, "Role deleted");
        Ok(())
    }

    /// 刷新外部分配关系的缓存计数
    pub fn set_user_count(&self, role_id: &str, user_count: u64) -> Result<Role> {
        self.commit(RoleAuditAction::RoleUserCount, |snapshot, roles| {
            let index = snapshot
                .position(role_id)
                .ok_or_else(|| AuthzError::NotFound(role_id.to_string()))?;
            // 计数不是编辑内容，不推进版本号
            let role = &mut roles[index];
            role.user_count = user_count;
            Ok(role.clone())
        })
    }

    // ==================== Internals ====================

    /// Optimistic commit: `apply` edits a copy of the current roles; the result
    /// is published only if no other writer committed in between.
    fn commit<T, F>(&self, action: RoleAuditAction, mut apply: F) -> Result<T>
    where
        T: AuditedChange,
        F: FnMut(&RoleSnapshot, &mut Vec<Role>) -> Result<T>,
    {
        loop {
            let current = self.state.load_full();
            let mut roles = current.roles.clone();
            let outcome = apply(&current, &mut roles)?;

            let next = Arc::new(RoleSnapshot {
                version: current.version + 1,
                roles,
            });
            let active = next.active().count();
            let previous = self.state.compare_and_swap(&current, next);

            if Arc::ptr_eq(&*previous, &current) {
                audit::record(action, outcome.audited_role());
                metrics::counter!("role_mutations_total", "operation" => action.as_str()).increment(1);
                metrics::gauge!("roles_active").set(active as f64);
                return Ok(outcome);
            }

            tracing::debug!(action = action.as_str(), "Role snapshot changed concurrently, retrying");
        }
    }

    fn guard_system(role: &Role, operation: ProtectedOperation) -> Result<()> {
        if role.is_system {
            return Err(AuthzError::SystemRoleProtected {
                role_id: role.id.clone(),
                operation,
            });
        }
        Ok(())
    }

    /// Returns the trimmed name on success.
    fn validate(
        &self,
        snapshot: &RoleSnapshot,
        name: &str,
        permission_ids: &PermissionSet,
        exclude_id: Option<&str>,
    ) -> Result<String> {
        let name = self.validate_fields(name, permission_ids)?;
        if snapshot.name_taken(&name, exclude_id) {
            return Err(ValidationError::NameTaken(name).into());
        }
        Ok(name)
    }

    fn validate_fields(&self, name: &str, permission_ids: &PermissionSet) -> Result<String> {
        let name = name.trim();
        let length = name.chars().count();
        if length < self.rules.name_min_length {
            return Err(ValidationError::NameTooShort {
                min: self.rules.name_min_length,
            }
            .into());
        }
        if length > self.rules.name_max_length {
            return Err(ValidationError::NameTooLong {
                max: self.rules.name_max_length,
            }
            .into());
        }
        if permission_ids.is_empty() {
            return Err(ValidationError::EmptyPermissions.into());
        }
        if let Some(unknown) = permission_ids.iter().find(|id| !self.catalog.exists(id)) {
            return Err(ValidationError::UnknownPermission(unknown.clone()).into());
        }
        Ok(name.to_string())
    }

    /// "<name> (Copy)", then "<name> (Copy 2)", "<name> (Copy 3)", ...
    ///
    /// At least one character of the original name is kept. When the
    /// configured maximum leaves no room for that, duplication fails with
    /// `NameTooLong` instead of storing an out-of-bounds name.
    fn copy_name(&self, snapshot: &RoleSnapshot, original: &str) -> Result<String> {
        let max = self.rules.name_max_length;
        let mut attempt = 1u64;
        loop {
            let suffix = if attempt == 1 {
                " (Copy)".to_string()
            } else {
                format!(" (Copy {})", attempt)
            };
            let room = max.saturating_sub(suffix.chars().count());
            let stem: String = original.trim().chars().take(room).collect();
            let stem = stem.trim_end();
            if stem.is_empty() {
                return Err(ValidationError::NameTooLong { max }.into());
            }
            let candidate = format!("{}{}", stem, suffix);

            if !snapshot.name_taken(&candidate, None) {
                return Ok(candidate);
            }
            attempt += 1;
        }
    }
}

/// Commit outcomes expose the role the audit event describes.
trait AuditedChange {
    fn audited_role(&self) -> &Role;
}

impl AuditedChange for Role {
    fn audited_role(&self) -> &Role {
        self
    }
}
