//! 统一错误模型
//! 定义角色与权限引擎的所有错误类型

use thiserror::Error;

/// 角色输入校验错误（调用方修正输入后可重试）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Role name must be at least {min} characters")]
    NameTooShort { min: usize },

    #[error("Role name must be at most {max} characters")]
    NameTooLong { max: usize },

    #[error("A role named '{0}' already exists")]
    NameTaken(String),

    #[error("A role must grant at least one permission")]
    EmptyPermissions,

    #[error("Unknown permission: {0}")]
    UnknownPermission(String),
}

/// 权限目录定义错误（仅在启动阶段出现）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Duplicate permission domain: {0}")]
    DuplicateDomain(String),

    #[error("Duplicate permission id: {0}")]
    DuplicatePermission(String),

    #[error("Permission id '{permission_id}' must have the form '{domain_id}.<action>'")]
    MalformedPermissionId {
        domain_id: String,
        permission_id: String,
    },

    #[error("Permission domain '{0}' has no permissions")]
    EmptyDomain(String),

    #[error("Permission declared before any domain: {0}")]
    OrphanPermission(String),

    #[error("System role '{role_id}' references unknown permission '{permission_id}'")]
    UnknownSystemRolePermission {
        role_id: String,
        permission_id: String,
    },

    #[error("Duplicate system role: {0}")]
    DuplicateSystemRole(String),
}

/// 受保护的系统角色操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectedOperation {
    Archive,
    Delete,
    Rename,
}

impl ProtectedOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtectedOperation::Archive => "archive",
            ProtectedOperation::Delete => "delete",
            ProtectedOperation::Rename => "rename",
        }
    }
}

impl std::fmt::Display for ProtectedOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 引擎错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Role not found: {0}")]
    NotFound(String),

    #[error("System role '{role_id}' cannot be {operation}d")]
    SystemRoleProtected {
        role_id: String,
        operation: ProtectedOperation,
    },

    #[error("Role '{role_id}' was modified concurrently (expected version {expected}, found {actual})")]
    VersionConflict {
        role_id: String,
        expected: u64,
        actual: u64,
    },

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuthzError {
    /// 对应的 HTTP 状态码（供表现层映射）
    pub fn code(&self) -> u16 {
        match self {
            AuthzError::Validation(_) => 400,
            AuthzError::SystemRoleProtected { .. } => 403,
            AuthzError::NotFound(_) => 404,
            AuthzError::VersionConflict { .. } => 409,
            AuthzError::Catalog(_) | AuthzError::Config(_) => 500,
        }
    }

    /// 稳定的机器可读错误码
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthzError::Validation(_) => "VALIDATION_ERROR",
            AuthzError::NotFound(_) => "NOT_FOUND",
            AuthzError::SystemRoleProtected { .. } => "SYSTEM_ROLE_PROTECTED",
            AuthzError::VersionConflict { .. } => "VERSION_CONFLICT",
            AuthzError::Catalog(_) => "CATALOG_ERROR",
            AuthzError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// 获取用户友好的错误消息（不包含内部细节）
    pub fn user_message(&self) -> String {
        match self {
            AuthzError::Validation(e) => e.to_string(),
            AuthzError::NotFound(_) => "Role not found".to_string(),
            AuthzError::SystemRoleProtected { operation, .. } => match operation {
                ProtectedOperation::Rename => "System roles cannot be renamed".to_string(),
                ProtectedOperation::Archive => "System roles cannot be archived".to_string(),
                ProtectedOperation::Delete => "System roles cannot be deleted".to_string(),
            },
            AuthzError::VersionConflict { .. } => {
                "This role was changed by someone else. Reload and try again".to_string()
            }
            AuthzError::Catalog(_) => "Permission catalog error".to_string(),
            AuthzError::Config(_) => "Configuration error".to_string(),
        }
    }

    /// 只有版本冲突可以在重新加载后重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthzError::VersionConflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, AuthzError>;

impl From<config::ConfigError> for AuthzError {
    fn from(e: config::ConfigError) -> Self {
        AuthzError::Config(e.to_string())
    }
}

impl From<std::io::Error> for AuthzError {
    fn from(e: std::io::Error) -> Self {
        AuthzError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for AuthzError {
    fn from(e: serde_json::Error) -> Self {
        AuthzError::Config(e.to_string())
    }
}
