//! 配置系统
//! 从环境变量加载所有配置（前缀 HRAUTHZ_）

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::models::role::RoleRules;

/// 最短的复制名称 "X (Copy)" 的长度
const MIN_COPY_NAME_LENGTH: usize = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty, compact
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleConfig {
    /// 角色名称最小长度（去除首尾空白后）
    pub name_min_length: usize,
    /// 角色名称最大长度
    pub name_max_length: usize,
    /// 能力摘要最多显示条数
    pub summary_max_items: usize,
}

impl RoleConfig {
    pub fn rules(&self) -> RoleRules {
        RoleRules {
            name_min_length: self.name_min_length,
            name_max_length: self.name_max_length,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// 权限目录 JSON 文件路径；为空时使用内置目录
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub roles: RoleConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
            roles: RoleConfig {
                name_min_length: 2,
                name_max_length: 64,
                summary_max_items: 5,
            },
            catalog: CatalogConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("roles.name_min_length", 2)?
            .set_default("roles.name_max_length", 64)?
            .set_default("roles.summary_max_items", 5)?
            .add_source(
                Environment::with_prefix("HRAUTHZ")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = settings.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" | "compact" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty, compact",
                    self.logging.format
                )))
            }
        }

        if self.roles.name_min_length < 1 {
            return Err(ConfigError::Message(
                "roles.name_min_length must be at least 1".to_string(),
            ));
        }

        if self.roles.name_max_length < self.roles.name_min_length
            || self.roles.name_max_length > 256
        {
            return Err(ConfigError::Message(
                "roles.name_max_length must be between name_min_length and 256".to_string(),
            ));
        }

        // 复制出的名称至少是 "X (Copy)"
        if self.roles.name_max_length < MIN_COPY_NAME_LENGTH {
            return Err(ConfigError::Message(format!(
                "roles.name_max_length must be at least {}",
                MIN_COPY_NAME_LENGTH
            )));
        }

        if self.roles.summary_max_items < 1 || self.roles.summary_max_items > 50 {
            return Err(ConfigError::Message(
                "roles.summary_max_items must be between 1 and 50".to_string(),
            ));
        }

        Ok(())
    }
}
