//! HR 控制台权限引擎
//! 权限目录、角色存储、权限选择、能力摘要与权限检查

pub mod audit;
pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod telemetry;

pub use bootstrap::{bootstrap, AccessControl};
pub use error::{AuthzError, Result};
