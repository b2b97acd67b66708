//! 数据模型模块
//! 权限目录、角色与能力摘要

pub mod capability;
pub mod permission;
pub mod role;

pub use capability::*;
pub use permission::*;
pub use role::*;
