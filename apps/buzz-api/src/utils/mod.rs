//! 工具模块：错误映射、cookie 构造、DTO 转换

pub mod cookies;
pub mod error;
pub mod response;
