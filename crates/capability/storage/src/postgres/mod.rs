//! # PostgreSQL 存储实现模块
//!
//! 本模块提供用户与达人资料存储的 PostgreSQL 实现，用于生产环境。
//!
//! ## 设计原则
//!
//! 1. **参数化查询**：所有 SQL 查询使用参数绑定（`$1`, `$2` 等），禁止字符串拼接
//! 2. **唯一性由数据库保证**：`users.email`、`users.google_id`、`profiles.owner_id`
//!    均为唯一索引，并发写入的失败方收到冲突错误
//! 3. **文档分区**：Profile 的六个分区以 JSONB 存储，结构由 `domain` 中的类型约束
//!
//! ## 数据库模式要求
//!
//! 见 `migrations/0001_init.sql`：
//! - `users`：user_id, email, password_hash, full_name, google_id, refresh_token, created_at, updated_at
//! - `profiles`：profile_id, owner_id, 六个 JSONB 分区, profile_picture, created_at, updated_at
//!
//! ## 查询优化
//! - 使用 `fetch_optional` 处理可能不存在的记录
//! - 使用 `RETURNING` 子句在写入后返回数据，减少额外查询

pub mod profile;
pub mod user;

pub use profile::*;
pub use user::*;
