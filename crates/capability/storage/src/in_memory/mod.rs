//! 内存存储实现模块
//!
//! 仅用于本地演示和测试。
//!
//! 包含以下实现：
//! - UserStore: InMemoryUserStore
//! - ProfileStore: InMemoryProfileStore
//! - SessionStore: InMemorySessionStore

pub mod profile;
pub mod session;
pub mod user;

pub use profile::*;
pub use session::*;
pub use user::*;
