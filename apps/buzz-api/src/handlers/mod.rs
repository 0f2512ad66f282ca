//! Handlers 模块

pub mod health;
pub mod oauth;
pub mod profiles;
pub mod users;

pub use health::*;
pub use oauth::*;
pub use profiles::*;
pub use users::*;
