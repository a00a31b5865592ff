//! 诊所前端与边缘网关共享的会话/授权逻辑
//!
//! - `route`: 公开路径表与路由分类
//! - `role`: 凭据快照与角色解析
//! - `decision`: 网关与守卫共用的决策函数
//! - `cookie`: 令牌 cookie 的读写

pub mod cookie;
pub mod decision;
pub mod role;
pub mod route;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 持久化存储中的普通令牌
pub const STORAGE_TOKEN_KEY: &str = "token";
/// 持久化存储中的管理员凭据
pub const STORAGE_ADMIN_AUTH_KEY: &str = "adminAuth";
/// 持久化存储中的用户资料
pub const STORAGE_USER_KEY: &str = "user";

pub use decision::{GateDecision, GuardState, Redirect};
pub use role::{AdminAuth, AdminRole, CredentialSnapshot, Resolution, Role, UserProfile};
pub use route::{PrefixMatch, RouteClass, RouteTable};
