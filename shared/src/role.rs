//! 角色解析模块
//!
//! 角色从不单独存储，每次都从凭据快照推导。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 推导出的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Clinic,
    Admin,
    SuperAdmin,
    /// 没有可解析的凭据
    #[default]
    None,
}

impl Role {
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clinic => "clinic",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 管理员凭据中允许出现的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    Admin,
    SuperAdmin,
}

impl From<AdminRole> for Role {
    fn from(role: AdminRole) -> Self {
        match role {
            AdminRole::Admin => Role::Admin,
            AdminRole::SuperAdmin => Role::SuperAdmin,
        }
    }
}

/// `adminAuth` 键中保存的结构化管理员凭据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminAuth {
    pub role: AdminRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// `user` 键中保存的用户资料，`role` 缺省为 clinic
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// 一次性读取的凭据快照
///
/// 字段为原始字符串，解析在 [`resolve`] 中完成。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CredentialSnapshot {
    pub token: Option<String>,
    pub admin_auth: Option<String>,
    pub user: Option<String>,
}

impl CredentialSnapshot {
    /// 非空的普通令牌
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    fn admin_auth(&self) -> Option<&str> {
        self.admin_auth.as_deref().filter(|v| !v.is_empty())
    }

    fn user(&self) -> Option<&str> {
        self.user.as_deref().filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.token().is_none() && self.admin_auth().is_none() && self.user().is_none()
    }
}

/// 决定角色的凭据来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Admin,
    User,
    Token,
    Nothing,
}

/// 凭据解析失败
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialError {
    /// `adminAuth` 不是合法的管理员凭据
    MalformedAdmin(String),
    /// `user` 不是合法的用户资料
    MalformedUser(String),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::MalformedAdmin(msg) => write!(f, "malformed adminAuth: {}", msg),
            CredentialError::MalformedUser(msg) => write!(f, "malformed user: {}", msg),
        }
    }
}

impl std::error::Error for CredentialError {}

/// 角色解析结果
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub role: Role,
    pub source: CredentialSource,
    /// 解析过程中被容忍或拒绝的错误
    pub error: Option<CredentialError>,
}

impl Resolution {
    fn new(role: Role, source: CredentialSource) -> Self {
        Self {
            role,
            source,
            error: None,
        }
    }

    fn with_error(mut self, error: CredentialError) -> Self {
        self.error = Some(error);
        self
    }

    /// 管理员凭据存在但已损坏
    pub fn is_corrupt_admin(&self) -> bool {
        self.source == CredentialSource::Admin && self.error.is_some()
    }
}

pub fn parse_admin_auth(raw: &str) -> Result<AdminAuth, CredentialError> {
    serde_json::from_str(raw).map_err(|e| CredentialError::MalformedAdmin(e.to_string()))
}

pub fn parse_user(raw: &str) -> Result<UserProfile, CredentialError> {
    serde_json::from_str(raw).map_err(|e| CredentialError::MalformedUser(e.to_string()))
}

/// 按优先级解析角色，首个命中的规则生效：
///
/// 1. `adminAuth` 存在：解析成功取其角色，失败返回 `None`。
/// 2. 普通令牌或 `user` 存在：取 `user.role`，缺省或解析失败均为 `Clinic`。
/// 3. 否则返回 `None`。
pub fn resolve(snapshot: &CredentialSnapshot) -> Resolution {
    if snapshot.is_empty() {
        return Resolution::new(Role::None, CredentialSource::Nothing);
    }

    if let Some(raw) = snapshot.admin_auth() {
        return match parse_admin_auth(raw) {
            Ok(auth) => Resolution::new(auth.role.into(), CredentialSource::Admin),
            Err(e) => Resolution::new(Role::None, CredentialSource::Admin).with_error(e),
        };
    }

    if let Some(raw) = snapshot.user() {
        return match parse_user(raw) {
            Ok(profile) => Resolution::new(
                profile.role.unwrap_or(Role::Clinic),
                CredentialSource::User,
            ),
            Err(e) => Resolution::new(Role::Clinic, CredentialSource::User).with_error(e),
        };
    }

    Resolution::new(Role::Clinic, CredentialSource::Token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(token: Option<&str>, admin: Option<&str>, user: Option<&str>) -> CredentialSnapshot {
        CredentialSnapshot {
            token: token.map(String::from),
            admin_auth: admin.map(String::from),
            user: user.map(String::from),
        }
    }

    #[test]
    fn test_admin_credential_takes_precedence() {
        let snap = snapshot(
            Some("abc"),
            Some(r#"{"role":"super_admin"}"#),
            Some(r#"{"role":"clinic"}"#),
        );
        let res = resolve(&snap);
        assert_eq!(res.role, Role::SuperAdmin);
        assert_eq!(res.source, CredentialSource::Admin);
        assert!(res.error.is_none());
    }

    #[test]
    fn test_user_without_role_defaults_to_clinic() {
        let res = resolve(&snapshot(None, None, Some("{}")));
        assert_eq!(res.role, Role::Clinic);
        assert_eq!(res.source, CredentialSource::User);
    }

    #[test]
    fn test_no_credentials_is_none() {
        let res = resolve(&CredentialSnapshot::default());
        assert_eq!(res.role, Role::None);
        assert_eq!(res.source, CredentialSource::Nothing);
    }

    #[test]
    fn test_plain_token_is_clinic() {
        let res = resolve(&snapshot(Some("opaque"), None, None));
        assert_eq!(res.role, Role::Clinic);
        assert_eq!(res.source, CredentialSource::Token);
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let res = resolve(&snapshot(Some(""), None, None));
        assert_eq!(res.role, Role::None);
    }

    #[test]
    fn test_malformed_admin_is_rejected() {
        let res = resolve(&snapshot(Some("abc"), Some("{not json"), None));
        assert_eq!(res.role, Role::None);
        assert!(res.is_corrupt_admin());
        assert!(matches!(res.error, Some(CredentialError::MalformedAdmin(_))));
    }

    #[test]
    fn test_admin_credential_with_non_admin_role_is_rejected() {
        let res = resolve(&snapshot(None, Some(r#"{"role":"clinic"}"#), None));
        assert_eq!(res.role, Role::None);
        assert!(res.is_corrupt_admin());
    }

    #[test]
    fn test_malformed_user_is_tolerated_as_clinic() {
        let res = resolve(&snapshot(Some("abc"), None, Some("not json")));
        assert_eq!(res.role, Role::Clinic);
        assert!(!res.is_corrupt_admin());
        assert!(matches!(res.error, Some(CredentialError::MalformedUser(_))));
    }

    #[test]
    fn test_user_role_field_is_used() {
        let res = resolve(&snapshot(Some("abc"), None, Some(r#"{"role":"admin","name":"Ana"}"#)));
        assert_eq!(res.role, Role::Admin);
    }

    #[test]
    fn test_admin_auth_round_trips_through_json() {
        let auth = AdminAuth {
            role: AdminRole::Admin,
            token: Some("t".into()),
            email: None,
        };
        let raw = serde_json::to_string(&auth).unwrap();
        assert_eq!(raw, r#"{"role":"admin","token":"t"}"#);
        assert_eq!(parse_admin_auth(&raw).unwrap(), auth);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::SuperAdmin.to_string(), "super_admin");
        assert!(Role::Admin.is_elevated());
        assert!(!Role::Clinic.is_elevated());
    }
}
