//! 会话模块
//!
//! 所有守卫都通过注入的 [`Session`] 读写凭据，不再直接访问全局存储键。
//! 登录时令牌同时写入持久化存储和请求 cookie，边缘网关与页面内守卫因此读取同一份凭据。

use std::fmt;

use clinica_shared::role::{self, CredentialSnapshot, Resolution};
use clinica_shared::{
    AdminAuth, Role, STORAGE_ADMIN_AUTH_KEY, STORAGE_TOKEN_KEY, STORAGE_USER_KEY, UserProfile,
};
use leptos::logging::warn;
use leptos::prelude::*;

use crate::api::{ApiError, ClinicApi, SignupRequest};
use crate::web::{DocumentCookie, LocalStorage};

/// 持久化键值存储（浏览器中为 LocalStorage）
pub trait CredentialStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str) -> bool;
}

/// 请求级令牌存储（浏览器中为 document.cookie）
pub trait CookieJar {
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: &str);
    fn clear_token(&self);
}

/// 登录/注册成功后写入的凭据
#[derive(Debug, Clone)]
pub enum SessionGrant {
    Clinic {
        token: String,
        user: Option<UserProfile>,
    },
    Admin {
        token: String,
        auth: AdminAuth,
    },
}

#[derive(Debug)]
pub enum SessionError {
    /// 凭据序列化失败
    Encode(String),
    /// 存储拒绝写入
    StoreUnavailable(&'static str),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Encode(msg) => write!(f, "failed to encode credential: {}", msg),
            SessionError::StoreUnavailable(key) => write!(f, "storage rejected key '{}'", key),
        }
    }
}

impl std::error::Error for SessionError {}

/// 注入式会话对象
#[derive(Debug, Clone, Copy)]
pub struct Session<S, J> {
    store: S,
    jar: J,
}

impl<S: CredentialStore, J: CookieJar> Session<S, J> {
    pub fn new(store: S, jar: J) -> Self {
        Self { store, jar }
    }

    /// 读取一次完整的凭据快照
    pub fn credential(&self) -> CredentialSnapshot {
        CredentialSnapshot {
            token: self.store.read(STORAGE_TOKEN_KEY),
            admin_auth: self.store.read(STORAGE_ADMIN_AUTH_KEY),
            user: self.store.read(STORAGE_USER_KEY),
        }
    }

    /// 请求 cookie 中的令牌（边缘网关读取的那一份）
    pub fn request_token(&self) -> Option<String> {
        self.jar.token().filter(|t| !t.is_empty())
    }

    pub fn resolve(&self) -> Resolution {
        let resolution = role::resolve(&self.credential());
        if let Some(err) = &resolution.error {
            warn!("[Session] {} (resolved as {})", err, resolution.role);
        }
        resolution
    }

    /// 写入失败时清空全部凭据，不留下半套会话
    pub fn sign_in(&self, grant: SessionGrant) -> Result<(), SessionError> {
        let result = self.store_grant(grant);
        if result.is_err() {
            self.clear();
        }
        result
    }

    fn store_grant(&self, grant: SessionGrant) -> Result<(), SessionError> {
        match grant {
            SessionGrant::Clinic { token, user } => {
                let user = serde_json_wasm::to_string(&user.unwrap_or_default())
                    .map_err(|e| SessionError::Encode(e.to_string()))?;
                // 旧的管理员凭据会压过新的普通凭据，必须先清除
                self.store.remove(STORAGE_ADMIN_AUTH_KEY);
                self.put(STORAGE_TOKEN_KEY, &token)?;
                self.put(STORAGE_USER_KEY, &user)?;
                self.jar.set_token(&token);
            }
            SessionGrant::Admin { token, auth } => {
                let auth = serde_json_wasm::to_string(&auth)
                    .map_err(|e| SessionError::Encode(e.to_string()))?;
                self.put(STORAGE_TOKEN_KEY, &token)?;
                self.put(STORAGE_ADMIN_AUTH_KEY, &auth)?;
                self.jar.set_token(&token);
            }
        }
        Ok(())
    }

    /// 注销或会话失效：同时清除持久化存储与 cookie
    pub fn clear(&self) {
        self.store.remove(STORAGE_TOKEN_KEY);
        self.store.remove(STORAGE_ADMIN_AUTH_KEY);
        self.store.remove(STORAGE_USER_KEY);
        self.jar.clear_token();
    }

    /// 让 cookie 与持久化存储中的令牌保持一致
    pub fn sync_cookie(&self) {
        match self.credential().token() {
            Some(token) if self.request_token().as_deref() != Some(token) => {
                self.jar.set_token(token)
            }
            Some(_) => {}
            None if self.request_token().is_some() => self.jar.clear_token(),
            None => {}
        }
    }

    fn put(&self, key: &'static str, value: &str) -> Result<(), SessionError> {
        if self.store.write(key, value) {
            Ok(())
        } else {
            Err(SessionError::StoreUnavailable(key))
        }
    }
}

// =========================================================
// Leptos 认证上下文
// =========================================================

pub type BrowserSession = Session<LocalStorage, DocumentCookie>;

/// 认证状态
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub role: Role,
    /// 镜像到 cookie 的令牌
    pub request_token: Option<String>,
    /// 首次读取存储之前为 true
    pub is_loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            role: Role::None,
            request_token: None,
            is_loading: true,
        }
    }
}

impl AuthState {
    pub fn has_token(&self) -> bool {
        self.request_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// 认证上下文
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: ReadSignal<AuthState>,
    pub set_state: WriteSignal<AuthState>,
    pub session: BrowserSession,
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self {
            state,
            set_state,
            session: Session::new(LocalStorage, DocumentCookie),
        }
    }

    /// 是否持有请求令牌（与边缘网关的判断一致）
    pub fn has_token_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().has_token())
    }

    /// 请求令牌信号（注入路由服务）
    pub fn request_token_signal(&self) -> Signal<Option<String>> {
        let state = self.state;
        Signal::derive(move || state.get().request_token)
    }

    /// 重新读取存储并更新状态
    pub fn refresh(&self) {
        let role = self.session.resolve().role;
        let request_token = self.session.request_token();
        self.set_state.set(AuthState {
            role,
            request_token,
            is_loading: false,
        });
    }

    pub fn sign_in(&self, grant: SessionGrant) -> Result<(), SessionError> {
        let result = self.session.sign_in(grant);
        self.refresh();
        result
    }

    pub fn logout(&self) {
        self.session.clear();
        self.refresh();
    }

    /// API 返回 401 时调用；返回会话是否被清除
    ///
    /// 路由服务监听认证状态，受保护页面会自动跳转到登录页。
    pub fn handle_api_error(&self, err: &ApiError) -> bool {
        if matches!(err, ApiError::Unauthorized) {
            warn!("[Session] API rejected the credential, clearing session");
            self.logout();
            true
        } else {
            false
        }
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
pub fn init_auth(ctx: &AuthContext) {
    ctx.session.sync_cookie();
    ctx.refresh();
}

// =========================================================
// 登录流程
// =========================================================

pub async fn login(
    ctx: &AuthContext,
    api: &ClinicApi,
    email: String,
    password: String,
) -> Result<(), String> {
    let resp = api.login(&email, &password).await.map_err(|e| e.to_string())?;
    ctx.sign_in(SessionGrant::Clinic {
        token: resp.token,
        user: resp.user,
    })
    .map_err(|e| e.to_string())
}

pub async fn signup(
    ctx: &AuthContext,
    api: &ClinicApi,
    req: SignupRequest,
) -> Result<(), String> {
    let resp = api.signup(&req).await.map_err(|e| e.to_string())?;
    ctx.sign_in(SessionGrant::Clinic {
        token: resp.token,
        user: resp.user,
    })
    .map_err(|e| e.to_string())
}

pub async fn admin_login(
    ctx: &AuthContext,
    api: &ClinicApi,
    email: String,
    password: String,
) -> Result<(), String> {
    let resp = api
        .admin_login(&email, &password)
        .await
        .map_err(|e| e.to_string())?;
    ctx.sign_in(SessionGrant::Admin {
        token: resp.token.clone(),
        auth: AdminAuth {
            role: resp.role,
            token: Some(resp.token),
            email: Some(email),
        },
    })
    .map_err(|e| e.to_string())
}
