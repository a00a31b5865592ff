use std::fmt;

use clinica_shared::{AdminRole, UserProfile};
use gloo_net::http::{Request, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

const DEFAULT_API_URL: &str = "/api";

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    Network(String),
    /// 401：凭据被后端拒绝，会话应当失效
    Unauthorized,
    Status(u16),
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Falha de conexão: {}", msg),
            ApiError::Unauthorized => write!(f, "Sessão expirada. Entre novamente."),
            ApiError::Status(code) => write!(f, "Erro do servidor ({})", code),
            ApiError::Decode(msg) => write!(f, "Resposta inválida: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// 将 HTTP 状态码映射为结果
pub fn check_status(status: u16) -> Result<(), ApiError> {
    match status {
        200..=299 => Ok(()),
        401 => Err(ApiError::Unauthorized),
        code => Err(ApiError::Status(code)),
    }
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub clinic_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub role: AdminRole,
}

#[derive(Debug, Serialize)]
struct ActivationRequest<'a> {
    key: &'a str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClinicApi {
    pub base_url: String,
}

impl ClinicApi {
    pub fn new(base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// 使用编译期 `CLINICA_API_URL`，缺省为同源 `/api`
    pub fn from_env() -> Self {
        Self::new(option_env!("CLINICA_API_URL").unwrap_or(DEFAULT_API_URL).to_string())
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn with_bearer(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let res = Self::with_bearer(Request::post(&self.url(path)), token)
            .json(body)
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        check_status(res.status())?;
        res.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.post_json("/auth/login", &Credentials { email, password }, None)
            .await
    }

    pub async fn signup(&self, req: &SignupRequest) -> Result<LoginResponse, ApiError> {
        self.post_json("/auth/register", req, None).await
    }

    pub async fn admin_login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AdminLoginResponse, ApiError> {
        self.post_json("/admin/auth/login", &Credentials { email, password }, None)
            .await
    }

    /// 兑换激活码
    pub async fn redeem_activation_key(&self, token: &str, key: &str) -> Result<(), ApiError> {
        let res = Self::with_bearer(Request::post(&self.url("/activation/redeem")), Some(token))
            .json(&ActivationRequest { key })
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        check_status(res.status())
    }
}
