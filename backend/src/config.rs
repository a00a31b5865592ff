//! 运行时配置
//!
//! 从 Worker 的 `[vars]` 读取配置，读不到时回退到默认值。

use clinica_shared::cookie::TOKEN_COOKIE;
use clinica_shared::{PrefixMatch, RouteTable};

const VAR_TOKEN_COOKIE: &str = "TOKEN_COOKIE_NAME";
const VAR_ROUTE_MATCH: &str = "ROUTE_MATCH";
const VAR_EXTRA_PUBLIC: &str = "EXTRA_PUBLIC_PREFIXES";
const VAR_ORIGIN_URL: &str = "ORIGIN_URL";

/// 抽象环境变量接口
pub trait EnvAdapter {
    fn var(&self, name: &str) -> Option<String>;
}

/// Worker Env 的 EnvAdapter 实现
pub struct WorkerEnv<'a>(pub &'a worker::Env);

impl<'a> EnvAdapter for WorkerEnv<'a> {
    fn var(&self, name: &str) -> Option<String> {
        self.0.var(name).ok().map(|v| v.to_string())
    }
}

/// 边缘网关配置
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// 携带令牌的 cookie 名称
    pub token_cookie: String,
    pub routes: RouteTable,
    /// 放行请求的源站；为空时原样透传请求
    pub origin_url: Option<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            token_cookie: TOKEN_COOKIE.to_string(),
            routes: RouteTable::default(),
            origin_url: None,
        }
    }
}

impl GateConfig {
    pub fn from_env<E: EnvAdapter>(env: &E) -> Self {
        let var = |name: &str| env.var(name).filter(|v| !v.trim().is_empty());

        let matching = match var(VAR_ROUTE_MATCH) {
            Some(raw) => PrefixMatch::parse(&raw).unwrap_or_else(|| {
                log_error!("[Config] Unknown {} value '{}', using raw", VAR_ROUTE_MATCH, raw);
                PrefixMatch::Raw
            }),
            None => PrefixMatch::Raw,
        };

        let mut routes = RouteTable::new(matching);
        if let Some(extra) = var(VAR_EXTRA_PUBLIC) {
            routes = routes.with_public_prefixes(extra.split(',').map(str::to_string));
        }

        Self {
            token_cookie: var(VAR_TOKEN_COOKIE).unwrap_or_else(|| TOKEN_COOKIE.to_string()),
            routes,
            origin_url: var(VAR_ORIGIN_URL).map(|url| url.trim_end_matches('/').to_string()),
        }
    }
}

// =========================================================
// 测试环境实现 (Mock)
// =========================================================

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Mock 环境变量适配器
    pub struct MockEnv {
        vars: HashMap<String, String>,
    }

    impl MockEnv {
        pub fn new() -> Self {
            Self {
                vars: HashMap::new(),
            }
        }

        pub fn with_var(mut self, name: &str, value: &str) -> Self {
            self.vars.insert(name.to_string(), value.to_string());
            self
        }
    }

    impl EnvAdapter for MockEnv {
        fn var(&self, name: &str) -> Option<String> {
            self.vars.get(name).cloned()
        }
    }

    #[test]
    fn test_defaults_when_env_is_empty() {
        let config = GateConfig::from_env(&MockEnv::new());
        assert_eq!(config.token_cookie, "token");
        assert_eq!(config.routes, RouteTable::default());
        assert!(config.origin_url.is_none());
    }

    #[test]
    fn test_reads_vars() {
        let env = MockEnv::new()
            .with_var(VAR_TOKEN_COOKIE, "session")
            .with_var(VAR_ROUTE_MATCH, "segment")
            .with_var(VAR_EXTRA_PUBLIC, "/blog, /faq")
            .with_var(VAR_ORIGIN_URL, "https://app.clinica.example/");
        let config = GateConfig::from_env(&env);

        assert_eq!(config.token_cookie, "session");
        assert_eq!(config.routes.matching(), PrefixMatch::Segment);
        assert!(config.routes.public_prefixes().iter().any(|p| p == "/faq"));
        assert_eq!(
            config.origin_url.as_deref(),
            Some("https://app.clinica.example")
        );
    }

    #[test]
    fn test_unknown_route_match_falls_back_to_raw() {
        let env = MockEnv::new().with_var(VAR_ROUTE_MATCH, "fuzzy");
        let config = GateConfig::from_env(&env);
        assert_eq!(config.routes.matching(), PrefixMatch::Raw);
    }

    #[test]
    fn test_blank_vars_are_ignored() {
        let env = MockEnv::new()
            .with_var(VAR_TOKEN_COOKIE, "  ")
            .with_var(VAR_ORIGIN_URL, "");
        let config = GateConfig::from_env(&env);
        assert_eq!(config.token_cookie, "token");
        assert!(config.origin_url.is_none());
    }
}
