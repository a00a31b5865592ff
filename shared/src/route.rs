//! 路由分类模块
//!
//! 静态的公开路径前缀表。未命中任何前缀的路径一律视为受保护（默认拒绝）。

use serde::{Deserialize, Serialize};

/// 公开路径前缀
pub const PUBLIC_PREFIXES: &[&str] = &[
    "/login",
    "/registro",
    "/home",
    "/",
    "/planos",
    "/planos/pagamento",
    "/escolher-plano",
    "/admin/login",
];

/// 登录/注册表单页：已认证用户应离开这些页面
pub const AUTH_FORM_PREFIXES: &[&str] = &["/login", "/registro"];

/// 静态资源与图片优化路径，完全绕过网关
pub const ASSET_PREFIXES: &[&str] = &["/pkg/", "/assets/", "/_image", "/favicon.ico"];

const ROOT: &str = "/";

/// 路由分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    Public,
    Protected,
}

/// 前缀匹配策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixMatch {
    /// 纯字符串前缀：`/planos-x` 命中 `/planos`
    #[default]
    Raw,
    /// 前缀必须结束于路径段边界：`/planos/x` 命中，`/planos-x` 不命中
    Segment,
}

impl PrefixMatch {
    /// 从配置字符串解析，未识别的值返回 `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "raw" => Some(Self::Raw),
            "segment" => Some(Self::Segment),
            _ => None,
        }
    }

    fn matches(&self, path: &str, prefix: &str) -> bool {
        // 根路径只精确匹配，否则所有路径都会变成公开路径
        if prefix == ROOT {
            return path == ROOT;
        }
        if !path.starts_with(prefix) {
            return false;
        }
        match self {
            Self::Raw => true,
            Self::Segment => {
                prefix.ends_with('/')
                    || matches!(path.as_bytes().get(prefix.len()), None | Some(b'/' | b'?' | b'#'))
            }
        }
    }
}

/// 路由表
///
/// 默认内容为 [`PUBLIC_PREFIXES`]，边缘网关可以通过配置追加前缀。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    public: Vec<String>,
    matching: PrefixMatch,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(PrefixMatch::default())
    }
}

impl RouteTable {
    pub fn new(matching: PrefixMatch) -> Self {
        Self {
            public: PUBLIC_PREFIXES.iter().map(|p| p.to_string()).collect(),
            matching,
        }
    }

    /// 追加公开前缀（忽略空白项和重复项）
    pub fn with_public_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for prefix in prefixes {
            let prefix = prefix.into().trim().to_string();
            if prefix.starts_with('/') && !self.public.contains(&prefix) {
                self.public.push(prefix);
            }
        }
        self
    }

    pub fn matching(&self) -> PrefixMatch {
        self.matching
    }

    pub fn public_prefixes(&self) -> &[String] {
        &self.public
    }

    /// 对路径分类：命中任一公开前缀即为公开，否则受保护
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.matched_prefix(path).is_some() {
            RouteClass::Public
        } else {
            RouteClass::Protected
        }
    }

    /// 返回命中的最长公开前缀
    pub fn matched_prefix(&self, path: &str) -> Option<&str> {
        self.public
            .iter()
            .filter(|prefix| self.matching.matches(path, prefix))
            .max_by_key(|prefix| prefix.len())
            .map(String::as_str)
    }

    /// 路径是否需要经过网关（静态资源不需要）
    pub fn is_gated(&self, path: &str) -> bool {
        !ASSET_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
    }

    /// 路径是否为登录/注册表单页
    pub fn is_auth_form(&self, path: &str) -> bool {
        AUTH_FORM_PREFIXES
            .iter()
            .any(|prefix| self.matching.matches(path, prefix))
    }
}
