//! 请求网关
//!
//! 每次导航在页面构建之前执行一次：静态资源直接放行，公开路径放行，
//! 受保护路径只检查请求 cookie 中是否存在令牌。角色判断留给页面内守卫。

use async_trait::async_trait;
use clinica_shared::cookie;
use clinica_shared::decision::{self, GateDecision};
use clinica_shared::Redirect;
use worker::{Fetch, Headers, Request, RequestInit, Response, Url};

use crate::config::GateConfig;
use crate::error::{GateError, GateResult};

/// 网关判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// 静态资源，不经过判定
    Bypass,
    Proceed,
    Redirect(Redirect),
}

/// 网关需要的请求视图
pub trait RequestView {
    fn path(&self) -> GateResult<String>;
    fn cookie_header(&self) -> GateResult<Option<String>>;
}

impl RequestView for Request {
    fn path(&self) -> GateResult<String> {
        Ok(Request::path(self))
    }

    fn cookie_header(&self) -> GateResult<Option<String>> {
        self.headers().get("Cookie").map_err(|e| {
            GateError::invalid_request(e.to_string()).in_op("request.cookie")
        })
    }
}

/// 把判定结果变成响应
#[async_trait(?Send)]
pub trait EdgeResponder {
    type Request: RequestView;
    type Response;

    /// 放行：转发到源站
    async fn forward(&self, req: Self::Request) -> GateResult<Self::Response>;
    /// 拒绝：重定向到指定路径
    fn redirect(&self, location: &str) -> GateResult<Self::Response>;
}

pub struct EdgeGate {
    config: GateConfig,
}

impl EdgeGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// 只读取 cookie，从不依赖客户端的持久化存储
    pub fn evaluate<R: RequestView>(&self, req: &R) -> GateResult<GateOutcome> {
        let path = req.path()?;
        if !self.config.routes.is_gated(&path) {
            return Ok(GateOutcome::Bypass);
        }

        let header = req.cookie_header()?;
        let token = header
            .as_deref()
            .and_then(|h| cookie::find(h, &self.config.token_cookie));

        Ok(
            match decision::request_gate(&self.config.routes, &path, token.as_deref()) {
                GateDecision::Proceed => GateOutcome::Proceed,
                GateDecision::Redirect(target) => {
                    log_info!("[Gate] {} has no token, redirecting to {}", path, target);
                    GateOutcome::Redirect(target)
                }
            },
        )
    }

    pub async fn handle<P: EdgeResponder>(
        &self,
        req: P::Request,
        responder: &P,
    ) -> GateResult<P::Response> {
        match self.evaluate(&req)? {
            GateOutcome::Bypass | GateOutcome::Proceed => responder.forward(req).await,
            GateOutcome::Redirect(target) => responder.redirect(target.path()),
        }
    }
}

/// 把请求路径拼接到源站地址之后，保留源站自身的路径前缀
pub fn origin_target(origin: &str, path: &str, query: Option<&str>) -> GateResult<Url> {
    let mut target = Url::parse(origin).map_err(|e| {
        GateError::internal(e.to_string()).in_op_with("origin.parse", origin)
    })?;
    let base = target.path().trim_end_matches('/').to_string();
    target.set_path(&format!("{}{}", base, path));
    target.set_query(query);
    Ok(target)
}

// =========================================================
// 实现层: Worker 源站
// =========================================================

/// 转发到源站的 Worker 实现
pub struct WorkerOrigin {
    origin_url: Option<String>,
}

impl WorkerOrigin {
    pub fn new(origin_url: Option<String>) -> Self {
        Self { origin_url }
    }
}

#[async_trait(?Send)]
impl EdgeResponder for WorkerOrigin {
    type Request = Request;
    type Response = Response;

    async fn forward(&self, req: Request) -> GateResult<Response> {
        let path = Request::path(&req);
        let upstream = match &self.origin_url {
            None => req,
            Some(origin) => {
                let incoming = req.url()?;
                let target = origin_target(origin, incoming.path(), incoming.query())?;
                // 原样转发请求体流，不做文本解码
                let init = RequestInit {
                    method: req.method(),
                    headers: req.headers().clone(),
                    body: req.inner().body().map(Into::into),
                    ..Default::default()
                };
                Request::new_with_init(target.as_str(), &init)?
            }
        };

        Fetch::Request(upstream).send().await.map_err(|e| {
            GateError::upstream(e.to_string()).in_op_with("origin.forward", path)
        })
    }

    fn redirect(&self, location: &str) -> GateResult<Response> {
        let headers = Headers::new();
        headers.set("Location", location)?;
        headers.set("Cache-Control", "no-store")?;
        Ok(Response::empty()?.with_status(302).with_headers(headers))
    }
}
