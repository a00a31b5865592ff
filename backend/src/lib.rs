//! 边缘请求网关 (Cloudflare Worker)
//!
//! 在页面内容加载之前对每次导航做一次粗粒度的放行/拒绝判断。

use worker::*;

// =========================================================
// 宏定义 (跨平台日志)
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info { ($($t:tt)*) => (worker::console_log!($($t)*)) }
#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info { ($($t:tt)*) => (println!($($t)*)) }

#[cfg(target_arch = "wasm32")]
macro_rules! log_error { ($($t:tt)*) => (worker::console_error!($($t)*)) }
#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error { ($($t:tt)*) => (eprintln!($($t)*)) }

pub mod config;
pub mod error;
pub mod gate;

use config::{GateConfig, WorkerEnv};
use error::GateError;
use gate::{EdgeGate, WorkerOrigin};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: talc::TalckWasm = unsafe { talc::TalckWasm::new_global() };

// 将 GateError 映射为 Worker Response
fn map_error_to_response(e: GateError) -> Result<Response> {
    let status = e.status_code();

    // 5xx 记录日志，响应体不暴露内部细节
    if status >= 500 {
        log_error!("Gate Error [{}]: {}", e.error_code(), e);
        let body = if status == 502 {
            "Bad Gateway"
        } else {
            "Internal Server Error"
        };
        return Response::error(body, status);
    }

    Ok(Response::from_json(&e.body())?.with_status(status))
}

// =========================================================
// Entry Point
// =========================================================

#[event(fetch)]
pub async fn main(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    console_error_panic_hook::set_once();

    let config = GateConfig::from_env(&WorkerEnv(&env));
    let responder = WorkerOrigin::new(config.origin_url.clone());
    let gate = EdgeGate::new(config);

    match gate.handle(req, &responder).await {
        Ok(resp) => Ok(resp),
        Err(e) => map_error_to_response(e),
    }
}
