//! 页面内守卫
//!
//! 边缘网关放行之后，页面挂载时再按角色检查一次。纯判定函数与 Leptos hook 分开，
//! 前者只依赖注入的 [`Session`]，可以脱离浏览器测试。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clinica_shared::RouteTable;
use clinica_shared::decision::{self, GateDecision, GuardState};
use leptos::logging::log;
use leptos::prelude::*;

use crate::session::{CookieJar, CredentialStore, Session, use_auth};
use crate::web::router::{current_path, use_router};

/// 登录/注册页：持久化存储中已有令牌时离开表单页
pub fn check_public_only<S: CredentialStore, J: CookieJar>(
    session: &Session<S, J>,
    table: &RouteTable,
    path: &str,
) -> GateDecision {
    let has_token = session.credential().token().is_some();
    decision::public_only(table, path, has_token)
}

/// 管理员页：按角色推进状态机
pub fn check_elevated<S: CredentialStore, J: CookieJar>(
    session: &Session<S, J>,
    state: GuardState,
) -> GuardState {
    state.advance(&session.resolve())
}

/// 绑定到当前组件的延迟检查，组件卸载后不再执行
#[derive(Clone)]
pub struct PendingCheck {
    live: Arc<AtomicBool>,
}

impl PendingCheck {
    pub fn new() -> Self {
        let live = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&live);
        on_cleanup(move || flag.store(false, Ordering::Relaxed));
        Self { live }
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Relaxed)
    }

    /// 返回检查是否执行
    pub fn run(&self, check: impl FnOnce()) -> bool {
        if self.is_live() {
            check();
            true
        } else {
            false
        }
    }
}

// =========================================================
// Leptos hooks
// =========================================================

/// 延迟一帧执行检查；卸载时取消定时器
fn defer_check(check: impl FnOnce() + 'static) {
    let pending = PendingCheck::new();
    let task = pending.clone();
    match set_timeout_with_handle(
        move || {
            task.run(check);
        },
        Duration::ZERO,
    ) {
        Ok(handle) => on_cleanup(move || handle.clear()),
        Err(e) => log!("[Guard] failed to schedule check: {:?}", e),
    }
}

/// 通用守卫：延迟一帧后读取存储，只暴露令牌信号，不负责跳转
pub fn use_auth_guard() -> Signal<bool> {
    let auth = use_auth();
    defer_check(move || auth.refresh());
    auth.has_token_signal()
}

/// 表单页守卫：持有令牌的用户被送往控制面板
pub fn use_public_only_guard() {
    let auth = use_auth();
    let router = use_router();

    defer_check(move || {
        auth.refresh();
        let path = current_path();
        if let GateDecision::Redirect(target) =
            check_public_only(&auth.session, &RouteTable::default(), &path)
        {
            log!("[Guard] already signed in on {}, redirecting to {}", path, target);
            router.navigate(target.path());
        }
    });
}

/// 管理员守卫：挂载后检查一次，返回状态信号
pub fn use_elevated_guard() -> ReadSignal<GuardState> {
    let auth = use_auth();
    let router = use_router();
    let (state, set_state) = signal(GuardState::Checking);

    Effect::new(move |_| {
        let current = state.get_untracked();
        if current.is_terminal() {
            return;
        }
        let next = check_elevated(&auth.session, current);
        set_state.set(next);
        if let Some(target) = next.redirect_target() {
            log!("[Guard] elevated access denied ({:?}), redirecting to {}", next, target);
            router.navigate(target.path());
        }
    });

    state
}
