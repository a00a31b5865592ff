//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 应用内导航不会再经过边缘网关，所以这里用同一个 `request_gate` 决策
//! 和镜像到 cookie 的令牌重新判断一次。

use clinica_shared::RouteTable;
use clinica_shared::decision::{self, GateDecision};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 获取当前浏览器路径
pub fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn trace(msg: &str) {
    web_sys::console::log_1(&msg.into());
}

/// 路由器服务
///
/// 通过注入的令牌信号与认证系统解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    /// 与边缘网关读取的同一个 cookie 令牌
    request_token: Signal<Option<String>>,
}

impl RouterService {
    fn new(request_token: Signal<Option<String>>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            request_token,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        self.navigate_to(path, true);
    }

    fn gate(&self, path: &str) -> GateDecision {
        let token = self.request_token.get_untracked();
        decision::request_gate(&RouteTable::default(), path, token.as_deref())
    }

    fn navigate_to(&self, path: &str, use_push: bool) {
        let target = match self.gate(path) {
            GateDecision::Proceed => path.to_string(),
            GateDecision::Redirect(redirect) => {
                trace(&format!("[Router] {} denied, redirecting to {}", path, redirect));
                redirect.path().to_string()
            }
        };

        if use_push {
            push_history_state(&target);
        } else {
            replace_history_state(&target);
        }
        self.set_route.set(AppRoute::from_path(&target));
    }

    /// 初次加载时也执行一次网关判定（本地开发时没有边缘网关）
    fn check_initial_route(&self) {
        self.navigate_to(&current_path(), false);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;
        let closure = Closure::<dyn Fn()>::new(move || {
            router.navigate_to(&current_path(), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 令牌变化时的自动重定向
    fn setup_auth_redirect(&self) {
        let router = *self;
        let request_token = self.request_token;

        Effect::new(move |_| {
            let token = request_token.get();
            let path = current_path();

            if let GateDecision::Redirect(redirect) =
                decision::auth_redirect(&RouteTable::default(), &path, token.as_deref())
            {
                trace(&format!(
                    "[Router] Session changed on {}, redirecting to {}",
                    path, redirect
                ));
                router.navigate_to(redirect.path(), true);
            }
        });
    }
}

fn provide_router(request_token: Signal<Option<String>>) -> RouterService {
    let router = RouterService::new(request_token);

    router.check_initial_route();
    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(request_token: Signal<Option<String>>, children: Children) -> impl IntoView {
    provide_router(request_token);

    children()
}

/// 路由出口组件
#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接：拦截点击，走路由服务的导航与守卫
#[component]
pub fn Link(
    #[prop(into)] to: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let target = to.clone();
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
