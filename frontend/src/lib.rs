//! 诊所管理前端
//!
//! 采用 Context-Driven 的架构：
//! - `web::route`: 页面路由定义（领域模型）
//! - `web::router`: 路由服务，应用内导航复用边缘网关的判定
//! - `session`: 注入式会话与认证上下文
//! - `guard`: 页面内守卫
//! - `activation`: 激活码弹窗上下文
//! - `components`: UI 组件层

mod activation;
mod api;
mod guard;
mod session;
mod components {
    mod activation_dialog;
    pub mod admin;
    pub mod dashboard;
    pub mod login;
    pub mod marketing;
}

use crate::components::admin::{AdminLoginPage, AdminPage};
use crate::components::dashboard::DashboardPage;
use crate::components::login::{LoginPage, RegisterPage};
use crate::components::marketing::{ChoosePlanPage, HomePage, PaymentPage, PlansPage};
use crate::session::{AuthContext, init_auth};

use leptos::prelude::*;

// 浏览器 API 封装
pub(crate) mod web {
    mod cookie;
    pub mod route;
    pub mod router;
    mod storage;

    pub use cookie::DocumentCookie;
    pub use storage::LocalStorage;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Plans => view! { <PlansPage /> }.into_any(),
        AppRoute::PlanPayment => view! { <PaymentPage /> }.into_any(),
        AppRoute::ChoosePlan => view! { <ChoosePlanPage /> }.into_any(),
        AppRoute::AdminLogin => view! { <AdminLoginPage /> }.into_any(),
        AppRoute::Admin => view! { <AdminPage /> }.into_any(),
        AppRoute::Dashboard(section) => view! { <DashboardPage section=section /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Página não encontrada"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 同步 cookie 并读取一次存储
    init_auth(&auth_ctx);

    // 3. 令牌信号注入路由服务
    let request_token = auth_ctx.request_token_signal();

    view! {
        <Router request_token=request_token>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
