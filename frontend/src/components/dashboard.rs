use crate::activation::provide_activation_modal;
use crate::components::activation_dialog::{ActivationButton, ActivationDialog};
use crate::guard::use_auth_guard;
use crate::session::use_auth;
use crate::web::route::DashboardSection;
use crate::web::router::Link;
use leptos::prelude::*;

#[component]
pub fn DashboardPage(section: DashboardSection) -> impl IntoView {
    let has_token = use_auth_guard();
    let auth = use_auth();
    // 弹窗开关只在控制面板子树内有效
    let modal = provide_activation_modal();

    let on_logout = move |_| auth.logout();
    let is_loading = move || auth.state.get().is_loading;

    view! {
        <Show
            when=move || !is_loading() && has_token.get()
            fallback=|| view! {
                <div class="flex items-center justify-center min-h-screen">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
        >
            <div class="drawer lg:drawer-open">
                <div class="drawer-content p-4 md:p-8 bg-base-200 min-h-screen">
                    <div class="navbar bg-base-100 rounded-box shadow-xl mb-6">
                        <div class="flex-1">
                            <h1 class="text-xl font-bold">{section.title()}</h1>
                        </div>
                        <div class="flex-none gap-2">
                            <ActivationButton />
                            <button on:click=on_logout class="btn btn-outline btn-error btn-sm">
                                "Sair"
                            </button>
                        </div>
                    </div>
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <h2 class="card-title">{section.title()}</h2>
                        </div>
                    </div>
                </div>
                <aside class="drawer-side">
                    <ul class="menu p-4 w-64 min-h-full bg-base-100">
                        {DashboardSection::ALL
                            .into_iter()
                            .map(|item| {
                                let class = if item == section { "active" } else { "" };
                                view! {
                                    <li>
                                        <Link to=item.to_path() class=class>
                                            {item.title()}
                                        </Link>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                </aside>
            </div>
            <ActivationDialog modal=modal />
        </Show>
    }
}
