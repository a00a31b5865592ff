use crate::api::ClinicApi;
use crate::guard::use_elevated_guard;
use crate::session::{admin_login, use_auth};
use crate::web::router::use_router;
use clinica_shared::GuardState;
use leptos::prelude::*;
use leptos::task::spawn_local;

const ADMIN_HOME: &str = "/admin";

#[component]
pub fn AdminLoginPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let api = ClinicApi::from_env();
            let result =
                admin_login(&auth, &api, email.get_untracked(), password.get_untracked()).await;
            match result {
                Ok(()) => router.navigate(ADMIN_HOME),
                Err(e) => set_error_msg.set(Some(e)),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-neutral">
            <div class="card w-full max-w-sm shadow-2xl bg-base-100">
                <form class="card-body" on:submit=on_submit>
                    <h1 class="card-title">"Painel administrativo"</h1>
                    <Show when=move || error_msg.get().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || error_msg.get().unwrap_or_default()}</span>
                        </div>
                    </Show>
                    <input
                        type="email"
                        placeholder="E-mail"
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                        prop:value=email
                        class="input input-bordered"
                        required
                    />
                    <input
                        type="password"
                        placeholder="Senha"
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        prop:value=password
                        class="input input-bordered"
                        required
                    />
                    <button class="btn btn-primary mt-4" disabled=move || is_submitting.get()>
                        "Entrar"
                    </button>
                </form>
            </div>
        </div>
    }
}

#[component]
pub fn AdminPage() -> impl IntoView {
    let guard = use_elevated_guard();
    let auth = use_auth();

    let on_logout = move |_| auth.logout();

    view! {
        <Show
            when=move || guard.get() == GuardState::Allowed
            fallback=|| view! {
                <div class="flex items-center justify-center min-h-screen">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
        >
            <div class="min-h-screen bg-base-200 p-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1">
                        <span class="text-xl font-bold">"Administração"</span>
                        <span class="badge badge-neutral ml-2">
                            {move || auth.state.get().role.to_string()}
                        </span>
                    </div>
                    <button on:click=on_logout class="btn btn-outline btn-error">"Sair"</button>
                </div>
            </div>
        </Show>
    }
}
