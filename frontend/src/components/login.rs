use crate::api::{ClinicApi, SignupRequest};
use crate::guard::use_public_only_guard;
use crate::session::{login, signup, use_auth};
use crate::web::router::{Link, use_router};
use clinica_shared::Redirect;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
fn ErrorAlert(message: ReadSignal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some()>
            <div role="alert" class="alert alert-error text-sm py-2">
                <span>{move || message.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    use_public_only_guard();
    let auth = use_auth();
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if email.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Preencha todos os campos".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let api = ClinicApi::from_env();
            match login(&auth, &api, email.get_untracked(), password.get_untracked()).await {
                Ok(()) => router.navigate(Redirect::Dashboard.path()),
                Err(e) => set_error_msg.set(Some(e)),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Entrar"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert message=error_msg />
                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"E-mail"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Senha"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Entrando..." }.into_any()
                                } else {
                                    "Entrar".into_any()
                                }}
                            </button>
                        </div>
                        <Link to="/registro" class="link link-hover text-sm">
                            "Ainda não tem conta? Cadastre sua clínica"
                        </Link>
                    </form>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    use_public_only_guard();
    let auth = use_auth();
    let router = use_router();

    let (clinic_name, set_clinic_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);
        set_error_msg.set(None);

        let req = SignupRequest {
            clinic_name: clinic_name.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
        };
        spawn_local(async move {
            let api = ClinicApi::from_env();
            match signup(&auth, &api, req).await {
                // 新账号先选择套餐
                Ok(()) => router.navigate(Redirect::Plans.path()),
                Err(e) => set_error_msg.set(Some(e)),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Cadastre sua clínica"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert message=error_msg />
                        <input
                            type="text"
                            placeholder="Nome da clínica"
                            on:input=move |ev| set_clinic_name.set(event_target_value(&ev))
                            prop:value=clinic_name
                            class="input input-bordered"
                            required
                        />
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
                            "Criar conta"
                        </button>
                        <Link to="/login" class="link link-hover text-sm">
                            "Já tem conta? Entrar"
                        </Link>
                    </form>
                </div>
            </div>
        </div>
    }
}
