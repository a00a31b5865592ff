use crate::activation::{ActivationModal, use_activation_modal};
use crate::api::ClinicApi;
use crate::session::use_auth;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 打开激活弹窗的按钮（从上下文取得开关）
#[component]
pub fn ActivationButton() -> impl IntoView {
    let modal = use_activation_modal();

    view! {
        <button class="btn btn-primary btn-sm" on:click=move |_| modal.open()>
            "Ativar licença"
        </button>
    }
}

/// 激活码兑换弹窗
#[component]
pub fn ActivationDialog(modal: ActivationModal) -> impl IntoView {
    let auth = use_auth();
    let (key, set_key) = signal(String::new());
    let (loading, set_loading) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if modal.is_open() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(token) = auth.session.request_token() else {
            auth.logout();
            return;
        };

        set_loading.set(true);
        set_error_msg.set(None);
        spawn_local(async move {
            let api = ClinicApi::from_env();
            match api.redeem_activation_key(&token, key.get_untracked().trim()).await {
                Ok(()) => {
                    set_key.set(String::new());
                    modal.close();
                }
                Err(e) => {
                    if !auth.handle_api_error(&e) {
                        set_error_msg.set(Some(e.to_string()));
                    }
                }
            }
            set_loading.set(false);
        });
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| modal.close()>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Ativar licença"</h3>
                <p class="py-4 text-base-content/70">"Informe a chave de ativação recebida por e-mail."</p>

                <form on:submit=on_submit class="space-y-4">
                    <Show when=move || error_msg.get().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || error_msg.get().unwrap_or_default()}</span>
                        </div>
                    </Show>
                    <input
                        type="text"
                        placeholder="XXXX-XXXX-XXXX"
                        on:input=move |ev| set_key.set(event_target_value(&ev))
                        prop:value=key
                        class="input input-bordered w-full font-mono"
                        required
                    />
                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| modal.close()>
                            "Cancelar"
                        </button>
                        <button type="submit" disabled=move || loading.get() class="btn btn-primary">
                            {move || if loading.get() {
                                view! { <span class="loading loading-spinner"></span> "Ativando..." }.into_any()
                            } else {
                                "Ativar".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
