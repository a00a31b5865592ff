use crate::web::router::Link;
use leptos::prelude::*;

#[component]
fn PageHeader(#[prop(into)] title: String, #[prop(into)] subtitle: String) -> impl IntoView {
    view! {
        <div class="text-center py-12">
            <h1 class="text-4xl font-bold">{title}</h1>
            <p class="text-base-content/70 mt-4">{subtitle}</p>
        </div>
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200">
            <PageHeader
                title="Gestão completa para sua clínica"
                subtitle="Pacientes, agendamentos e orçamentos em um só lugar."
            />
            <div class="flex justify-center gap-4">
                <Link to="/planos" class="btn btn-primary">"Ver planos"</Link>
                <Link to="/login" class="btn btn-ghost">"Entrar"</Link>
            </div>
        </div>
    }
}

#[component]
pub fn PlansPage() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200">
            <PageHeader title="Planos" subtitle="Escolha o plano ideal para sua clínica." />
            <div class="flex justify-center">
                <Link to="/escolher-plano" class="btn btn-primary">"Escolher plano"</Link>
            </div>
        </div>
    }
}

#[component]
pub fn ChoosePlanPage() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200">
            <PageHeader title="Escolha seu plano" subtitle="Você pode mudar de plano a qualquer momento." />
            <div class="flex justify-center">
                <Link to="/planos/pagamento" class="btn btn-primary">"Continuar para pagamento"</Link>
            </div>
        </div>
    }
}

#[component]
pub fn PaymentPage() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200">
            <PageHeader title="Pagamento" subtitle="Finalize a assinatura do seu plano." />
            <div class="flex justify-center">
                <Link to="/dashboard/insights" class="btn btn-primary">"Ir para o painel"</Link>
            </div>
        </div>
    }
}
