use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, InputEvent};
use yew::prelude::*;

use crate::api::HttpExpenseApi;
use crate::board::ExpenseBoard;
use crate::config::ApiConfig;
use crate::controller::{Access, BrowserConfirm, ExpenseController};
use crate::expense::{count_label, format_brl, format_date_br, Expense, PaymentMethod};
use crate::form::ExpenseDraft;
use crate::notice::BrowserTimer;
use crate::session::BrowserSession;

#[derive(Properties, PartialEq)]
pub struct AppProps {
    #[prop_or_default]
    pub api: ApiConfig,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    html! {
        <div class="min-h-screen bg-gray-50 py-8">
            <ExpensesPage api={props.api.clone()} />
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ExpensesPageProps {
    #[prop_or_default]
    pub api: ApiConfig,
}

#[function_component(ExpensesPage)]
pub fn expenses_page(props: &ExpensesPageProps) -> Html {
    let force = use_force_update();
    let controller = {
        let api = props.api.clone();
        use_state(move || {
            ExpenseController::new(
                ExpenseBoard::default(),
                Rc::new(HttpExpenseApi::new(api)),
                Rc::new(BrowserSession),
                Rc::new(BrowserTimer::default()),
                Rc::new(BrowserConfirm),
                Callback::from(move |_| force.force_update()),
            )
        })
    };

    {
        let controller = (*controller).clone();
        use_effect_with_deps(
            move |_| {
                let mounted = controller.clone();
                spawn_local(async move {
                    mounted.mount().await;
                });
                move || controller.detach()
            },
            (),
        );
    }

    if controller.access() == Access::Denied {
        return html! { <AccessDenied /> };
    }

    let board = controller.board();
    let loading = board.is_loading();

    let on_sign_out = {
        let controller = (*controller).clone();
        Callback::from(move |_| controller.sign_out())
    };

    html! {
        <div class="max-w-6xl mx-auto px-4">
            <div class="bg-white rounded-lg shadow-md p-6 mb-6">
                <div class="flex items-center justify-between">
                    <div>
                        <h1 class="text-2xl font-bold text-gray-900">{"Controle de Despesas"}</h1>
                        <p class="text-gray-600">{"Gerencie suas despesas de forma eficiente"}</p>
                    </div>
                    <div class="text-right">
                        <p class="text-sm text-gray-500">{"Total de Despesas"}</p>
                        <p class="text-2xl font-bold text-red-600">{ format_brl(board.expenses().total()) }</p>
                        <button onclick={on_sign_out} class="text-xs text-gray-500 hover:text-gray-700">{"Sair"}</button>
                    </div>
                </div>
            </div>

            {
                if let Some(message) = board.notices().success() {
                    html! {
                        <div class="bg-green-50 border border-green-200 rounded-lg p-4 mb-6">
                            <span class="text-green-800">{ message.to_string() }</span>
                        </div>
                    }
                } else { html! {} }
            }
            {
                if let Some(message) = board.notices().error() {
                    html! {
                        <div class="bg-red-50 border border-red-200 rounded-lg p-4 mb-6">
                            <span class="text-red-800">{ message.to_string() }</span>
                        </div>
                    }
                } else { html! {} }
            }

            <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                <div class="lg:col-span-1">
                    { expense_form(&controller, &board) }
                </div>
                <div class="lg:col-span-2">
                    { expense_list(&controller, board.expenses().as_slice(), loading) }
                </div>
            </div>
        </div>
    }
}

#[function_component(AccessDenied)]
fn access_denied() -> Html {
    html! {
        <div class="min-h-screen bg-gray-50 flex items-center justify-center">
            <div class="bg-white p-8 rounded-lg shadow-md text-center">
                <h2 class="text-xl font-bold text-gray-900 mb-2">{"Acesso Negado"}</h2>
                <p class="text-gray-600">{"Você precisa estar logado para acessar esta página."}</p>
            </div>
        </div>
    }
}

fn expense_form(controller: &ExpenseController, board: &ExpenseBoard) -> Html {
    let draft = board.draft();
    let editing = draft.is_editing();

    let on_submit = {
        let controller = controller.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let controller = controller.clone();
            spawn_local(async move {
                if let Err(rejected) = controller.submit().await {
                    tracing::debug!(%rejected, "submission rejected");
                }
            });
        })
    };

    let on_cancel = {
        let controller = controller.clone();
        Callback::from(move |_| controller.cancel_edit())
    };

    let on_description = {
        let controller = controller.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            controller.update_draft(|draft| draft.description = input.value());
        })
    };

    let on_payment_method = {
        let controller = controller.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            match select.value().parse::<PaymentMethod>() {
                Ok(method) => controller.update_draft(|draft| draft.payment_method = method),
                Err(error) => tracing::warn!(%error, "ignoring payment method"),
            }
        })
    };

    let on_amount = {
        let controller = controller.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            controller.update_draft(|draft| draft.amount = input.value());
        })
    };

    let on_date = {
        let controller = controller.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            controller.update_draft(|draft| draft.date = input.value());
        })
    };

    html! {
        <div class="bg-white rounded-lg shadow-md p-6">
            <div class="flex items-center justify-between mb-4">
                <h2 class="text-lg font-semibold text-gray-900">
                    { if editing { "Editar Despesa" } else { "Nova Despesa" } }
                </h2>
                {
                    if editing {
                        html! { <button onclick={on_cancel} title="Cancelar edição" class="text-gray-500 hover:text-gray-700">{"✕"}</button> }
                    } else { html! {} }
                }
            </div>

            <form onsubmit={on_submit} class="space-y-4">
                <div>
                    <label class="block text-sm font-medium text-gray-700 mb-1">{"Descrição *"}</label>
                    <input type="text" placeholder="Ex: Almoço, Gasolina, Supermercado..." value={draft.description.clone()} oninput={on_description} class="w-full p-3 border border-gray-300 rounded-lg" />
                </div>
                <div>
                    <label class="block text-sm font-medium text-gray-700 mb-1">{"Forma de Pagamento"}</label>
                    <select onchange={on_payment_method} class="w-full p-3 border border-gray-300 rounded-lg">
                        { for payment_options(draft).into_iter().map(|(method, selected)| html! {
                            <option value={method.as_str()} ~selected={selected}>
                                { format!("{} {}", method.icon(), method.label()) }
                            </option>
                        }) }
                    </select>
                </div>
                <div>
                    <label class="block text-sm font-medium text-gray-700 mb-1">{"Valor *"}</label>
                    <input type="number" step="0.01" min="0" placeholder="0,00" value={draft.amount.clone()} oninput={on_amount} class="w-full p-3 border border-gray-300 rounded-lg" />
                </div>
                <div>
                    <label class="block text-sm font-medium text-gray-700 mb-1">{"Data"}</label>
                    <input type="date" value={draft.date.clone()} oninput={on_date} class="w-full p-3 border border-gray-300 rounded-lg" />
                </div>
                <button type="submit" disabled={board.is_loading()} class="w-full bg-blue-600 hover:bg-blue-700 disabled:bg-blue-300 text-white p-3 rounded-lg font-medium">
                    {
                        if board.is_loading() {
                            "Salvando..."
                        } else if editing {
                            "Atualizar Despesa"
                        } else {
                            "Adicionar Despesa"
                        }
                    }
                </button>
            </form>
        </div>
    }
}

/// Each payment method paired with whether the draft has it chosen.
///
/// Render the flag as the `selected` property. Browsers ignore the attribute on
/// an option the user already picked by hand.
fn payment_options(draft: &ExpenseDraft) -> Vec<(PaymentMethod, bool)> {
    PaymentMethod::ALL
        .into_iter()
        .map(|method| (method, method == draft.payment_method))
        .collect()
}

fn expense_list(controller: &ExpenseController, expenses: &[Expense], loading: bool) -> Html {
    let body = if loading && expenses.is_empty() {
        html! { <p class="text-center py-8 text-gray-600">{"Carregando despesas..."}</p> }
    } else if expenses.is_empty() {
        html! {
            <div class="text-center py-8">
                <p class="text-gray-600">{"Nenhuma despesa cadastrada ainda."}</p>
                <p class="text-sm text-gray-500">{"Adicione sua primeira despesa usando o formulário ao lado."}</p>
            </div>
        }
    } else {
        html! {
            <div class="space-y-3">
                { for expenses.iter().map(|expense| expense_row(controller, expense, loading)) }
            </div>
        }
    };

    html! {
        <div class="bg-white rounded-lg shadow-md">
            <div class="p-6 border-b border-gray-200 flex items-center justify-between">
                <h2 class="text-lg font-semibold text-gray-900">{"Despesas Registradas"}</h2>
                <span class="bg-blue-100 text-blue-800 text-sm font-medium px-3 py-1 rounded-full">{ count_label(expenses.len()) }</span>
            </div>
            <div class="p-6">{ body }</div>
        </div>
    }
}

fn expense_row(controller: &ExpenseController, expense: &Expense, loading: bool) -> Html {
    let key = expense.id.to_string();

    let on_edit = {
        let controller = controller.clone();
        let id = expense.id.clone();
        Callback::from(move |_| {
            if let Err(rejected) = controller.start_edit(id.clone()) {
                tracing::warn!(%rejected, "cannot edit expense");
            }
        })
    };

    let on_delete = {
        let controller = controller.clone();
        let id = expense.id.clone();
        Callback::from(move |_| {
            let controller = controller.clone();
            let id = id.clone();
            spawn_local(async move {
                if let Err(busy) = controller.delete(id).await {
                    tracing::warn!(%busy, "cannot delete expense");
                }
            });
        })
    };

    html! {
        <div key={key} class="border border-gray-200 rounded-lg p-4 flex items-center justify-between">
            <div class="flex-1">
                <div class="flex items-center space-x-3 mb-2">
                    <span class="text-lg">{ expense.payment_method.icon() }</span>
                    <h3 class="font-medium text-gray-900">{ expense.description.clone() }</h3>
                    <span class={classes!("px-2", "py-1", "rounded-full", "text-xs", "font-medium", expense.payment_method.badge_class())}>
                        { expense.payment_method.as_str() }
                    </span>
                </div>
                <div class="flex items-center space-x-4 text-sm text-gray-600">
                    <span>{ format_date_br(expense.date) }</span>
                    <span class="font-medium text-gray-900">{ format_brl(expense.amount) }</span>
                </div>
            </div>
            <div class="flex items-center space-x-2">
                <button onclick={on_edit} disabled={loading} title="Editar despesa" class="p-2 text-blue-600 hover:bg-blue-50 rounded-lg">{"✎"}</button>
                <button onclick={on_delete} disabled={loading} title="Excluir despesa" class="p-2 text-red-600 hover:bg-red-50 rounded-lg">{"🗑"}</button>
            </div>
        </div>
    }
}
