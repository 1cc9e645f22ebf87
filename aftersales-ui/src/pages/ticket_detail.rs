//! Ticket Detail Page
//!
//! Read view of one ticket with its status actions.

use aftersales::models::Ticket;
use aftersales::routing::Route;
use aftersales::views::{available_actions, can_edit, detail_rows, StatusAction};
use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::{Badge, Loading};
use crate::state::global::GlobalState;

#[component]
pub fn TicketDetail() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let params = use_params_map();
    let (ticket, set_ticket) = create_signal(None::<Ticket>);
    let (failed, set_failed) = create_signal(false);

    create_effect(move |_| {
        state.revision.track();
        let id = params.with(|p| p.get("id").cloned().unwrap_or_default());
        spawn_local(async move {
            match api::get_ticket(&id).await {
                Ok(found) => {
                    set_failed.set(false);
                    set_ticket.set(Some(found));
                }
                Err(e) => {
                    set_failed.set(true);
                    state.report_failure("load ticket", &e);
                }
            }
        });
    });

    view! {
        <div class="max-w-4xl mx-auto space-y-6">
            <A href=Route::TicketList { status: None }.to_path() class="text-cyan-400 hover:underline text-sm">
                "Back to tickets"
            </A>

            {move || match ticket.get() {
                Some(found) => view! { <TicketBody ticket=found /> }.into_view(),
                None if failed.get() => view! {
                    <div class="text-center text-gray-400 py-12">
                        <p>"Ticket could not be loaded."</p>
                        <button
                            on:click=move |_| state.tickets_changed()
                            class="mt-4 px-4 py-2 rounded-lg bg-gray-700 hover:bg-gray-600"
                        >
                            "Retry"
                        </button>
                    </div>
                }.into_view(),
                None => view! { <Loading /> }.into_view(),
            }}
        </div>
    }
}

#[component]
fn TicketBody(ticket: Ticket) -> impl IntoView {
    let rows = detail_rows(&ticket);
    let actions = available_actions(ticket.status);
    let edit_href = can_edit(ticket.status).then(|| Route::TicketEdit { id: ticket.id.clone() }.to_path());
    let handle_detail = if ticket.handle_detail.trim().is_empty() {
        "No handling notes yet".to_string()
    } else {
        ticket.handle_detail.clone()
    };

    view! {
        <div class="flex items-start justify-between">
            <div class="space-y-2">
                <h1 class="text-2xl font-bold font-mono">{ticket.short_id().to_string()}</h1>
                <div class="flex space-x-2">
                    <Badge value=ticket.status />
                    <Badge value=ticket.priority />
                    <Badge value=ticket.category />
                </div>
            </div>

            <div class="flex flex-wrap gap-2 justify-end">
                {edit_href.map(|href| view! {
                    <A href=href class="px-4 py-2 rounded-lg bg-gray-700 hover:bg-gray-600">"Edit"</A>
                })}
                {actions
                    .into_iter()
                    .map(|action| view! { <ActionButton id=ticket.id.clone() action=action /> })
                    .collect_view()}
            </div>
        </div>

        <section class="bg-gray-800 rounded-xl p-6">
            <dl class="grid grid-cols-1 md:grid-cols-2 gap-x-8 gap-y-3 text-sm">
                {rows
                    .into_iter()
                    .map(|(label, value)| view! {
                        <div class="flex justify-between border-b border-gray-700 py-1">
                            <dt class="text-gray-400">{label}</dt>
                            <dd>{value}</dd>
                        </div>
                    })
                    .collect_view()}
            </dl>
        </section>

        <section class="bg-gray-800 rounded-xl p-6 space-y-2">
            <h2 class="text-lg font-semibold">"Description"</h2>
            <p class="whitespace-pre-wrap text-gray-200">{ticket.description.clone()}</p>
        </section>

        <section class="bg-gray-800 rounded-xl p-6 space-y-2">
            <h2 class="text-lg font-semibold">"Handling"</h2>
            <p class="whitespace-pre-wrap text-gray-200">{handle_detail}</p>
            {ticket.solution_template.clone().filter(|s| !s.trim().is_empty()).map(|template| view! {
                <h3 class="text-sm text-gray-400 pt-2">"Solution template"</h3>
                <p class="whitespace-pre-wrap text-gray-300">{template}</p>
            })}
        </section>

        {(!ticket.tags.is_empty()).then(|| view! {
            <div class="flex flex-wrap gap-2">
                {ticket.tags.iter().map(|tag| view! {
                    <span class="bg-gray-700 rounded px-2 py-0.5 text-sm">{tag.clone()}</span>
                }).collect_view()}
            </div>
        })}
    }
}

#[component]
fn ActionButton(id: String, action: StatusAction) -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let navigate = use_navigate();
    let (busy, set_busy) = create_signal(false);
    let id = store_value(id);

    let on_click = move |_| {
        if busy.get_untracked() {
            return;
        }
        if let Some(question) = action.confirmation() {
            if !window().confirm_with_message(question).unwrap_or(false) {
                return;
            }
        }

        set_busy.set(true);
        let id = id.get_value();
        let navigate = navigate.clone();
        spawn_local(async move {
            let result = run_action(&id, action).await;
            set_busy.set(false);

            match result {
                Ok(()) => {
                    state.show_success(action.success_message());
                    // A refetch here would 404; the list loads fresh on mount
                    if action.is_destructive() {
                        navigate(&Route::TicketList { status: None }.to_path(), Default::default());
                    } else {
                        state.tickets_changed();
                    }
                }
                Err(e) => state.report_failure(&action.label().to_lowercase(), &e),
            }
        });
    };

    let class = if action.is_destructive() {
        "px-4 py-2 rounded-lg bg-red-700 hover:bg-red-600 disabled:opacity-50"
    } else {
        "px-4 py-2 rounded-lg bg-cyan-600 hover:bg-cyan-700 disabled:opacity-50"
    };

    view! {
        <button on:click=on_click disabled=move || busy.get() class=class>
            {action.label()}
        </button>
    }
}

async fn run_action(id: &str, action: StatusAction) -> Result<(), String> {
    if let Some(update) = action.to_update() {
        return api::update_ticket(id, &update).await.map(|_| ());
    }
    match action {
        StatusAction::Close => api::close_ticket(id).await.map(|_| ()),
        StatusAction::Delete => api::delete_ticket(id).await.map(|_| ()),
        StatusAction::StartProcessing | StatusAction::Complete => Ok(()),
    }
}
