//! Ticket Form Pages
//!
//! Create and edit share one form; [`FormMode`] decides the title, the
//! validation rules and which endpoint the submit goes to.

use aftersales::models::{
    HandleType, SystemSource, Ticket, TicketCategory, TicketCreate, TicketPriority, TicketUpdate,
    ValidationError,
};
use aftersales::routing::Route;
use aftersales::views::{can_edit, parse_tags, DisplayLabel, FormMode, TicketFormValues};
use leptos::*;
use leptos_router::*;

use crate::api;
use crate::auth::AuthContext;
use crate::components::Loading;
use crate::state::global::GlobalState;

/// `/tickets/new`
#[component]
pub fn TicketNew() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let initial = TicketFormValues::for_create(auth.username().as_deref());

    view! { <TicketForm mode=FormMode::Create initial=initial original=None /> }
}

/// `/tickets/:id/edit`
#[component]
pub fn TicketEdit() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let params = use_params_map();
    let (ticket, set_ticket) = create_signal(None::<Ticket>);
    let (failed, set_failed) = create_signal(false);

    create_effect(move |_| {
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

    move || match ticket.get() {
        Some(found) if can_edit(found.status) => view! {
            <TicketForm
                mode=FormMode::Edit { id: found.id.clone() }
                initial=TicketFormValues::from_ticket(&found)
                original=Some(found)
            />
        }
        .into_view(),
        Some(found) => view! {
            <div class="text-center text-gray-400 py-12">
                <p>"Completed tickets cannot be edited."</p>
                <A
                    href=Route::TicketDetail { id: found.id }.to_path()
                    class="text-cyan-400 hover:underline"
                >
                    "Back to ticket"
                </A>
            </div>
        }
        .into_view(),
        None if failed.get() => view! {
            <div class="text-center text-gray-400 py-12">
                <p>"Ticket could not be loaded."</p>
                <A href=Route::TicketList { status: None }.to_path() class="text-cyan-400 hover:underline">
                    "Back to tickets"
                </A>
            </div>
        }
        .into_view(),
        None => view! { <Loading /> }.into_view(),
    }
}

enum Save {
    Create(TicketCreate),
    Update(String, TicketUpdate),
}

#[component]
fn TicketForm(mode: FormMode, initial: TicketFormValues, original: Option<Ticket>) -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let navigate = use_navigate();

    let values = create_rw_signal(initial);
    let errors = create_rw_signal(Vec::<ValidationError>::new());
    let tag_input = create_rw_signal(String::new());
    let (saving, set_saving) = create_signal(false);

    let title = mode.title();
    let is_edit = mode.is_edit();
    let cancel_href = match &mode {
        FormMode::Create => Route::TicketList { status: None }.to_path(),
        FormMode::Edit { id } => Route::TicketDetail { id: id.clone() }.to_path(),
    };
    let original = store_value(original);

    let error_for = move |field: &'static str| {
        errors.with(|errs| {
            errs.iter()
                .find(|e| e.field == field)
                .map(|e| e.message.clone())
        })
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }

        let current = values.get_untracked();
        let request = match original.get_value() {
            None => current.to_create().map(Save::Create),
            Some(ticket) => current
                .to_update(&ticket)
                .map(|update| Save::Update(ticket.id.clone(), update)),
        };
        let request = match request {
            Ok(request) => request,
            Err(errs) => {
                errors.set(errs);
                return;
            }
        };
        errors.set(Vec::new());

        if let Save::Update(id, update) = &request {
            if update.is_empty() {
                state.show_warning("No changes to save");
                navigate(&Route::TicketDetail { id: id.clone() }.to_path(), Default::default());
                return;
            }
        }

        set_saving.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            let (action, done) = match &request {
                Save::Create(_) => ("create ticket", "Ticket created"),
                Save::Update(..) => ("update ticket", "Ticket updated"),
            };
            let result = match request {
                Save::Create(body) => api::create_ticket(&body).await,
                Save::Update(id, body) => api::update_ticket(&id, &body).await,
            };
            set_saving.set(false);

            match result {
                Ok(ticket) => {
                    state.show_success(done);
                    state.tickets_changed();
                    navigate(&Route::TicketDetail { id: ticket.id }.to_path(), Default::default());
                }
                Err(e) => state.report_failure(action, &e),
            }
        });
    };

    let add_tags = move || {
        let raw = tag_input.get_untracked();
        values.update(|v| {
            for tag in parse_tags(&raw) {
                v.add_tag(&tag);
            }
        });
        tag_input.set(String::new());
    };

    view! {
        <div class="max-w-3xl mx-auto space-y-6">
            <h1 class="text-3xl font-bold">{title}</h1>

            <form on:submit=on_submit class="bg-gray-800 rounded-xl p-6 space-y-5">
                <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                    <ChoiceField
                        label="System"
                        options=SystemSource::ALL.iter().map(|v| (v.as_str(), v.label())).collect()
                        value=Signal::derive(move || values.with(|v| v.system_source.map(|s| s.as_str())))
                        on_change=Callback::new(move |raw: String| values.update(|v| v.system_source = raw.parse().ok()))
                        error=Signal::derive(move || error_for("systemSource"))
                    />
                    <ChoiceField
                        label="Category"
                        options=TicketCategory::ALL.iter().map(|v| (v.as_str(), v.label())).collect()
                        value=Signal::derive(move || values.with(|v| v.category.map(|s| s.as_str())))
                        on_change=Callback::new(move |raw: String| values.update(|v| v.category = raw.parse().ok()))
                        error=Signal::derive(move || error_for("category"))
                    />
                    <ChoiceField
                        label="Handle type"
                        options=HandleType::ALL.iter().map(|v| (v.as_str(), v.label())).collect()
                        value=Signal::derive(move || values.with(|v| v.handle_type.map(|s| s.as_str())))
                        on_change=Callback::new(move |raw: String| values.update(|v| v.handle_type = raw.parse().ok()))
                        error=Signal::derive(move || error_for("handleType"))
                    />
                    <ChoiceField
                        label="Priority"
                        options=TicketPriority::ALL.iter().map(|v| (v.as_str(), v.label())).collect()
                        value=Signal::derive(move || values.with(|v| v.priority.map(|s| s.as_str())))
                        on_change=Callback::new(move |raw: String| values.update(|v| v.priority = raw.parse().ok()))
                        error=Signal::derive(move || error_for("priority"))
                    />
                </div>

                <TextField
                    label="Description"
                    multiline=true
                    value=Signal::derive(move || values.with(|v| v.description.clone()))
                    on_input=Callback::new(move |text: String| values.update(|v| v.description = text))
                    error=Signal::derive(move || error_for("description"))
                />
                <TextField
                    label="Handling notes"
                    multiline=true
                    value=Signal::derive(move || values.with(|v| v.handle_detail.clone()))
                    on_input=Callback::new(move |text: String| values.update(|v| v.handle_detail = text))
                    error=Signal::derive(move || error_for("handleDetail"))
                />
                <TextField
                    label="Solution template"
                    multiline=true
                    value=Signal::derive(move || values.with(|v| v.solution_template.clone()))
                    on_input=Callback::new(move |text: String| values.update(|v| v.solution_template = text))
                    error=Signal::derive(|| None)
                />

                <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                    <TextField
                        label="Assigned to"
                        value=Signal::derive(move || values.with(|v| v.assigned_to.clone()))
                        on_input=Callback::new(move |text: String| values.update(|v| v.assigned_to = text))
                        error=Signal::derive(|| None)
                    />
                    <TextField
                        label="Created by"
                        value=Signal::derive(move || values.with(|v| v.created_by.clone()))
                        on_input=Callback::new(move |text: String| values.update(|v| v.created_by = text))
                        error=Signal::derive(move || error_for("createdBy"))
                    />
                </div>

                // Tags
                <div class="space-y-2">
                    <label class="block text-sm text-gray-400">"Tags"</label>
                    <div class="flex flex-wrap gap-2">
                        {move || {
                            values
                                .with(|v| v.tags.clone())
                                .into_iter()
                                .map(|tag| {
                                    let removed = tag.clone();
                                    view! {
                                        <span class="inline-flex items-center bg-gray-700 rounded px-2 py-0.5 text-sm">
                                            {tag}
                                            <button
                                                type="button"
                                                on:click=move |_| values.update(|v| v.remove_tag(&removed))
                                                class="ml-1 text-gray-400 hover:text-white"
                                            >
                                                "x"
                                            </button>
                                        </span>
                                    }
                                })
                                .collect_view()
                        }}
                    </div>
                    <input
                        type="text"
                        placeholder="Type a tag and press Enter"
                        prop:value=tag_input
                        on:input=move |ev| tag_input.set(event_target_value(&ev))
                        on:keydown=move |ev: web_sys::KeyboardEvent| {
                            if ev.key() == "Enter" {
                                ev.prevent_default();
                                add_tags();
                            }
                        }
                        on:blur=move |_| add_tags()
                        class="w-full bg-gray-700 rounded-lg px-3 py-2"
                    />
                </div>

                <div class="flex justify-end space-x-3 pt-2">
                    <A href=cancel_href class="px-4 py-2 rounded-lg bg-gray-700 hover:bg-gray-600">
                        "Cancel"
                    </A>
                    <button
                        type="submit"
                        disabled=move || saving.get()
                        class="px-4 py-2 rounded-lg bg-cyan-600 hover:bg-cyan-700 font-medium disabled:opacity-50"
                    >
                        {move || match (saving.get(), is_edit) {
                            (true, _) => "Saving...",
                            (false, true) => "Save changes",
                            (false, false) => "Create ticket",
                        }}
                    </button>
                </div>
            </form>
        </div>
    }
}

#[component]
fn ChoiceField(
    label: &'static str,
    options: Vec<(&'static str, &'static str)>,
    #[prop(into)] value: Signal<Option<&'static str>>,
    on_change: Callback<String>,
    #[prop(into)] error: Signal<Option<String>>,
) -> impl IntoView {
    view! {
        <div class="space-y-1">
            <label class="block text-sm text-gray-400">{label}</label>
            <select
                on:change=move |ev| on_change.call(event_target_value(&ev))
                class="w-full bg-gray-700 rounded-lg px-3 py-2"
            >
                <option value="" selected=move || value.get().is_none()>"Select..."</option>
                {options
                    .into_iter()
                    .map(|(wire, text)| view! {
                        <option value=wire selected=move || value.get() == Some(wire)>{text}</option>
                    })
                    .collect_view()}
            </select>
            <FieldError error=error />
        </div>
    }
}

#[component]
fn TextField(
    label: &'static str,
    #[prop(default = false)] multiline: bool,
    #[prop(into)] value: Signal<String>,
    on_input: Callback<String>,
    #[prop(into)] error: Signal<Option<String>>,
) -> impl IntoView {
    let input = if multiline {
        view! {
            <textarea
                rows="4"
                prop:value=value
                on:input=move |ev| on_input.call(event_target_value(&ev))
                class="w-full bg-gray-700 rounded-lg px-3 py-2"
            />
        }
        .into_view()
    } else {
        view! {
            <input
                type="text"
                prop:value=value
                on:input=move |ev| on_input.call(event_target_value(&ev))
                class="w-full bg-gray-700 rounded-lg px-3 py-2"
            />
        }
        .into_view()
    };

    view! {
        <div class="space-y-1">
            <label class="block text-sm text-gray-400">{label}</label>
            {input}
            <FieldError error=error />
        </div>
    }
}

#[component]
fn FieldError(error: Signal<Option<String>>) -> impl IntoView {
    move || {
        error
            .get()
            .map(|message| view! { <p class="text-red-400 text-xs">{message}</p> })
    }
}
