//! Ticket List Page
//!
//! Filterable, paginated ticket table. Filter and pager rules live in
//! [`TicketListState`]; this page only binds them to inputs.

use aftersales::models::{
    SystemSource, Ticket, TicketCategory, TicketListResponse, TicketPriority, TicketStatus,
};
use aftersales::routing::Route;
use aftersales::views::{
    format_date, total_caption, DisplayLabel, FetchSequence, TicketListState, PAGE_SIZE_OPTIONS,
};
use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::{Badge, ListSkeleton};
use crate::state::global::GlobalState;

/// Ticket list page component
#[component]
pub fn TicketList() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let location = use_location();

    let list = create_rw_signal(TicketListState::from_query(
        &location.search.get_untracked(),
    ));
    let (result, set_result) = create_signal(None::<TicketListResponse>);
    let (failed, set_failed) = create_signal(false);
    let (loading, set_loading) = create_signal(false);
    let fetches = store_value(FetchSequence::default());
    let search_text = create_rw_signal(
        list.with_untracked(|l| l.params().search.clone().unwrap_or_default()),
    );

    // Dashboard cards link here with ?status=...; follow them while mounted
    create_effect(move |previous: Option<()>| {
        let search = location.search.get();
        if previous.is_some() {
            let from_url = TicketListState::from_query(&search);
            list.update(|l| l.set_status(from_url.params().status));
        }
    });

    create_effect(move |_| {
        state.revision.track();
        let params = list.with(|l| l.params().clone());
        let mut ticket = 0;
        fetches.update_value(|seq| ticket = seq.next());
        set_loading.set(true);

        spawn_local(async move {
            let result = api::list_tickets(&params).await;
            // A newer fetch owns the table, or the page is gone
            if fetches.try_with_value(|seq| seq.is_current(ticket)) != Some(true) {
                return;
            }

            match result {
                Ok(page) => {
                    set_failed.set(false);
                    set_result.set(Some(page));
                }
                Err(e) => {
                    set_failed.set(true);
                    state.report_failure("load tickets", &e);
                }
            }
            set_loading.set(false);
        });
    });

    let commit_search = move || {
        let text = search_text.get_untracked();
        list.update(|l| l.set_search(&text));
    };

    let total = move || result.with(|r| r.as_ref().map(|r| r.total).unwrap_or(0));

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"Tickets"</h1>
                <A
                    href=Route::TicketNew.to_path()
                    class="px-4 py-2 bg-cyan-600 hover:bg-cyan-700 rounded-lg font-medium"
                >
                    "New Ticket"
                </A>
            </div>

            // Filters
            <div class="flex flex-wrap gap-3 items-center">
                <FilterSelect
                    label="All statuses"
                    options=TicketStatus::ALL.iter().map(|v| (v.as_str(), v.label())).collect()
                    value=Signal::derive(move || list.with(|l| l.params().status.map(|v| v.as_str())))
                    on_change=Callback::new(move |raw: String| list.update(|l| l.set_status(raw.parse().ok())))
                />
                <FilterSelect
                    label="All systems"
                    options=SystemSource::ALL.iter().map(|v| (v.as_str(), v.label())).collect()
                    value=Signal::derive(move || list.with(|l| l.params().system_source.map(|v| v.as_str())))
                    on_change=Callback::new(move |raw: String| list.update(|l| l.set_system_source(raw.parse().ok())))
                />
                <FilterSelect
                    label="All categories"
                    options=TicketCategory::ALL.iter().map(|v| (v.as_str(), v.label())).collect()
                    value=Signal::derive(move || list.with(|l| l.params().category.map(|v| v.as_str())))
                    on_change=Callback::new(move |raw: String| list.update(|l| l.set_category(raw.parse().ok())))
                />
                <FilterSelect
                    label="All priorities"
                    options=TicketPriority::ALL.iter().map(|v| (v.as_str(), v.label())).collect()
                    value=Signal::derive(move || list.with(|l| l.params().priority.map(|v| v.as_str())))
                    on_change=Callback::new(move |raw: String| list.update(|l| l.set_priority(raw.parse().ok())))
                />

                <input
                    type="search"
                    placeholder="Search description (regex)"
                    prop:value=search_text
                    on:input=move |ev| search_text.set(event_target_value(&ev))
                    on:change=move |_| commit_search()
                    class="bg-gray-800 border border-gray-700 rounded-lg px-3 py-2 flex-1 min-w-[12rem]"
                />

                <Show when=move || list.with(|l| l.has_filters())>
                    <button
                        on:click=move |_| {
                            search_text.set(String::new());
                            list.update(|l| l.reset_filters());
                        }
                        class="px-3 py-2 rounded-lg bg-gray-700 hover:bg-gray-600 text-sm"
                    >
                        "Reset"
                    </button>
                </Show>
            </div>

            // Table
            {move || {
                if loading.get() && result.with(|r| r.is_none()) {
                    view! { <ListSkeleton /> }.into_view()
                } else if failed.get() {
                    view! {
                        <div class="text-center text-gray-400 py-12">
                            <p>"Tickets could not be loaded."</p>
                            <button
                                on:click=move |_| state.tickets_changed()
                                class="mt-4 px-4 py-2 rounded-lg bg-gray-700 hover:bg-gray-600"
                            >
                                "Retry"
                            </button>
                        </div>
                    }.into_view()
                } else {
                    let items = result.with(|r| r.as_ref().map(|r| r.items.clone()).unwrap_or_default());
                    view! { <TicketTable tickets=items /> }.into_view()
                }
            }}

            // Pager
            <div class="flex items-center justify-between text-sm text-gray-300">
                <span>{move || total_caption(total())}</span>

                <div class="flex items-center space-x-2">
                    <button
                        disabled=move || !list.with(|l| l.has_prev_page())
                        on:click=move |_| list.update(|l| {
                            let page = l.params().page;
                            l.set_page(page.saturating_sub(1));
                        })
                        class="px-3 py-1 rounded bg-gray-700 disabled:opacity-40"
                    >
                        "Prev"
                    </button>
                    <span>
                        {move || format!(
                            "Page {} of {}",
                            list.with(|l| l.params().page),
                            list.with(|l| l.total_pages(total())).max(1)
                        )}
                    </span>
                    <button
                        disabled=move || !list.with(|l| l.has_next_page(total()))
                        on:click=move |_| list.update(|l| {
                            let page = l.params().page;
                            l.set_page(page + 1);
                        })
                        class="px-3 py-1 rounded bg-gray-700 disabled:opacity-40"
                    >
                        "Next"
                    </button>

                    <select
                        on:change=move |ev| {
                            if let Ok(size) = event_target_value(&ev).parse() {
                                list.update(|l| l.set_page_size(size));
                            }
                        }
                        class="bg-gray-800 border border-gray-700 rounded px-2 py-1"
                    >
                        {PAGE_SIZE_OPTIONS
                            .iter()
                            .map(|size| {
                                let size = *size;
                                view! {
                                    <option
                                        value=size.to_string()
                                        selected=move || list.with(|l| l.params().page_size == size)
                                    >
                                        {format!("{} / page", size)}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </div>
            </div>
        </div>
    }
}

#[component]
fn FilterSelect(
    label: &'static str,
    options: Vec<(&'static str, &'static str)>,
    #[prop(into)] value: Signal<Option<&'static str>>,
    on_change: Callback<String>,
) -> impl IntoView {
    view! {
        <select
            on:change=move |ev| on_change.call(event_target_value(&ev))
            class="bg-gray-800 border border-gray-700 rounded-lg px-3 py-2"
        >
            <option value="" selected=move || value.get().is_none()>{label}</option>
            {options
                .into_iter()
                .map(|(wire, text)| view! {
                    <option value=wire selected=move || value.get() == Some(wire)>{text}</option>
                })
                .collect_view()}
        </select>
    }
}

#[component]
fn TicketTable(tickets: Vec<Ticket>) -> impl IntoView {
    if tickets.is_empty() {
        return view! { <p class="text-gray-400 text-center py-12">"No tickets found"</p> }
            .into_view();
    }

    view! {
        <table class="w-full text-sm">
            <thead class="text-gray-400 text-left border-b border-gray-700">
                <tr>
                    <th class="py-2">"ID"</th>
                    <th>"Description"</th>
                    <th>"Status"</th>
                    <th>"Priority"</th>
                    <th>"System"</th>
                    <th>"Category"</th>
                    <th>"Created"</th>
                </tr>
            </thead>
            <tbody>
                {tickets
                    .into_iter()
                    .map(|ticket| {
                        let href = Route::TicketDetail { id: ticket.id.clone() }.to_path();
                        view! {
                            <tr class="border-b border-gray-800 hover:bg-gray-800">
                                <td class="py-2 font-mono">
                                    <A href=href.clone()>{ticket.short_id().to_string()}</A>
                                </td>
                                <td class="max-w-md truncate">
                                    <A href=href>{ticket.description.clone()}</A>
                                </td>
                                <td><Badge value=ticket.status /></td>
                                <td><Badge value=ticket.priority /></td>
                                <td>{ticket.system_source.label()}</td>
                                <td>{ticket.category.label()}</td>
                                <td class="text-gray-400">{format_date(ticket.created_at)}</td>
                            </tr>
                        }
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
    .into_view()
}
