//! Dashboard Page
//!
//! Status counts linking to the filtered list, plus category and trend
//! charts.

use aftersales::views::DashboardView;
use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::{ChartCanvas, Loading};
use crate::state::global::GlobalState;

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let (dashboard, set_dashboard) = create_signal(None::<DashboardView>);
    let (failed, set_failed) = create_signal(false);

    create_effect(move |_| {
        state.revision.track();
        spawn_local(async move {
            match api::ticket_stats().await {
                Ok(stats) => {
                    set_failed.set(false);
                    set_dashboard.set(Some(DashboardView::from_stats(&stats)));
                }
                Err(e) => {
                    set_failed.set(true);
                    state.report_failure("load statistics", &e);
                }
            }
        });
    });

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Dashboard"</h1>
                <p class="text-gray-400 mt-1">"After-sales tickets at a glance"</p>
            </div>

            {move || match dashboard.get() {
                Some(view) => view! { <DashboardBody dashboard=view /> }.into_view(),
                None if failed.get() => view! {
                    <div class="text-center text-gray-400 py-12">
                        <p>"Statistics are unavailable."</p>
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
fn DashboardBody(dashboard: DashboardView) -> impl IntoView {
    let DashboardView {
        total,
        cards,
        category_chart,
        trend_chart,
    } = dashboard;

    view! {
        <section class="grid grid-cols-2 md:grid-cols-4 gap-4">
            <div class="bg-gray-800 rounded-xl p-6">
                <div class="text-gray-400 text-sm">"Total"</div>
                <div class="text-3xl font-bold mt-2">{total}</div>
            </div>
            {cards
                .into_iter()
                .map(|card| view! {
                    <A href=card.route.to_path() class="bg-gray-800 rounded-xl p-6 hover:bg-gray-700 transition-colors">
                        <div class="text-gray-400 text-sm">{card.label}</div>
                        <div class="text-3xl font-bold mt-2" style=format!("color: {}", card.color)>
                            {card.count}
                        </div>
                    </A>
                })
                .collect_view()}
        </section>

        <div class="grid md:grid-cols-2 gap-8">
            <section class="bg-gray-800 rounded-xl p-6">
                <ChartCanvas spec=category_chart />
            </section>
            <section class="bg-gray-800 rounded-xl p-6">
                <ChartCanvas spec=trend_chart />
            </section>
        </div>
    }
}
