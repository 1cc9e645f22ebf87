//! Toast Notification Component
//!
//! Shows the current notice from global state.

use aftersales::views::{Notice, NoticeLevel};
use leptos::*;

use crate::state::global::GlobalState;

/// Toast notification container
#[component]
pub fn Toast() -> impl IntoView {
    let state = expect_context::<GlobalState>();

    view! {
        <div class="fixed bottom-6 right-4 z-50 space-y-2">
            {move || state.notice.get().map(|notice| view! { <ToastMessage notice=notice /> })}
        </div>
    }
}

#[component]
fn ToastMessage(notice: Notice) -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let (icon, bg_class) = toast_style(notice.level);

    view! {
        <div
            class=format!(
                "flex items-center space-x-3 {} text-white px-4 py-3 rounded-lg shadow-lg \
                 transform transition-all duration-300 ease-out animate-slide-in",
                bg_class
            )
            on:click=move |_| state.clear_notice()
        >
            <span class="text-lg">{icon}</span>
            <span class="text-sm font-medium">{notice.message}</span>
        </div>
    }
}

fn toast_style(level: NoticeLevel) -> (&'static str, &'static str) {
    match level {
        NoticeLevel::Success => ("✓", "bg-green-600"),
        NoticeLevel::Info => ("ℹ", "bg-blue-600"),
        NoticeLevel::Warning => ("⚠", "bg-yellow-600"),
        NoticeLevel::Error => ("✕", "bg-red-600"),
    }
}
