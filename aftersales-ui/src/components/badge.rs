//! Coloured label for statuses, priorities and categories

use aftersales::views::DisplayLabel;
use leptos::*;

#[component]
pub fn Badge<T: DisplayLabel + 'static>(value: T) -> impl IntoView {
    let color = value.color();

    view! {
        <span
            class="inline-block px-2 py-0.5 rounded text-xs font-semibold"
            style=format!("color: {}; border: 1px solid {}", color, color)
        >
            {value.label()}
        </span>
    }
}
