//! Navigation Component
//!
//! Header navigation bar built from the core menu, with the logged-in user
//! and a logout button.

use aftersales::routing::{menu, Route};
use leptos::*;
use leptos_router::*;

use crate::auth::AuthContext;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let location = use_location();
    let current = create_memo(move |_| Route::resolve(&location.pathname.get()));

    let auth_for_logout = auth.clone();
    let navigate = use_navigate();
    let on_logout = move |_| {
        auth_for_logout.logout();
        navigate("/login", Default::default());
    };

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <A href="/" class="flex items-center space-x-3">
                        <span class="text-xl font-bold text-white">"Aftersales Desk"</span>
                    </A>

                    <div class="flex items-center space-x-1">
                        {menu()
                            .into_iter()
                            .map(|item| {
                                let path = item.path();
                                let label = item.label;
                                let active = move || item.is_active(&current.get());
                                view! {
                                    <a
                                        href=path
                                        class=move || {
                                            let base = "px-4 py-2 rounded-lg transition-colors";
                                            if active() {
                                                format!("{} bg-gray-700 text-white", base)
                                            } else {
                                                format!("{} text-gray-300 hover:text-white hover:bg-gray-700", base)
                                            }
                                        }
                                    >
                                        {label}
                                    </a>
                                }
                            })
                            .collect_view()}
                    </div>

                    <div class="flex items-center space-x-3 text-sm">
                        <span class="text-gray-400">{move || auth.username().unwrap_or_default()}</span>
                        <button
                            on:click=on_logout
                            class="px-3 py-1 rounded-lg bg-gray-700 hover:bg-gray-600 text-gray-200"
                        >
                            "Logout"
                        </button>
                    </div>
                </div>
            </div>
        </nav>
    }
}
