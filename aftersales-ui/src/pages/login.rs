//! Login Page

use aftersales::routing::post_login_target;
use leptos::*;
use leptos_router::*;

use crate::auth::AuthContext;
use crate::state::global::GlobalState;

#[component]
pub fn Login() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let state = expect_context::<GlobalState>();
    let query = use_query_map();
    let navigate = use_navigate();

    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (failed, set_failed) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        if auth.login(&username.get(), &password.get()) {
            let from = query.with(|q| q.get("from").cloned());
            state.show_success("Logged in");
            navigate(&post_login_target(from.as_deref()), Default::default());
        } else {
            set_failed.set(true);
            set_password.set(String::new());
        }
    };

    view! {
        <div class="flex items-center justify-center min-h-screen">
            <form on:submit=on_submit class="bg-gray-800 rounded-xl p-8 w-full max-w-sm space-y-4">
                <h1 class="text-2xl font-bold text-center">"Aftersales Desk"</h1>

                <input
                    type="text"
                    placeholder="Username"
                    prop:value=username
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                    class="w-full bg-gray-700 rounded-lg px-4 py-2"
                />
                <input
                    type="password"
                    placeholder="Password"
                    prop:value=password
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                    class="w-full bg-gray-700 rounded-lg px-4 py-2"
                />

                <Show when=move || failed.get()>
                    <p class="text-red-400 text-sm">"Invalid username or password"</p>
                </Show>

                <button
                    type="submit"
                    disabled=move || username.with(|u| u.trim().is_empty())
                    class="w-full bg-cyan-600 hover:bg-cyan-700 disabled:bg-gray-600 rounded-lg py-2 font-semibold"
                >
                    "Log in"
                </button>
            </form>
        </div>
    }
}
