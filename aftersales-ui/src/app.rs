//! App Root Component
//!
//! Main application component with routing, the route guard and global
//! providers.

use aftersales::routing::{guard, GuardDecision};
use aftersales::session::AuthStatus;
use leptos::*;
use leptos_router::*;

use crate::auth::{provide_auth, AuthContext};
use crate::components::{Loading, Nav, Toast};
use crate::pages::{Dashboard, Login, TicketDetail, TicketEdit, TicketList, TicketNew};
use crate::state::global::provide_global_state;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();
    provide_auth();

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                <Routes>
                    <Route path="/login" view=|| view! { <Guarded><Login /></Guarded> } />
                    <Route path="" view=Shell>
                        <Route path="/" view=Dashboard />
                        <Route path="/tickets" view=TicketList />
                        <Route path="/tickets/new" view=TicketNew />
                        <Route path="/tickets/:id" view=TicketDetail />
                        <Route path="/tickets/:id/edit" view=TicketEdit />
                        <Route path="/*any" view=|| view! { <Redirect path="/" /> } />
                    </Route>
                </Routes>

                <Toast />
            </div>
        </Router>
    }
}

/// Layout for every protected page
#[component]
fn Shell() -> impl IntoView {
    view! {
        <Guarded>
            <Nav />
            <main class="flex-1 container mx-auto px-4 py-8">
                <Outlet />
            </main>
        </Guarded>
    }
}

/// Renders its children only when the guard allows the current location;
/// otherwise redirects (to login, or back from it)
#[component]
fn Guarded(children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let location = use_location();

    let decision = create_memo(move |_| {
        let path = location.pathname.get();
        let search = location.search.get();
        auth.status.with(|status| gate(status, &path, &search))
    });

    move || match decision.get() {
        Gate::Pending => view! { <Loading /> }.into_view(),
        Gate::Redirect(path) => view! { <Redirect path=path /> }.into_view(),
        Gate::Open => children().into_view(),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Gate {
    Pending,
    Redirect(String),
    Open,
}

fn gate(status: &AuthStatus, path: &str, search: &str) -> Gate {
    let search = search.trim_start_matches('?');
    let target = if search.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, search)
    };
    match guard(status, &target) {
        GuardDecision::Pending => Gate::Pending,
        GuardDecision::Redirect(route) => Gate::Redirect(route.to_path()),
        // Query changes inside a page must not remount it
        GuardDecision::Render(_) => Gate::Open,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aftersales::session::Session;
    use wasm_bindgen_test::*;

    fn signed_in() -> AuthStatus {
        AuthStatus::Authenticated(Session {
            username: "alice".to_string(),
        })
    }

    #[wasm_bindgen_test]
    fn pending_while_restoring() {
        assert_eq!(gate(&AuthStatus::Loading, "/tickets", ""), Gate::Pending);
    }

    #[wasm_bindgen_test]
    fn anonymous_visit_goes_to_login_with_origin() {
        let Gate::Redirect(path) = gate(&AuthStatus::Unauthenticated, "/tickets", "?status=OPEN")
        else {
            panic!("expected a redirect");
        };
        assert!(path.starts_with("/login?from="));
        assert!(path.contains(&*urlencoding::encode("/tickets?status=OPEN")));
    }

    #[wasm_bindgen_test]
    fn signed_in_visit_renders_and_login_bounces_back() {
        assert_eq!(gate(&signed_in(), "/tickets/t-1", ""), Gate::Open);
        assert_eq!(gate(&signed_in(), "/tickets", "?status=OPEN"), Gate::Open);
        assert_eq!(
            gate(&signed_in(), "/login", "?from=%2Ftickets%2Fnew"),
            Gate::Redirect("/tickets/new".to_string())
        );
    }
}
