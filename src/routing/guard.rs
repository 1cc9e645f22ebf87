//! Route Guard
//!
//! Decides what to show for a requested path given the current
//! [`AuthStatus`]. The browser client and the CLI both go through
//! [`guard`], so the redirect rules live in one place.

use super::route::Route;
use crate::session::AuthStatus;

/// Outcome of guarding a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session restore is still running; show a placeholder
    Pending,
    /// Show this route
    Render(Route),
    /// Navigate here instead
    Redirect(Route),
}

/// Guard a navigation to `target` (path plus optional query string).
///
/// Unknown paths go to the dashboard. An unauthenticated visitor asking for
/// a protected page is sent to login with the full target recorded in
/// `from`; an authenticated visitor asking for login is sent on to `from`.
pub fn guard(status: &AuthStatus, target: &str) -> GuardDecision {
    if matches!(status, AuthStatus::Loading) {
        return GuardDecision::Pending;
    }

    let Some(route) = Route::parse(target) else {
        return GuardDecision::Redirect(Route::Dashboard);
    };

    let authenticated = status.is_authenticated();
    match route {
        Route::Login { from } if authenticated => {
            GuardDecision::Redirect(Route::resolve(&post_login_target(from.as_deref())))
        }
        route if route.is_protected() && !authenticated => {
            GuardDecision::Redirect(login_redirect(target))
        }
        route => GuardDecision::Render(route),
    }
}

/// Login route that returns to `target` afterwards
pub fn login_redirect(target: &str) -> Route {
    let from = Some(target.to_string()).filter(|t| is_local_path(t) && !is_login_path(t));
    Route::Login { from }
}

/// Where to go after a successful login: `from` when it is a local path,
/// the dashboard otherwise
pub fn post_login_target(from: Option<&str>) -> String {
    match from {
        Some(path) if is_local_path(path) && !is_login_path(path) => path.to_string(),
        _ => Route::Dashboard.to_path(),
    }
}

/// A same-origin absolute path. Rejects protocol-relative `//host` and
/// anything that is not rooted at `/`.
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
}

fn is_login_path(path: &str) -> bool {
    matches!(Route::parse(path), Some(Route::Login { .. }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryStorage, Session, SessionStore, FIXED_PASSWORD};

    fn authenticated() -> AuthStatus {
        AuthStatus::Authenticated(Session {
            username: "alice".to_string(),
        })
    }

    #[test]
    fn test_loading_renders_placeholder() {
        assert_eq!(guard(&AuthStatus::Loading, "/tickets"), GuardDecision::Pending);
        assert_eq!(guard(&AuthStatus::Loading, "/login"), GuardDecision::Pending);
    }

    #[test]
    fn test_authenticated_renders_requested_page() {
        assert_eq!(
            guard(&authenticated(), "/tickets/t-9"),
            GuardDecision::Render(Route::TicketDetail {
                id: "t-9".to_string()
            })
        );
    }

    #[test]
    fn test_unauthenticated_redirects_with_origin() {
        assert_eq!(
            guard(&AuthStatus::Unauthenticated, "/tickets?status=OPEN"),
            GuardDecision::Redirect(Route::Login {
                from: Some("/tickets?status=OPEN".to_string())
            })
        );
    }

    #[test]
    fn test_login_page_is_public() {
        assert_eq!(
            guard(&AuthStatus::Unauthenticated, "/login"),
            GuardDecision::Render(Route::Login { from: None })
        );
    }

    #[test]
    fn test_authenticated_visitor_skips_login() {
        assert_eq!(
            guard(&authenticated(), "/login?from=%2Ftickets%2Fnew"),
            GuardDecision::Redirect(Route::TicketNew)
        );
        assert_eq!(
            guard(&authenticated(), "/login"),
            GuardDecision::Redirect(Route::Dashboard)
        );
    }

    #[test]
    fn test_unknown_path_goes_home() {
        assert_eq!(
            guard(&AuthStatus::Unauthenticated, "/admin"),
            GuardDecision::Redirect(Route::Dashboard)
        );
    }

    #[test]
    fn test_post_login_target_only_honours_local_paths() {
        assert_eq!(post_login_target(None), "/");
        assert_eq!(post_login_target(Some("/tickets/new")), "/tickets/new");
        assert_eq!(post_login_target(Some("https://evil.example")), "/");
        assert_eq!(post_login_target(Some("//evil.example")), "/");
        assert_eq!(post_login_target(Some("/login?from=%2F")), "/");
    }

    #[test]
    fn test_redirect_then_return_after_login() {
        let mut store = SessionStore::restored(MemoryStorage::new());
        let requested = "/tickets/t-42/edit";

        let login = match guard(&store.status(), requested) {
            GuardDecision::Redirect(route) => route,
            other => panic!("expected redirect, got {:?}", other),
        };
        let login_path = login.to_path();

        // The login page renders for the anonymous visitor
        assert_eq!(
            guard(&store.status(), &login_path),
            GuardDecision::Render(login.clone())
        );

        assert!(store.login("alice", FIXED_PASSWORD));

        let Route::Login { from } = login else {
            panic!("expected login route");
        };
        let target = post_login_target(from.as_deref());
        assert_eq!(target, requested);
        assert_eq!(
            guard(&store.status(), &target),
            GuardDecision::Render(Route::TicketEdit {
                id: "t-42".to_string()
            })
        );
    }
}
