//! Routing
//!
//! The route table, the guard that gates it on the session, and the
//! navigation menu derived from both.

pub mod guard;
pub mod route;

pub use guard::{guard, is_local_path, login_redirect, post_login_target, GuardDecision};
pub use route::Route;

/// One entry of the navigation menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub route: Route,
}

impl MenuItem {
    pub fn path(&self) -> String {
        self.route.to_path()
    }

    /// Whether `current` belongs to this entry's section
    pub fn is_active(&self, current: &Route) -> bool {
        match (&self.route, current) {
            (Route::Dashboard, Route::Dashboard) => true,
            (Route::TicketNew, Route::TicketNew) => true,
            (
                Route::TicketList { .. },
                Route::TicketList { .. } | Route::TicketDetail { .. } | Route::TicketEdit { .. },
            ) => true,
            _ => false,
        }
    }
}

/// Navigation entries, in display order
pub fn menu() -> Vec<MenuItem> {
    vec![
        MenuItem {
            label: "Dashboard",
            route: Route::Dashboard,
        },
        MenuItem {
            label: "Tickets",
            route: Route::TicketList { status: None },
        },
        MenuItem {
            label: "New Ticket",
            route: Route::TicketNew,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_paths() {
        let paths: Vec<String> = menu().iter().map(MenuItem::path).collect();
        assert_eq!(paths, vec!["/", "/tickets", "/tickets/new"]);
    }

    #[test]
    fn test_menu_active_section() {
        let items = menu();
        let detail = Route::TicketDetail {
            id: "t-1".to_string(),
        };
        let active: Vec<&str> = items
            .iter()
            .filter(|item| item.is_active(&detail))
            .map(|item| item.label)
            .collect();
        assert_eq!(active, vec!["Tickets"]);
        assert!(!items[1].is_active(&Route::TicketNew));
    }
}
