//! Route table

use crate::models::TicketStatus;

/// Every page the clients can show.
///
/// Paths are matched after stripping a trailing `/`; the query string only
/// matters for `Login` (`from`) and `TicketList` (`status`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/login?from=<encoded path>`
    Login { from: Option<String> },
    /// `/`
    Dashboard,
    /// `/tickets?status=OPEN`
    TicketList { status: Option<TicketStatus> },
    /// `/tickets/new`
    TicketNew,
    /// `/tickets/{id}`
    TicketDetail { id: String },
    /// `/tickets/{id}/edit`
    TicketEdit { id: String },
}

impl Route {
    /// Match a path (optionally with a query string). `None` for unknown
    /// paths.
    pub fn parse(target: &str) -> Option<Route> {
        let (path, query) = split_target(target);
        let path = path.trim_end_matches('/');
        let segments: Vec<&str> = path.split('/').skip(1).collect();

        let route = match segments.as_slice() {
            [] | [""] => Route::Dashboard,
            ["login"] => Route::Login {
                from: query_param(query, "from").filter(|f| !f.is_empty()),
            },
            ["tickets"] => Route::TicketList {
                status: query_param(query, "status").and_then(|raw| first_status(&raw)),
            },
            ["tickets", "new"] => Route::TicketNew,
            ["tickets", id] if !id.is_empty() => Route::TicketDetail {
                id: decode(id),
            },
            ["tickets", id, "edit"] if !id.is_empty() => Route::TicketEdit {
                id: decode(id),
            },
            _ => return None,
        };
        Some(route)
    }

    /// Match a path, sending unknown ones to the dashboard
    pub fn resolve(target: &str) -> Route {
        Route::parse(target).unwrap_or(Route::Dashboard)
    }

    /// Path (and query) that navigates to this route
    pub fn to_path(&self) -> String {
        match self {
            Route::Login { from: None } => "/login".to_string(),
            Route::Login { from: Some(from) } => {
                format!("/login?from={}", urlencoding::encode(from))
            }
            Route::Dashboard => "/".to_string(),
            Route::TicketList { status: None } => "/tickets".to_string(),
            Route::TicketList {
                status: Some(status),
            } => format!("/tickets?status={}", status.as_str()),
            Route::TicketNew => "/tickets/new".to_string(),
            Route::TicketDetail { id } => format!("/tickets/{}", urlencoding::encode(id)),
            Route::TicketEdit { id } => format!("/tickets/{}/edit", urlencoding::encode(id)),
        }
    }

    /// Everything but the login page requires a session
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login { .. })
    }

    /// Page title shown in the header
    pub fn title(&self) -> &'static str {
        match self {
            Route::Login { .. } => "Login",
            Route::Dashboard => "Dashboard",
            Route::TicketList { .. } => "Tickets",
            Route::TicketNew => "New Ticket",
            Route::TicketDetail { .. } => "Ticket Detail",
            Route::TicketEdit { .. } => "Edit Ticket",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_path())
    }
}

fn split_target(target: &str) -> (&str, &str) {
    let target = target.split('#').next().unwrap_or_default();
    match target.split_once('?') {
        Some((path, query)) => (path, query),
        None => (target, ""),
    }
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// First value of `key` in a query string, percent-decoded
pub(crate) fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| decode(&v.replace('+', " ")))
}

/// `status=OPEN,PROCESSING` filters on the first listed status
fn first_status(raw: &str) -> Option<TicketStatus> {
    raw.split(',').next().and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(Route::parse("/"), Some(Route::Dashboard));
        assert_eq!(Route::parse(""), Some(Route::Dashboard));
        assert_eq!(
            Route::parse("/tickets"),
            Some(Route::TicketList { status: None })
        );
        assert_eq!(Route::parse("/tickets/new"), Some(Route::TicketNew));
        assert_eq!(
            Route::parse("/tickets/abc123"),
            Some(Route::TicketDetail {
                id: "abc123".to_string()
            })
        );
        assert_eq!(
            Route::parse("/tickets/abc123/edit/"),
            Some(Route::TicketEdit {
                id: "abc123".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_paths_resolve_to_dashboard() {
        assert_eq!(Route::parse("/reports"), None);
        assert_eq!(Route::parse("/tickets/a/b/c"), None);
        assert_eq!(Route::resolve("/nowhere"), Route::Dashboard);
    }

    #[test]
    fn test_status_filter_from_query() {
        assert_eq!(
            Route::parse("/tickets?status=OPEN"),
            Some(Route::TicketList {
                status: Some(TicketStatus::Open)
            })
        );
        assert_eq!(
            Route::parse("/tickets?page=2&status=processing,completed"),
            Some(Route::TicketList {
                status: Some(TicketStatus::Processing)
            })
        );
        assert_eq!(
            Route::parse("/tickets?status=bogus"),
            Some(Route::TicketList { status: None })
        );
    }

    #[test]
    fn test_login_from_roundtrip() {
        let route = Route::Login {
            from: Some("/tickets?status=OPEN".to_string()),
        };
        let path = route.to_path();
        assert_eq!(path, "/login?from=%2Ftickets%3Fstatus%3DOPEN");
        assert_eq!(Route::parse(&path), Some(route));

        assert_eq!(
            Route::parse("/login?from="),
            Some(Route::Login { from: None })
        );
    }

    #[test]
    fn test_to_path() {
        assert_eq!(Route::Dashboard.to_path(), "/");
        assert_eq!(
            Route::TicketList {
                status: Some(TicketStatus::Completed)
            }
            .to_path(),
            "/tickets?status=COMPLETED"
        );
        assert_eq!(
            Route::TicketEdit {
                id: "t-1".to_string()
            }
            .to_string(),
            "/tickets/t-1/edit"
        );
    }

    #[test]
    fn test_only_login_is_public() {
        assert!(!Route::Login { from: None }.is_protected());
        assert!(Route::Dashboard.is_protected());
        assert!(Route::TicketNew.is_protected());
        assert!(Route::TicketDetail { id: "x".into() }.is_protected());
    }
}
