//! Ticket detail view model: which status actions a ticket offers and the
//! rows of the read view

use super::labels::{format_date, DisplayLabel};
use crate::models::{Ticket, TicketStatus, TicketUpdate};

/// Something the detail page lets the user do to a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    /// OPEN -> PROCESSING
    StartProcessing,
    /// PROCESSING -> COMPLETED
    Complete,
    /// Any open state -> COMPLETED through the close endpoint
    Close,
    Delete,
}

impl StatusAction {
    pub fn label(&self) -> &'static str {
        match self {
            StatusAction::StartProcessing => "Start processing",
            StatusAction::Complete => "Complete",
            StatusAction::Close => "Close",
            StatusAction::Delete => "Delete",
        }
    }

    /// Status the ticket ends up in, if the action keeps it around
    pub fn target_status(&self) -> Option<TicketStatus> {
        match self {
            StatusAction::StartProcessing => Some(TicketStatus::Processing),
            StatusAction::Complete | StatusAction::Close => Some(TicketStatus::Completed),
            StatusAction::Delete => None,
        }
    }

    /// Update body for actions carried out through `PUT /api/tickets/{id}`
    pub fn to_update(&self) -> Option<TicketUpdate> {
        match self {
            StatusAction::StartProcessing | StatusAction::Complete => {
                self.target_status().map(TicketUpdate::status)
            }
            StatusAction::Close | StatusAction::Delete => None,
        }
    }

    /// Confirmation prompt for actions that cannot be undone
    pub fn confirmation(&self) -> Option<&'static str> {
        match self {
            StatusAction::Close => Some("Close this ticket?"),
            StatusAction::Delete => Some("Delete this ticket? This cannot be undone."),
            _ => None,
        }
    }

    pub fn is_destructive(&self) -> bool {
        matches!(self, StatusAction::Delete)
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            StatusAction::StartProcessing => "Ticket moved to processing",
            StatusAction::Complete => "Ticket completed",
            StatusAction::Close => "Ticket closed",
            StatusAction::Delete => "Ticket deleted",
        }
    }
}

/// The forward transition for `status`
pub fn primary_action(status: TicketStatus) -> Option<StatusAction> {
    match status {
        TicketStatus::Open => Some(StatusAction::StartProcessing),
        TicketStatus::Processing => Some(StatusAction::Complete),
        TicketStatus::Completed => None,
    }
}

/// Every action offered for `status`, primary first
pub fn available_actions(status: TicketStatus) -> Vec<StatusAction> {
    let mut actions: Vec<StatusAction> = primary_action(status).into_iter().collect();
    if status != TicketStatus::Completed {
        actions.push(StatusAction::Close);
    }
    actions.push(StatusAction::Delete);
    actions
}

/// Completed tickets are read-only
pub fn can_edit(status: TicketStatus) -> bool {
    status != TicketStatus::Completed
}

/// Label/value rows of the read view
pub fn detail_rows(ticket: &Ticket) -> Vec<(&'static str, String)> {
    let or_dash = |value: Option<&str>| {
        value
            .filter(|v| !v.trim().is_empty())
            .unwrap_or("-")
            .to_string()
    };

    let mut rows = vec![
        ("ID", ticket.id.clone()),
        ("Status", ticket.status.label().to_string()),
        ("Priority", ticket.priority.label().to_string()),
        ("System", ticket.system_source.label().to_string()),
        ("Category", ticket.category.label().to_string()),
        ("Handled by", ticket.handle_type.label().to_string()),
        ("Created by", or_dash(ticket.created_by.as_deref())),
        ("Assigned to", or_dash(ticket.assigned_to.as_deref())),
        ("Created", format_date(ticket.created_at)),
    ];
    if ticket.was_updated() {
        rows.push(("Updated", format_date(ticket.updated_at)));
    }
    if ticket.closed_at.is_some() {
        rows.push(("Closed", format_date(ticket.closed_at)));
    }
    rows.push((
        "Tags",
        if ticket.tags.is_empty() {
            "-".to_string()
        } else {
            ticket.tags.join(", ")
        },
    ));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HandleType, SystemSource, TicketCategory, TicketPriority};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_open_ticket_actions() {
        assert_eq!(
            available_actions(TicketStatus::Open),
            vec![
                StatusAction::StartProcessing,
                StatusAction::Close,
                StatusAction::Delete
            ]
        );
        assert!(can_edit(TicketStatus::Open));
    }

    #[test]
    fn test_processing_ticket_actions() {
        assert_eq!(
            primary_action(TicketStatus::Processing),
            Some(StatusAction::Complete)
        );
        assert_eq!(
            available_actions(TicketStatus::Processing),
            vec![StatusAction::Complete, StatusAction::Close, StatusAction::Delete]
        );
    }

    #[test]
    fn test_completed_ticket_is_read_only() {
        assert_eq!(
            available_actions(TicketStatus::Completed),
            vec![StatusAction::Delete]
        );
        assert!(!can_edit(TicketStatus::Completed));
    }

    #[test]
    fn test_action_updates() {
        assert_eq!(
            StatusAction::StartProcessing.to_update(),
            Some(TicketUpdate::status(TicketStatus::Processing))
        );
        assert_eq!(
            StatusAction::Complete.to_update(),
            Some(TicketUpdate::status(TicketStatus::Completed))
        );
        assert_eq!(StatusAction::Close.to_update(), None);
        assert!(StatusAction::Delete.confirmation().is_some());
        assert!(StatusAction::Delete.is_destructive());
    }

    #[test]
    fn test_detail_rows() {
        let created = Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap();
        let ticket = Ticket {
            id: "t-1".to_string(),
            system_source: SystemSource::Oms,
            category: TicketCategory::TicketProcess,
            description: "Order stuck".to_string(),
            handle_type: HandleType::Dev,
            handle_detail: String::new(),
            priority: TicketPriority::P2,
            status: TicketStatus::Open,
            tags: vec!["order".to_string()],
            solution_template: None,
            created_by: Some("alice".to_string()),
            assigned_to: Some("  ".to_string()),
            created_at: Some(created),
            updated_at: Some(created),
            closed_at: None,
            ai_metadata: Default::default(),
        };

        let rows = detail_rows(&ticket);
        let get = |label: &str| {
            rows.iter()
                .find(|(l, _)| *l == label)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(get("Status").as_deref(), Some("Open"));
        assert_eq!(get("Assigned to").as_deref(), Some("-"));
        assert_eq!(get("Created").as_deref(), Some("2024-02-01 10:00"));
        assert_eq!(get("Updated"), None);
        assert_eq!(get("Tags").as_deref(), Some("order"));
    }
}
