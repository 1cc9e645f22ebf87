//! Ticket types
//!
//! The backend owns tickets; clients only read and write this shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of tickets per list page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page the server will return
pub const MAX_PAGE_SIZE: u32 = 100;

wire_enum! {
    /// System the issue originated in
    SystemSource {
        Tms => "TMS",
        Oms => "OMS",
        Wms => "WMS",
    }
}

wire_enum! {
    /// Kind of problem reported
    TicketCategory {
        TicketProcess => "TICKET_PROCESS",
        SystemFailure => "SYSTEM_FAILURE",
        CostOptimization => "COST_OPTIMIZATION",
    }
}

wire_enum! {
    /// Team that has to act on the ticket
    HandleType {
        Product => "PRODUCT",
        Dev => "DEV",
        ProductDev => "PRODUCT_DEV",
    }
}

wire_enum! {
    /// Priority level.
    ///
    /// P0 is a crash or broken feature, P1 a blocking bug, P2 a bug off the
    /// main flow and P3 an optimisation.
    TicketPriority {
        P0 => "P0",
        P1 => "P1" | "HIGH",
        P2 => "P2" | "MEDIUM",
        P3 => "P3" | "LOW",
    }
}

wire_enum! {
    /// Ticket lifecycle state.
    ///
    /// CLOSED and VERIFIED come from the earlier four-state lifecycle and
    /// both read as COMPLETED.
    TicketStatus {
        Open => "OPEN",
        Processing => "PROCESSING",
        Completed => "COMPLETED" | "CLOSED" | "VERIFIED",
    }
}

/// Metadata filled in by the backend's analysis pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiMetadata {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub similar_tickets: Vec<String>,
    #[serde(default)]
    pub suggested_solution: Option<String>,
}

/// An after-sales ticket as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub system_source: SystemSource,
    pub category: TicketCategory,
    pub description: String,
    pub handle_type: HandleType,
    #[serde(default)]
    pub handle_detail: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub solution_template: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ai_metadata: AiMetadata,
}

impl Ticket {
    /// Last eight characters of the id, as shown in tables
    pub fn short_id(&self) -> &str {
        let len = self.id.chars().count();
        if len <= 8 {
            return &self.id;
        }
        let start = self
            .id
            .char_indices()
            .nth(len - 8)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        &self.id[start..]
    }

    pub fn is_completed(&self) -> bool {
        self.status == TicketStatus::Completed
    }

    /// Whether the ticket was modified after creation
    pub fn was_updated(&self) -> bool {
        match (self.created_at, self.updated_at) {
            (Some(created), Some(updated)) => updated != created,
            (None, Some(_)) => true,
            _ => false,
        }
    }
}

/// Body of `POST /api/tickets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCreate {
    pub system_source: SystemSource,
    pub category: TicketCategory,
    pub description: String,
    pub handle_type: HandleType,
    #[serde(default)]
    pub handle_detail: String,
    pub priority: TicketPriority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// Body of `PUT /api/tickets/{id}`; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_source: Option<SystemSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TicketCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_type: Option<HandleType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TicketPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl TicketUpdate {
    /// Update that only moves the ticket to `status`
    pub fn status(status: TicketStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Filters and pagination for `GET /api/tickets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketListParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_source: Option<SystemSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TicketCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TicketPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for TicketListParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            system_source: None,
            category: None,
            status: None,
            priority: None,
            search: None,
        }
    }
}

impl TicketListParams {
    /// Query string pairs in wire form; unset filters are omitted
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        if let Some(source) = self.system_source {
            pairs.push(("systemSource", source.as_str().to_string()));
        }
        if let Some(category) = self.category {
            pairs.push(("category", category.as_str().to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }

    /// Encoded query string, without the leading `?`
    pub fn to_query_string(&self) -> String {
        self.to_query_pairs()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Number of rows to skip for the current page
    pub fn offset(&self) -> u64 {
        (self.page.max(1) as u64 - 1) * self.page_size as u64
    }
}

/// One page of tickets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketListResponse {
    pub items: Vec<Ticket>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

/// Pages needed to show `total` rows, `page_size` at a time
pub fn total_pages(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ticket() -> Ticket {
        serde_json::from_str(
            r#"{
                "id": "65f0c1a2b3c4d5e6f7a8b9c0",
                "systemSource": "TMS",
                "category": "SYSTEM_FAILURE",
                "description": "Waybill sync stuck",
                "handleType": "DEV",
                "priority": "P1",
                "status": "OPEN"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ticket_defaults_when_fields_missing() {
        let ticket = sample_ticket();
        assert_eq!(ticket.handle_detail, "");
        assert!(ticket.tags.is_empty());
        assert_eq!(ticket.ai_metadata, AiMetadata::default());
        assert!(ticket.created_at.is_none());
    }

    #[test]
    fn test_legacy_status_values_read_as_completed() {
        assert_eq!("CLOSED".parse::<TicketStatus>(), Ok(TicketStatus::Completed));
        assert_eq!("VERIFIED".parse::<TicketStatus>(), Ok(TicketStatus::Completed));
        let status: TicketStatus = serde_json::from_str(r#""closed""#).unwrap();
        assert_eq!(status, TicketStatus::Completed);
        assert_eq!(serde_json::to_string(&status).unwrap(), r#""COMPLETED""#);
    }

    #[test]
    fn test_legacy_priority_names() {
        assert_eq!("HIGH".parse::<TicketPriority>(), Ok(TicketPriority::P1));
        assert_eq!("low".parse::<TicketPriority>(), Ok(TicketPriority::P3));
        assert!("URGENT".parse::<TicketPriority>().is_err());
    }

    #[test]
    fn test_ai_metadata_camel_case() {
        let json = r#"{"keywords":["sync"],"similarTickets":["a1"],"suggestedSolution":"Restart"}"#;
        let meta: AiMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.similar_tickets, vec!["a1".to_string()]);
        assert_eq!(meta.suggested_solution.as_deref(), Some("Restart"));
    }

    #[test]
    fn test_short_id() {
        let ticket = sample_ticket();
        assert_eq!(ticket.short_id(), "f7a8b9c0");

        let short = Ticket {
            id: "abc".to_string(),
            ..ticket
        };
        assert_eq!(short.short_id(), "abc");
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let update = TicketUpdate::status(TicketStatus::Processing);
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"status":"PROCESSING"}"#
        );
        assert!(!update.is_empty());
        assert!(TicketUpdate::default().is_empty());
    }

    #[test]
    fn test_list_params_query_pairs() {
        let params = TicketListParams {
            page: 2,
            status: Some(TicketStatus::Open),
            search: Some("stuck waybill".to_string()),
            ..Default::default()
        };
        let pairs = params.to_query_pairs();
        assert_eq!(pairs[0], ("page", "2".to_string()));
        assert_eq!(pairs[1], ("pageSize", "10".to_string()));
        assert!(pairs.contains(&("status", "OPEN".to_string())));
        assert!(!pairs.iter().any(|(key, _)| *key == "priority"));
        assert_eq!(
            params.to_query_string(),
            "page=2&pageSize=10&status=OPEN&search=stuck%20waybill"
        );
        assert_eq!(params.offset(), 10);
    }

    #[test]
    fn test_blank_search_is_omitted() {
        let params = TicketListParams {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(params.to_query_string(), "page=1&pageSize=10");
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }
}
