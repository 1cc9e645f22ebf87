//! Ticket list view model
//!
//! Owns the filter and pagination state behind the list page. Any filter
//! change sends the user back to page 1.

use crate::models::{
    total_pages, SystemSource, TicketCategory, TicketListParams, TicketPriority, TicketStatus,
    MAX_PAGE_SIZE,
};
use crate::routing::route::query_param;
use crate::routing::Route;

/// Page sizes offered by the pager
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketListState {
    params: TicketListParams,
}

impl TicketListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial state from the page's query string (`status=OPEN` or
    /// `status=OPEN,PROCESSING`; only the first status is used)
    pub fn from_query(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let status = query_param(query, "status")
            .and_then(|raw| raw.split(',').next().and_then(|s| s.parse().ok()));
        Self::with_status(status)
    }

    pub fn from_route(route: &Route) -> Self {
        match route {
            Route::TicketList { status } => Self::with_status(*status),
            _ => Self::default(),
        }
    }

    fn with_status(status: Option<TicketStatus>) -> Self {
        Self {
            params: TicketListParams {
                status,
                ..Default::default()
            },
        }
    }

    pub fn params(&self) -> &TicketListParams {
        &self.params
    }

    pub fn set_status(&mut self, status: Option<TicketStatus>) {
        self.params.status = status;
        self.params.page = 1;
    }

    pub fn set_system_source(&mut self, source: Option<SystemSource>) {
        self.params.system_source = source;
        self.params.page = 1;
    }

    pub fn set_category(&mut self, category: Option<TicketCategory>) {
        self.params.category = category;
        self.params.page = 1;
    }

    pub fn set_priority(&mut self, priority: Option<TicketPriority>) {
        self.params.priority = priority;
        self.params.page = 1;
    }

    /// Blank search text clears the search
    pub fn set_search(&mut self, text: &str) {
        let text = text.trim();
        self.params.search = (!text.is_empty()).then(|| text.to_string());
        self.params.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.params.page = page.max(1);
    }

    /// Change the page size, keeping filters and returning to page 1
    pub fn set_page_size(&mut self, page_size: u32) {
        self.params.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self.params.page = 1;
    }

    /// Drop every filter, keeping the page size
    pub fn reset_filters(&mut self) {
        self.params = TicketListParams {
            page_size: self.params.page_size,
            ..Default::default()
        };
    }

    pub fn has_filters(&self) -> bool {
        let p = &self.params;
        p.status.is_some()
            || p.system_source.is_some()
            || p.category.is_some()
            || p.priority.is_some()
            || p.search.is_some()
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total_pages(total, self.params.page_size)
    }

    pub fn has_next_page(&self, total: u64) -> bool {
        (self.params.page as u64) < self.total_pages(total)
    }

    pub fn has_prev_page(&self) -> bool {
        self.params.page > 1
    }

    /// URL for the current status filter
    pub fn route(&self) -> Route {
        Route::TicketList {
            status: self.params.status,
        }
    }
}

/// Pager caption
pub fn total_caption(total: u64) -> String {
    format!("Total {}", total)
}

/// Numbers list fetches so a slow response cannot overwrite the result of
/// a later request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSequence {
    latest: u64,
}

impl FetchSequence {
    /// Ticket for a request about to be sent
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Whether the response for `ticket` is still the one to show
    pub fn is_current(&self, ticket: u64) -> bool {
        ticket == self.latest
    }
}
