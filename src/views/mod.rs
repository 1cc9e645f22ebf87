//! View Models
//!
//! Platform-neutral state and decisions behind each page. The browser
//! components and the CLI render these; neither re-implements the rules.

pub mod chart;
pub mod dashboard;
pub mod labels;
pub mod notice;
pub mod ticket_detail;
pub mod ticket_form;
pub mod ticket_list;

pub use chart::{ChartKind, ChartPoint, ChartSpec, NEON_PALETTE};
pub use dashboard::{DashboardView, StatusCard};
pub use labels::{format_date, DisplayLabel};
pub use notice::{Notice, NoticeLevel, NOTICE_TIMEOUT_MS};
pub use ticket_detail::{available_actions, can_edit, detail_rows, primary_action, StatusAction};
pub use ticket_form::{normalize_tags, parse_tags, FormMode, TicketFormValues};
pub use ticket_list::{total_caption, FetchSequence, TicketListState, PAGE_SIZE_OPTIONS};
