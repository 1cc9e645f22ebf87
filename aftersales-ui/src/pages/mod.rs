//! Pages
//!
//! Top-level page components for each route.

pub mod dashboard;
pub mod login;
pub mod ticket_detail;
pub mod ticket_form;
pub mod ticket_list;

pub use dashboard::Dashboard;
pub use login::Login;
pub use ticket_detail::TicketDetail;
pub use ticket_form::{TicketEdit, TicketNew};
pub use ticket_list::TicketList;
