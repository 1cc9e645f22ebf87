//! Display labels and colours for wire enums

use chrono::{DateTime, Utc};

use super::chart::{NEON_AMBER, NEON_CYAN, NEON_GREEN, NEON_MAGENTA};
use crate::models::{HandleType, SystemSource, TicketCategory, TicketPriority, TicketStatus, UserRole};

/// Neutral grey for low-key badges
pub const MUTED_GREY: &str = "#6b7280";

/// Something shown to people rather than sent over the wire
pub trait DisplayLabel {
    fn label(&self) -> &'static str;

    /// Badge colour; neutral unless overridden
    fn color(&self) -> &'static str {
        MUTED_GREY
    }
}

impl DisplayLabel for TicketStatus {
    fn label(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::Processing => "Processing",
            TicketStatus::Completed => "Completed",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            TicketStatus::Open => NEON_AMBER,
            TicketStatus::Processing => NEON_CYAN,
            TicketStatus::Completed => NEON_GREEN,
        }
    }
}

impl DisplayLabel for TicketPriority {
    fn label(&self) -> &'static str {
        match self {
            TicketPriority::P0 => "P0 Critical",
            TicketPriority::P1 => "P1 High",
            TicketPriority::P2 => "P2 Medium",
            TicketPriority::P3 => "P3 Low",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            TicketPriority::P0 | TicketPriority::P1 => NEON_MAGENTA,
            TicketPriority::P2 => NEON_CYAN,
            TicketPriority::P3 => MUTED_GREY,
        }
    }
}

impl DisplayLabel for TicketCategory {
    fn label(&self) -> &'static str {
        match self {
            TicketCategory::TicketProcess => "Ticket Process",
            TicketCategory::SystemFailure => "System Failure",
            TicketCategory::CostOptimization => "System Improvement",
        }
    }
}

impl DisplayLabel for SystemSource {
    fn label(&self) -> &'static str {
        self.as_str()
    }
}

impl DisplayLabel for HandleType {
    fn label(&self) -> &'static str {
        match self {
            HandleType::Product => "Product",
            HandleType::Dev => "Development",
            HandleType::ProductDev => "Product + Development",
        }
    }
}

impl DisplayLabel for UserRole {
    fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "Administrator",
            UserRole::Product => "Product",
            UserRole::Developer => "Developer",
        }
    }
}

/// Label for a wire value that may not parse, e.g. a stats map key
pub fn label_or_raw<T>(raw: &str) -> String
where
    T: DisplayLabel + std::str::FromStr,
{
    raw.parse::<T>()
        .map(|value| value.label().to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// `YYYY-MM-DD HH:MM`, or `-` when absent
pub fn format_date(value: Option<DateTime<Utc>>) -> String {
    match value {
        Some(value) => value.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}
