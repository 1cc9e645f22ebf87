//! Data Model
//!
//! Wire types shared by the ticket server, the native API client and the
//! browser client. JSON field names are camelCase; enum values travel as
//! their upper-case wire names.

use thiserror::Error;

/// Declares a closed set of wire values.
///
/// Parsing is case-insensitive and accepts the listed aliases, which lets
/// payloads written against older revisions of the backend still decode.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every value, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical wire name
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($wire $(| $alias)* => Ok($name::$variant),)+
                    _ => Err($crate::models::ParseEnumError {
                        kind: stringify!($name),
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub mod stats;
pub mod ticket;
pub mod user;

pub use stats::{StatusOverview, TicketStatistics, TrendPoint, TREND_DAYS};
pub use ticket::{
    total_pages, AiMetadata, HandleType, SystemSource, Ticket, TicketCategory, TicketCreate,
    TicketListParams, TicketListResponse, TicketPriority, TicketStatus, TicketUpdate,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use user::{is_valid_email, User, UserCreate, UserRole, UserUpdate};

/// A string that is not one of the values of a wire enum
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// A field that failed validation, shown next to the field in forms and
/// returned as a 400 by the server
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Generic acknowledgement returned by delete endpoints
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_enum_error_display() {
        let err = "BOGUS".parse::<TicketStatus>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid TicketStatus: BOGUS");
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("description", "Description is required");
        assert_eq!(err.to_string(), "description: Description is required");
    }
}
