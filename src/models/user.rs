//! User types for `/api/users`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationError;

wire_enum! {
    /// Role of a user in the ticket workflow
    UserRole {
        Admin => "ADMIN",
        Product => "PRODUCT",
        Developer => "DEVELOPER",
    }
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /api/users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl UserCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", "Name is required"));
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::new(
                "email",
                format!("Invalid email address: {}", self.email),
            ));
        }
        Ok(())
    }
}

/// Body of `PUT /api/users/{id}`; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::new("name", "Name cannot be empty"));
            }
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                return Err(ValidationError::new(
                    "email",
                    format!("Invalid email address: {}", email),
                ));
            }
        }
        Ok(())
    }
}

/// Minimal structural email check: one `@`, non-empty local part, dotted domain
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
