//! Ticket form view model
//!
//! Holds raw form input for both create and edit mode, validates it, and
//! turns it into the request body. Edit mode submits only what changed.

use crate::models::{
    HandleType, SystemSource, Ticket, TicketCategory, TicketCreate, TicketPriority, TicketStatus,
    TicketUpdate, ValidationError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit { .. })
    }

    pub fn title(&self) -> &'static str {
        match self {
            FormMode::Create => "New Ticket",
            FormMode::Edit { .. } => "Edit Ticket",
        }
    }
}

/// Raw values as typed into the form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketFormValues {
    pub system_source: Option<SystemSource>,
    pub category: Option<TicketCategory>,
    pub handle_type: Option<HandleType>,
    pub priority: Option<TicketPriority>,
    pub description: String,
    pub handle_detail: String,
    pub tags: Vec<String>,
    pub solution_template: String,
    pub assigned_to: String,
    pub created_by: String,
}

impl TicketFormValues {
    /// Empty create form with the creator pre-filled from the session
    pub fn for_create(username: Option<&str>) -> Self {
        Self {
            created_by: username.unwrap_or_default().to_string(),
            ..Default::default()
        }
    }

    /// Edit form pre-filled from a fetched ticket
    pub fn from_ticket(ticket: &Ticket) -> Self {
        Self {
            system_source: Some(ticket.system_source),
            category: Some(ticket.category),
            handle_type: Some(ticket.handle_type),
            priority: Some(ticket.priority),
            description: ticket.description.clone(),
            handle_detail: ticket.handle_detail.clone(),
            tags: ticket.tags.clone(),
            solution_template: ticket.solution_template.clone().unwrap_or_default(),
            assigned_to: ticket.assigned_to.clone().unwrap_or_default(),
            created_by: ticket.created_by.clone().unwrap_or_default(),
        }
    }

    /// Add a tag; returns false for blanks and duplicates
    pub fn add_tag(&mut self, raw: &str) -> bool {
        let tag = raw.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    /// Check required fields. `current_status` is the status of the ticket
    /// being edited: once work has started the handling notes are required.
    pub fn validate(
        &self,
        mode: &FormMode,
        current_status: Option<TicketStatus>,
    ) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.system_source.is_none() {
            errors.push(ValidationError::new("systemSource", "Select a source system"));
        }
        if self.category.is_none() {
            errors.push(ValidationError::new("category", "Select a category"));
        }
        if self.handle_type.is_none() {
            errors.push(ValidationError::new("handleType", "Select a handle type"));
        }
        if self.priority.is_none() {
            errors.push(ValidationError::new("priority", "Select a priority"));
        }
        if self.description.trim().is_empty() {
            errors.push(ValidationError::new("description", "Describe the problem"));
        }
        match mode {
            FormMode::Create => {
                if self.created_by.trim().is_empty() {
                    errors.push(ValidationError::new("createdBy", "Enter the creator"));
                }
            }
            FormMode::Edit { .. } => {
                let started = current_status.is_some_and(|s| s != TicketStatus::Open);
                if started && self.handle_detail.trim().is_empty() {
                    errors.push(ValidationError::new(
                        "handleDetail",
                        "Describe how the ticket was handled",
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Body for `POST /api/tickets`
    pub fn to_create(&self) -> Result<TicketCreate, Vec<ValidationError>> {
        self.validate(&FormMode::Create, None)?;
        let (Some(system_source), Some(category), Some(handle_type), Some(priority)) =
            (self.system_source, self.category, self.handle_type, self.priority)
        else {
            return Err(Vec::new());
        };

        Ok(TicketCreate {
            system_source,
            category,
            description: self.description.trim().to_string(),
            handle_type,
            handle_detail: self.handle_detail.trim().to_string(),
            priority,
            tags: normalize_tags(&self.tags),
            solution_template: non_blank(&self.solution_template),
            assigned_to: non_blank(&self.assigned_to),
            created_by: non_blank(&self.created_by),
        })
    }

    /// Body for `PUT /api/tickets/{id}` holding only fields that differ
    /// from `original`
    pub fn to_update(&self, original: &Ticket) -> Result<TicketUpdate, Vec<ValidationError>> {
        self.validate(
            &FormMode::Edit {
                id: original.id.clone(),
            },
            Some(original.status),
        )?;

        let description = self.description.trim().to_string();
        let handle_detail = self.handle_detail.trim().to_string();
        let tags = normalize_tags(&self.tags);

        Ok(TicketUpdate {
            system_source: self.system_source.filter(|v| *v != original.system_source),
            category: self.category.filter(|v| *v != original.category),
            description: (description != original.description).then_some(description),
            handle_type: self.handle_type.filter(|v| *v != original.handle_type),
            handle_detail: (handle_detail != original.handle_detail).then_some(handle_detail),
            priority: self.priority.filter(|v| *v != original.priority),
            status: None,
            tags: (tags != original.tags).then_some(tags),
            solution_template: changed_text(&self.solution_template, &original.solution_template),
            assigned_to: changed_text(&self.assigned_to, &original.assigned_to),
            created_by: changed_text(&self.created_by, &original.created_by),
        })
    }
}

/// Trimmed, blank-free, first occurrence wins
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Split comma-separated tag input
pub fn parse_tags(input: &str) -> Vec<String> {
    normalize_tags(&input.split(',').collect::<Vec<_>>())
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// New text when it differs from the stored value. Clearing a field sends
/// an empty string since an absent field means "unchanged".
fn changed_text(value: &str, original: &Option<String>) -> Option<String> {
    let value = value.trim();
    let original = original.as_deref().unwrap_or_default().trim();
    (value != original).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> TicketFormValues {
        TicketFormValues {
            system_source: Some(SystemSource::Tms),
            category: Some(TicketCategory::SystemFailure),
            handle_type: Some(HandleType::Dev),
            priority: Some(TicketPriority::P1),
            description: "  Waybill sync stuck  ".to_string(),
            tags: vec![" sync ".to_string(), "sync".to_string(), "".to_string()],
            ..TicketFormValues::for_create(Some("alice"))
        }
    }

    fn ticket_from(values: &TicketFormValues, status: TicketStatus) -> Ticket {
        let create = values.to_create().unwrap();
        Ticket {
            id: "t-1".to_string(),
            system_source: create.system_source,
            category: create.category,
            description: create.description,
            handle_type: create.handle_type,
            handle_detail: create.handle_detail,
            priority: create.priority,
            status,
            tags: create.tags,
            solution_template: create.solution_template,
            created_by: create.created_by,
            assigned_to: create.assigned_to,
            created_at: None,
            updated_at: None,
            closed_at: None,
            ai_metadata: Default::default(),
        }
    }

    #[test]
    fn test_empty_form_lists_every_missing_field() {
        let errors = TicketFormValues::default()
            .validate(&FormMode::Create, None)
            .unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "systemSource",
                "category",
                "handleType",
                "priority",
                "description",
                "createdBy"
            ]
        );
    }

    #[test]
    fn test_create_body_is_normalised() {
        let create = filled().to_create().unwrap();
        assert_eq!(create.description, "Waybill sync stuck");
        assert_eq!(create.tags, vec!["sync".to_string()]);
        assert_eq!(create.created_by.as_deref(), Some("alice"));
        assert_eq!(create.assigned_to, None);
    }

    #[test]
    fn test_blank_description_rejected() {
        let values = TicketFormValues {
            description: "   ".to_string(),
            ..filled()
        };
        let errors = values.to_create().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "description");
    }

    #[test]
    fn test_unchanged_edit_is_empty() {
        let ticket = ticket_from(&filled(), TicketStatus::Open);
        let values = TicketFormValues::from_ticket(&ticket);
        assert!(values.to_update(&ticket).unwrap().is_empty());
    }

    #[test]
    fn test_edit_submits_only_changes() {
        let ticket = ticket_from(&filled(), TicketStatus::Open);
        let mut values = TicketFormValues::from_ticket(&ticket);
        values.priority = Some(TicketPriority::P0);
        values.assigned_to = "bob".to_string();
        assert!(values.add_tag("urgent"));

        let update = values.to_update(&ticket).unwrap();
        assert_eq!(
            update,
            TicketUpdate {
                priority: Some(TicketPriority::P0),
                assigned_to: Some("bob".to_string()),
                tags: Some(vec!["sync".to_string(), "urgent".to_string()]),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_started_ticket_requires_handle_detail() {
        let ticket = ticket_from(&filled(), TicketStatus::Processing);
        let mut values = TicketFormValues::from_ticket(&ticket);

        let errors = values.to_update(&ticket).unwrap_err();
        assert_eq!(errors[0].field, "handleDetail");

        values.handle_detail = "Restarted the sync worker".to_string();
        let update = values.to_update(&ticket).unwrap();
        assert_eq!(
            update.handle_detail.as_deref(),
            Some("Restarted the sync worker")
        );
    }

    #[test]
    fn test_tag_editing() {
        let mut values = TicketFormValues::default();
        assert!(values.add_tag(" a "));
        assert!(!values.add_tag("a"));
        assert!(!values.add_tag("  "));
        values.remove_tag("a");
        assert!(values.tags.is_empty());

        assert_eq!(parse_tags("x, y,,x , z"), vec!["x", "y", "z"]);
    }
}
