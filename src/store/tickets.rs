//! Ticket persistence, search and statistics

use chrono::{DateTime, Duration, Utc};
use regex::{Regex, RegexBuilder};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;

use super::{from_millis, to_millis, Store, StoreError, StoreResult};
use crate::models::{
    total_pages, AiMetadata, StatusOverview, Ticket, TicketCreate, TicketListParams,
    TicketListResponse, TicketStatistics, TicketStatus, TicketUpdate, TrendPoint,
    ValidationError, MAX_PAGE_SIZE,
};

const TICKET_COLUMNS: &str = "id, system_source, category, description, handle_type, \
     handle_detail, priority, status, tags, solution_template, created_by, assigned_to, \
     ai_metadata, created_at, updated_at, closed_at";

/// Case-insensitive match against ticket descriptions.
///
/// The search text is tried as a regular expression first; text that does
/// not compile is matched literally.
#[derive(Debug, Clone)]
pub enum DescriptionMatcher {
    Pattern(Regex),
    Literal(String),
}

impl DescriptionMatcher {
    pub fn new(search: &str) -> Self {
        let build = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .size_limit(1 << 20)
                .build()
        };

        match build(search) {
            Ok(re) => DescriptionMatcher::Pattern(re),
            Err(e) => {
                tracing::debug!("Search is not a valid pattern, matching literally: {}", e);
                match build(&regex::escape(search)) {
                    Ok(re) => DescriptionMatcher::Pattern(re),
                    Err(_) => DescriptionMatcher::Literal(search.to_lowercase()),
                }
            }
        }
    }

    pub fn is_match(&self, description: &str) -> bool {
        match self {
            DescriptionMatcher::Pattern(re) => re.is_match(description),
            DescriptionMatcher::Literal(needle) => description.to_lowercase().contains(needle),
        }
    }
}

/// Raw column values; enum and JSON columns are decoded afterwards so a
/// bad row surfaces as `StoreError::Corrupt` rather than a SQLite error
struct TicketRow {
    id: String,
    system_source: String,
    category: String,
    description: String,
    handle_type: String,
    handle_detail: String,
    priority: String,
    status: String,
    tags: String,
    solution_template: Option<String>,
    created_by: Option<String>,
    assigned_to: Option<String>,
    ai_metadata: String,
    created_at: i64,
    updated_at: i64,
    closed_at: Option<i64>,
}

impl TicketRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            system_source: row.get(1)?,
            category: row.get(2)?,
            description: row.get(3)?,
            handle_type: row.get(4)?,
            handle_detail: row.get(5)?,
            priority: row.get(6)?,
            status: row.get(7)?,
            tags: row.get(8)?,
            solution_template: row.get(9)?,
            created_by: row.get(10)?,
            assigned_to: row.get(11)?,
            ai_metadata: row.get(12)?,
            created_at: row.get(13)?,
            updated_at: row.get(14)?,
            closed_at: row.get(15)?,
        })
    }

    fn into_ticket(self) -> StoreResult<Ticket> {
        let corrupt = |e: crate::models::ParseEnumError| StoreError::Corrupt(e.to_string());
        Ok(Ticket {
            system_source: self.system_source.parse().map_err(corrupt)?,
            category: self.category.parse().map_err(corrupt)?,
            handle_type: self.handle_type.parse().map_err(corrupt)?,
            priority: self.priority.parse().map_err(corrupt)?,
            status: self.status.parse().map_err(corrupt)?,
            tags: serde_json::from_str(&self.tags)?,
            ai_metadata: serde_json::from_str(&self.ai_metadata)?,
            created_at: Some(from_millis(self.created_at)?),
            updated_at: Some(from_millis(self.updated_at)?),
            closed_at: self.closed_at.map(from_millis).transpose()?,
            id: self.id,
            description: self.description,
            handle_detail: self.handle_detail,
            solution_template: self.solution_template,
            created_by: self.created_by,
            assigned_to: self.assigned_to,
        })
    }
}

fn fetch_ticket(conn: &Connection, id: &str) -> StoreResult<Option<Ticket>> {
    let sql = format!("SELECT {} FROM tickets WHERE id = ?", TICKET_COLUMNS);
    let row = conn
        .prepare_cached(&sql)?
        .query_row(params![id], TicketRow::from_row)
        .optional()?;
    row.map(TicketRow::into_ticket).transpose()
}

fn write_ticket(conn: &Connection, ticket: &Ticket) -> StoreResult<()> {
    let created_at = ticket.created_at.unwrap_or_else(Utc::now);
    let updated_at = ticket.updated_at.unwrap_or(created_at);

    conn.prepare_cached(
        "INSERT OR REPLACE INTO tickets (id, system_source, category, description, handle_type,
             handle_detail, priority, status, tags, solution_template, created_by, assigned_to,
             ai_metadata, created_at, updated_at, closed_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )?
    .execute(params![
        ticket.id,
        ticket.system_source.as_str(),
        ticket.category.as_str(),
        ticket.description,
        ticket.handle_type.as_str(),
        ticket.handle_detail,
        ticket.priority.as_str(),
        ticket.status.as_str(),
        serde_json::to_string(&ticket.tags)?,
        ticket.solution_template,
        ticket.created_by,
        ticket.assigned_to,
        serde_json::to_string(&ticket.ai_metadata)?,
        to_millis(created_at),
        to_millis(updated_at),
        ticket.closed_at.map(to_millis),
    ])?;
    Ok(())
}

/// Reject list parameters outside the accepted ranges
pub(crate) fn validate_list_params(params: &TicketListParams) -> Result<(), ValidationError> {
    if params.page < 1 {
        return Err(ValidationError::new("page", "Page must be at least 1"));
    }
    if params.page_size < 1 || params.page_size > MAX_PAGE_SIZE {
        return Err(ValidationError::new(
            "pageSize",
            format!("Page size must be between 1 and {}", MAX_PAGE_SIZE),
        ));
    }
    Ok(())
}

impl Store {
    /// Create a ticket stamped with the current time
    pub fn create_ticket(&self, input: &TicketCreate) -> StoreResult<Ticket> {
        self.create_ticket_at(input, Utc::now())
    }

    /// Create a ticket with an explicit creation time.
    ///
    /// New tickets start OPEN with empty analysis metadata.
    pub fn create_ticket_at(
        &self,
        input: &TicketCreate,
        created_at: DateTime<Utc>,
    ) -> StoreResult<Ticket> {
        if input.description.trim().is_empty() {
            return Err(ValidationError::new("description", "Description is required").into());
        }

        let ticket = Ticket {
            id: uuid::Uuid::new_v4().to_string(),
            system_source: input.system_source,
            category: input.category,
            description: input.description.clone(),
            handle_type: input.handle_type,
            handle_detail: input.handle_detail.clone(),
            priority: input.priority,
            status: TicketStatus::Open,
            tags: input.tags.clone(),
            solution_template: input.solution_template.clone(),
            created_by: input.created_by.clone(),
            assigned_to: input.assigned_to.clone(),
            created_at: Some(created_at),
            updated_at: Some(created_at),
            closed_at: None,
            ai_metadata: AiMetadata::default(),
        };

        let conn = self.lock()?;
        write_ticket(&conn, &ticket)?;
        tracing::debug!(ticket_id = %ticket.id, "Ticket created");
        Ok(ticket)
    }

    pub fn get_ticket(&self, id: &str) -> StoreResult<Ticket> {
        let conn = self.lock()?;
        fetch_ticket(&conn, id)?.ok_or_else(|| StoreError::ticket_not_found(id))
    }

    /// Filter, search, order by creation time (newest first) and paginate
    pub fn list_tickets(&self, params: &TicketListParams) -> StoreResult<TicketListResponse> {
        validate_list_params(params)?;

        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        let filters = [
            ("system_source = ?", params.system_source.map(|v| v.as_str())),
            ("category = ?", params.category.map(|v| v.as_str())),
            ("status = ?", params.status.map(|v| v.as_str())),
            ("priority = ?", params.priority.map(|v| v.as_str())),
        ];
        for (clause, value) in filters {
            if let Some(value) = value {
                clauses.push(clause);
                values.push(Value::Text(value.to_string()));
            }
        }
        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        let offset = params.offset() as usize;
        let limit = params.page_size as usize;
        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let conn = self.lock()?;
        let (rows, total) = match search {
            None => {
                let count_sql = format!("SELECT COUNT(*) FROM tickets{}", where_sql);
                let total: i64 = conn.query_row(
                    &count_sql,
                    params_from_iter(values.iter()),
                    |row| row.get(0),
                )?;

                let sql = format!(
                    "SELECT {} FROM tickets{} ORDER BY created_at DESC, rowid DESC LIMIT {} OFFSET {}",
                    TICKET_COLUMNS, where_sql, limit, offset
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params_from_iter(values.iter()), TicketRow::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                (rows, total as u64)
            }
            Some(search) => {
                // SQLite has no regex support, so matching happens here
                let matcher = DescriptionMatcher::new(search);
                let sql = format!(
                    "SELECT {} FROM tickets{} ORDER BY created_at DESC, rowid DESC",
                    TICKET_COLUMNS, where_sql
                );
                let mut stmt = conn.prepare(&sql)?;
                let matching: Vec<TicketRow> = stmt
                    .query_map(params_from_iter(values.iter()), TicketRow::from_row)?
                    .filter(|row| match row {
                        Ok(row) => matcher.is_match(&row.description),
                        Err(_) => true,
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let total = matching.len() as u64;
                let page = matching.into_iter().skip(offset).take(limit).collect();
                (page, total)
            }
        };
        drop(conn);

        let items = rows
            .into_iter()
            .map(TicketRow::into_ticket)
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(TicketListResponse {
            items,
            total,
            page: params.page,
            page_size: params.page_size,
            total_pages: total_pages(total, params.page_size),
        })
    }

    /// Apply the provided fields. An empty update returns the ticket as is;
    /// moving to COMPLETED stamps `closedAt`, moving away clears it.
    pub fn update_ticket(&self, id: &str, update: &TicketUpdate) -> StoreResult<Ticket> {
        if let Some(description) = &update.description {
            if description.trim().is_empty() {
                return Err(
                    ValidationError::new("description", "Description cannot be empty").into(),
                );
            }
        }

        let conn = self.lock()?;
        let mut ticket = fetch_ticket(&conn, id)?.ok_or_else(|| StoreError::ticket_not_found(id))?;
        if update.is_empty() {
            return Ok(ticket);
        }

        let now = Utc::now();
        if let Some(v) = update.system_source {
            ticket.system_source = v;
        }
        if let Some(v) = update.category {
            ticket.category = v;
        }
        if let Some(v) = &update.description {
            ticket.description = v.clone();
        }
        if let Some(v) = update.handle_type {
            ticket.handle_type = v;
        }
        if let Some(v) = &update.handle_detail {
            ticket.handle_detail = v.clone();
        }
        if let Some(v) = update.priority {
            ticket.priority = v;
        }
        if let Some(v) = &update.tags {
            ticket.tags = v.clone();
        }
        if let Some(v) = &update.solution_template {
            ticket.solution_template = Some(v.clone()).filter(|s| !s.is_empty());
        }
        if let Some(v) = &update.assigned_to {
            ticket.assigned_to = Some(v.clone()).filter(|s| !s.is_empty());
        }
        if let Some(v) = &update.created_by {
            ticket.created_by = Some(v.clone()).filter(|s| !s.is_empty());
        }
        if let Some(status) = update.status {
            ticket.status = status;
            ticket.closed_at = match status {
                TicketStatus::Completed => Some(now),
                _ => None,
            };
        }
        ticket.updated_at = Some(now);

        write_ticket(&conn, &ticket)?;
        tracing::debug!(ticket_id = %id, status = %ticket.status, "Ticket updated");
        Ok(ticket)
    }

    /// Mark a ticket COMPLETED, stamping `closedAt` and `updatedAt`
    pub fn close_ticket(&self, id: &str) -> StoreResult<Ticket> {
        let conn = self.lock()?;
        let mut ticket = fetch_ticket(&conn, id)?.ok_or_else(|| StoreError::ticket_not_found(id))?;

        let now = Utc::now();
        ticket.status = TicketStatus::Completed;
        ticket.closed_at = Some(now);
        ticket.updated_at = Some(now);

        write_ticket(&conn, &ticket)?;
        tracing::debug!(ticket_id = %id, "Ticket closed");
        Ok(ticket)
    }

    pub fn delete_ticket(&self, id: &str) -> StoreResult<()> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM tickets WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(StoreError::ticket_not_found(id));
        }
        tracing::debug!(ticket_id = %id, "Ticket deleted");
        Ok(())
    }

    /// Dashboard statistics with the trend window ending on `now`
    pub fn ticket_statistics(&self, now: DateTime<Utc>) -> StoreResult<TicketStatistics> {
        let mut trend = TrendPoint::window(now);
        let window_start = trend
            .first()
            .and_then(|p| p.datetime)
            .map(to_millis)
            .unwrap_or_default();

        let conn = self.lock()?;
        let by_status = group_counts(&conn, "status")?;
        let by_category = group_counts(&conn, "category")?;
        let by_priority = group_counts(&conn, "priority")?;

        let mut stmt = conn.prepare_cached("SELECT created_at FROM tickets WHERE created_at >= ?")?;
        let created: Vec<i64> = stmt
            .query_map(params![window_start], |row| row.get(0))?
            .collect::<Result<_, _>>()?;
        drop(stmt);
        drop(conn);

        for ms in created {
            let at = from_millis(ms)?;
            let bucket = trend.iter_mut().find(|p| {
                p.datetime
                    .is_some_and(|start| at >= start && at < start + Duration::days(1))
            });
            if let Some(point) = bucket {
                point.value += 1;
            }
        }

        let count = |status: TicketStatus| by_status.get(status.as_str()).copied().unwrap_or(0);
        let overview = StatusOverview {
            total: by_status.values().sum(),
            open: count(TicketStatus::Open),
            processing: count(TicketStatus::Processing),
            completed: count(TicketStatus::Completed),
        };

        Ok(TicketStatistics {
            overview,
            by_category,
            by_status,
            by_priority,
            trend,
        })
    }
}

/// `column -> COUNT(*)`; `column` is always one of our own literals
fn group_counts(conn: &Connection, column: &str) -> StoreResult<BTreeMap<String, u64>> {
    let sql = format!(
        "SELECT {col}, COUNT(*) FROM tickets GROUP BY {col}",
        col = column
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut counts = BTreeMap::new();
    for row in rows {
        let (key, count) = row?;
        counts.insert(key, count as u64);
    }
    Ok(counts)
}
