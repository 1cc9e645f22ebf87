//! User persistence

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{from_millis, to_millis, Store, StoreError, StoreResult};
use crate::models::{User, UserCreate, UserUpdate};

type UserRow = (String, String, String, String, i64);

fn into_user((id, name, email, role, created_at): UserRow) -> StoreResult<User> {
    Ok(User {
        id,
        name,
        email,
        role: role
            .parse()
            .map_err(|e: crate::models::ParseEnumError| StoreError::Corrupt(e.to_string()))?,
        created_at: Some(from_millis(created_at)?),
    })
}

fn fetch_user(conn: &Connection, id: &str) -> StoreResult<Option<User>> {
    let row = conn
        .prepare_cached("SELECT id, name, email, role, created_at FROM users WHERE id = ?")?
        .query_row(params![id], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
        })
        .optional()?;
    row.map(into_user).transpose()
}

/// Id of the user owning `email`, if any
fn email_owner(conn: &Connection, email: &str) -> StoreResult<Option<String>> {
    Ok(conn
        .prepare_cached("SELECT id FROM users WHERE email = ?")?
        .query_row(params![email], |row| row.get(0))
        .optional()?)
}

impl Store {
    /// Register a user; emails are unique
    pub fn create_user(&self, input: &UserCreate) -> StoreResult<User> {
        input.validate()?;

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            role: input.role,
            created_at: Some(Utc::now()),
        };

        let conn = self.lock()?;
        if email_owner(&conn, &user.email)?.is_some() {
            return Err(StoreError::DuplicateEmail(user.email));
        }
        conn.execute(
            "INSERT INTO users (id, name, email, role, created_at) VALUES (?, ?, ?, ?, ?)",
            params![
                user.id,
                user.name,
                user.email,
                user.role.as_str(),
                to_millis(user.created_at.unwrap_or_else(Utc::now)),
            ],
        )?;

        tracing::debug!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Every user, oldest first
    pub fn list_users(&self) -> StoreResult<Vec<User>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, name, email, role, created_at FROM users ORDER BY created_at, rowid",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
            })?
            .collect::<Result<Vec<UserRow>, _>>()?;

        rows.into_iter().map(into_user).collect()
    }

    pub fn get_user(&self, id: &str) -> StoreResult<User> {
        let conn = self.lock()?;
        fetch_user(&conn, id)?.ok_or_else(|| StoreError::user_not_found(id))
    }

    /// Apply the provided fields; an empty update returns the user as is
    pub fn update_user(&self, id: &str, update: &UserUpdate) -> StoreResult<User> {
        update.validate()?;

        let conn = self.lock()?;
        let mut user = fetch_user(&conn, id)?.ok_or_else(|| StoreError::user_not_found(id))?;
        if update.is_empty() {
            return Ok(user);
        }

        if let Some(name) = &update.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = &update.email {
            let email = email.trim();
            if email_owner(&conn, email)?.is_some_and(|owner| owner != user.id) {
                return Err(StoreError::DuplicateEmail(email.to_string()));
            }
            user.email = email.to_string();
        }
        if let Some(role) = update.role {
            user.role = role;
        }

        conn.execute(
            "UPDATE users SET name = ?, email = ?, role = ? WHERE id = ?",
            params![user.name, user.email, user.role.as_str(), user.id],
        )?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn new_user(email: &str) -> UserCreate {
        UserCreate {
            name: "Li Lei".to_string(),
            email: email.to_string(),
            role: UserRole::Developer,
        }
    }

    #[test]
    fn test_create_get_list() {
        let store = Store::open_in_memory().unwrap();
        let first = store.create_user(&new_user("li@example.com")).unwrap();
        store.create_user(&new_user("han@example.com")).unwrap();

        let fetched = store.get_user(&first.id).unwrap();
        assert_eq!(fetched.email, "li@example.com");
        assert_eq!(fetched.role, UserRole::Developer);

        let users = store.list_users().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, first.id);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let store = Store::open_in_memory().unwrap();
        store.create_user(&new_user("li@example.com")).unwrap();

        let err = store.create_user(&new_user("li@example.com")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let store = Store::open_in_memory().unwrap();
        let err = store.create_user(&new_user("not-an-email")).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_partial_update() {
        let store = Store::open_in_memory().unwrap();
        let li = store.create_user(&new_user("li@example.com")).unwrap();
        let han = store.create_user(&new_user("han@example.com")).unwrap();

        let promoted = store
            .update_user(
                &li.id,
                &UserUpdate {
                    role: Some(UserRole::Admin),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(promoted.role, UserRole::Admin);
        assert_eq!(promoted.name, "Li Lei");

        // Keeping your own email is fine, taking someone else's is not
        store
            .update_user(
                &li.id,
                &UserUpdate {
                    email: Some("li@example.com".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        let err = store
            .update_user(
                &han.id,
                &UserUpdate {
                    email: Some("li@example.com".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));

        assert!(matches!(
            store.update_user("missing", &UserUpdate::default()),
            Err(StoreError::NotFound { .. })
        ));
    }
}
