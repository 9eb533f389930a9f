//! In-memory [`Backend`] for tests and offline development.
//!
//! State lives behind an `Arc<Mutex<_>>`, so clones share one "project" the
//! way clones of [`crate::HttpBackend`] share one server. Beyond the trait,
//! tests get three extras: seeded user accounts, one-shot failure injection
//! per operation, and per-operation call counters (to assert that an
//! operation never reached the backend at all).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::backend::{Backend, Query};
use crate::error::Error;
use crate::models::{Session, UserInfo};

/// Per-operation call counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub sign_up: usize,
    pub sign_in: usize,
    pub sign_out: usize,
    pub upload: usize,
    pub remove: usize,
    pub insert: usize,
    pub select: usize,
    pub update: usize,
    pub delete: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.sign_up
            + self.sign_in
            + self.sign_out
            + self.upload
            + self.remove
            + self.insert
            + self.select
            + self.update
            + self.delete
    }
}

#[derive(Debug, Default)]
struct MemoryUser {
    id: String,
    password: String,
}

#[derive(Debug, Default)]
struct Failures {
    upload: Option<String>,
    remove: Option<String>,
    insert: Option<String>,
    select: Option<String>,
    update: Option<String>,
    delete: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<String, MemoryUser>,
    tables: HashMap<String, Vec<Value>>,
    objects: HashMap<String, Vec<u8>>,
    next_row_id: i64,
    counts: CallCounts,
    failures: Failures,
}

/// In-memory stand-in for the hosted backend.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user account (builder form, for test setup).
    pub fn with_user(self, email: &str, password: &str) -> Self {
        self.register_user(email, password);
        self
    }

    /// Seed a user account; returns what the auth service would report.
    pub fn register_user(&self, email: &str, password: &str) -> UserInfo {
        let mut state = self.state.lock().unwrap();
        let user = state
            .users
            .entry(email.to_string())
            .or_insert_with(|| MemoryUser {
                id: Uuid::new_v4().to_string(),
                password: password.to_string(),
            });
        UserInfo {
            id: user.id.clone(),
            email: Some(email.to_string()),
        }
    }

    pub fn has_object(&self, bucket: &str, key: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .objects
            .contains_key(&format!("{bucket}/{key}"))
    }

    pub fn object_count(&self, bucket: &str) -> usize {
        let prefix = format!("{bucket}/");
        self.state
            .lock()
            .unwrap()
            .objects
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .count()
    }

    /// Unfiltered snapshot of a table.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn counts(&self) -> CallCounts {
        self.state.lock().unwrap().counts
    }

    pub fn fail_next_upload(&self, message: &str) {
        self.state.lock().unwrap().failures.upload = Some(message.to_string());
    }

    pub fn fail_next_remove(&self, message: &str) {
        self.state.lock().unwrap().failures.remove = Some(message.to_string());
    }

    pub fn fail_next_insert(&self, message: &str) {
        self.state.lock().unwrap().failures.insert = Some(message.to_string());
    }

    pub fn fail_next_select(&self, message: &str) {
        self.state.lock().unwrap().failures.select = Some(message.to_string());
    }

    pub fn fail_next_update(&self, message: &str) {
        self.state.lock().unwrap().failures.update = Some(message.to_string());
    }

    pub fn fail_next_delete(&self, message: &str) {
        self.state.lock().unwrap().failures.delete = Some(message.to_string());
    }

    fn session_for(user: UserInfo) -> Session {
        Session {
            access_token: Uuid::new_v4().to_string(),
            refresh_token: Uuid::new_v4().to_string(),
            expires_in: Some(3600),
            user,
        }
    }
}

impl Backend for MemoryBackend {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        _redirect_to: Option<&str>,
    ) -> Result<Option<Session>, Error> {
        let mut state = self.state.lock().unwrap();
        state.counts.sign_up += 1;
        if state.users.contains_key(email) {
            return Err(Error::Auth("User already registered".to_string()));
        }
        state.users.insert(
            email.to_string(),
            MemoryUser {
                id: Uuid::new_v4().to_string(),
                password: password.to_string(),
            },
        );
        // Confirmation always happens out-of-band here, so no session yet.
        Ok(None)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, Error> {
        let mut state = self.state.lock().unwrap();
        state.counts.sign_in += 1;
        let user = state
            .users
            .get(email)
            .filter(|user| !password.is_empty() && user.password == password)
            .map(|user| UserInfo {
                id: user.id.clone(),
                email: Some(email.to_string()),
            })
            .ok_or_else(|| Error::Auth("Invalid login credentials".to_string()))?;
        Ok(Self::session_for(user))
    }

    async fn sign_in_with_id_token(
        &self,
        provider: &str,
        token: &str,
        _redirect_to: Option<&str>,
    ) -> Result<Session, Error> {
        let mut state = self.state.lock().unwrap();
        state.counts.sign_in += 1;
        if token.is_empty() {
            return Err(Error::Auth("invalid id token".to_string()));
        }
        // One federated identity per provider; the id is stable so repeated
        // sign-ins resolve to the same owner.
        Ok(Self::session_for(UserInfo {
            id: format!("{provider}-federated-user"),
            email: Some(format!("user@{provider}.example")),
        }))
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), Error> {
        self.state.lock().unwrap().counts.sign_out += 1;
        Ok(())
    }

    async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
        _access_token: &str,
    ) -> Result<String, Error> {
        let mut state = self.state.lock().unwrap();
        state.counts.upload += 1;
        if let Some(message) = state.failures.upload.take() {
            return Err(Error::Storage(message));
        }
        let object_key = format!("{bucket}/{key}");
        if state.objects.contains_key(&object_key) {
            return Err(Error::Storage("The resource already exists".to_string()));
        }
        state.objects.insert(object_key, bytes);
        Ok(key.to_string())
    }

    async fn remove_objects(
        &self,
        bucket: &str,
        keys: &[String],
        _access_token: &str,
    ) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.counts.remove += 1;
        if let Some(message) = state.failures.remove.take() {
            return Err(Error::Storage(message));
        }
        for key in keys {
            state.objects.remove(&format!("{bucket}/{key}"));
        }
        Ok(())
    }

    fn public_object_url(&self, bucket: &str, path: &str) -> String {
        format!("memory://{bucket}/{path}")
    }

    async fn insert_row(&self, table: &str, row: Value, _access_token: &str) -> Result<Value, Error> {
        let mut state = self.state.lock().unwrap();
        state.counts.insert += 1;
        if let Some(message) = state.failures.insert.take() {
            return Err(Error::Database(message));
        }
        let Value::Object(mut fields) = row else {
            return Err(Error::Database("row must be a JSON object".to_string()));
        };
        match fields.get("id").and_then(Value::as_i64) {
            Some(id) => state.next_row_id = state.next_row_id.max(id),
            None => {
                state.next_row_id += 1;
                fields.insert("id".to_string(), Value::from(state.next_row_id));
            }
        }
        fields
            .entry("created_at".to_string())
            .or_insert_with(|| Value::from(Utc::now().to_rfc3339()));

        let stored = Value::Object(fields);
        state
            .tables
            .entry(table.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn select_rows(
        &self,
        table: &str,
        query: &Query,
        _access_token: &str,
    ) -> Result<Vec<Value>, Error> {
        let mut state = self.state.lock().unwrap();
        state.counts.select += 1;
        if let Some(message) = state.failures.select.take() {
            return Err(Error::Database(message));
        }
        let mut rows: Vec<Value> = state
            .tables
            .get(table)
            .map(|rows| rows.iter().filter(|row| query.matches(row)).cloned().collect())
            .unwrap_or_default();
        query.sort(&mut rows);
        Ok(rows)
    }

    async fn update_rows(
        &self,
        table: &str,
        patch: Value,
        query: &Query,
        _access_token: &str,
    ) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.counts.update += 1;
        if let Some(message) = state.failures.update.take() {
            return Err(Error::Database(message));
        }
        let Value::Object(patch) = patch else {
            return Err(Error::Database("patch must be a JSON object".to_string()));
        };
        if let Some(rows) = state.tables.get_mut(table) {
            for row in rows.iter_mut() {
                if !query.matches(row) {
                    continue;
                }
                if let Value::Object(fields) = row {
                    for (key, value) in &patch {
                        fields.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        Ok(())
    }

    async fn delete_rows(&self, table: &str, query: &Query, _access_token: &str) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.counts.delete += 1;
        if let Some(message) = state.failures.delete.take() {
            return Err(Error::Database(message));
        }
        if let Some(rows) = state.tables.get_mut(table) {
            rows.retain(|row| !query.matches(row));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamp() {
        let backend = MemoryBackend::new();
        let stored = backend
            .insert_row("products", json!({ "name": "Widget" }), "")
            .await
            .unwrap();
        assert_eq!(stored["id"], 1);
        assert!(stored["created_at"].is_string());

        let next = backend
            .insert_row("products", json!({ "name": "Gadget" }), "")
            .await
            .unwrap();
        assert_eq!(next["id"], 2);
    }

    #[tokio::test]
    async fn test_select_filters_and_orders() {
        let backend = MemoryBackend::new();
        for (owner, stamp) in [
            ("user-1", "2026-01-01T08:00:00+00:00"),
            ("user-2", "2026-01-01T09:00:00+00:00"),
            ("user-1", "2026-01-01T10:00:00+00:00"),
        ] {
            backend
                .insert_row(
                    "products",
                    json!({ "user_id": owner, "created_at": stamp }),
                    "",
                )
                .await
                .unwrap();
        }

        let query = Query::new().eq("user_id", "user-1").order_desc("created_at");
        let rows = backend.select_rows("products", &query, "").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["created_at"], "2026-01-01T10:00:00+00:00");
        assert_eq!(rows[1]["created_at"], "2026-01-01T08:00:00+00:00");
    }

    #[tokio::test]
    async fn test_update_merges_patch_fields() {
        let backend = MemoryBackend::new();
        let stored = backend
            .insert_row("products", json!({ "name": "Widget", "price": 9.99 }), "")
            .await
            .unwrap();

        let query = Query::new().eq("id", stored["id"].clone());
        backend
            .update_rows("products", json!({ "price": 12.5 }), &query, "")
            .await
            .unwrap();

        let rows = backend.rows("products");
        assert_eq!(rows[0]["price"], 12.5);
        assert_eq!(rows[0]["name"], "Widget");
    }

    #[tokio::test]
    async fn test_delete_rows_removes_matches_only() {
        let backend = MemoryBackend::new();
        backend
            .insert_row("products", json!({ "user_id": "user-1" }), "")
            .await
            .unwrap();
        backend
            .insert_row("products", json!({ "user_id": "user-2" }), "")
            .await
            .unwrap();

        backend
            .delete_rows("products", &Query::new().eq("user_id", "user-1"), "")
            .await
            .unwrap();

        let rows = backend.rows("products");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["user_id"], "user-2");
    }

    #[tokio::test]
    async fn test_upload_rejects_duplicate_key() {
        let backend = MemoryBackend::new();
        backend
            .upload_object("productimages", "a.png", vec![1], "image/png", "")
            .await
            .unwrap();
        let err = backend
            .upload_object("productimages", "a.png", vec![2], "image/png", "")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert!(backend.has_object("productimages", "a.png"));
    }

    #[tokio::test]
    async fn test_remove_missing_object_is_ok() {
        let backend = MemoryBackend::new();
        backend
            .remove_objects("productimages", &["ghost.png".to_string()], "")
            .await
            .unwrap();
        assert_eq!(backend.object_count("productimages"), 0);
    }

    #[tokio::test]
    async fn test_password_sign_in() {
        let backend = MemoryBackend::new().with_user("ada@example.com", "hunter2");

        let session = backend
            .sign_in_with_password("ada@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(session.user.email.as_deref(), Some("ada@example.com"));
        assert!(!session.access_token.is_empty());

        let err = backend
            .sign_in_with_password("ada@example.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
    }

    #[tokio::test]
    async fn test_injected_failure_fires_once() {
        let backend = MemoryBackend::new();
        backend.fail_next_insert("deadlock detected");

        let err = backend
            .insert_row("products", json!({ "name": "Widget" }), "")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "deadlock detected");

        backend
            .insert_row("products", json!({ "name": "Widget" }), "")
            .await
            .unwrap();
        assert_eq!(backend.counts().insert, 2);
    }
}
