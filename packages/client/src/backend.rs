//! # Backend — abstract interface to the hosted service
//!
//! Everything the app needs from its backend-as-a-service fits in three
//! capability groups, expressed as one async trait so the code above it never
//! cares which implementation it is talking to:
//!
//! | Group | Methods |
//! |-------|---------|
//! | auth | [`sign_up`](Backend::sign_up), [`sign_in_with_password`](Backend::sign_in_with_password), [`sign_in_with_id_token`](Backend::sign_in_with_id_token), [`sign_out`](Backend::sign_out) |
//! | object storage | [`upload_object`](Backend::upload_object), [`remove_objects`](Backend::remove_objects), [`public_object_url`](Backend::public_object_url) |
//! | database | [`insert_row`](Backend::insert_row), [`select_rows`](Backend::select_rows), [`update_rows`](Backend::update_rows), [`delete_rows`](Backend::delete_rows) |
//!
//! Rows travel as [`serde_json::Value`] and only become typed records at the
//! domain layer, mirroring how the service itself is schema-agnostic.
//!
//! Implementations live in sibling modules: [`crate::HttpBackend`] for the
//! real service, [`crate::MemoryBackend`] for tests and offline development.
//!
//! [`Query`] is the tiny filter language the database group accepts: equality
//! predicates plus one order clause. That is all the app ever asks of the
//! row API, and keeping it closed lets the in-memory backend interpret the
//! same query the HTTP backend serialises.

use std::cmp::Ordering;

use chrono::DateTime;
use serde_json::Value;

use crate::error::Error;
use crate::models::Session;

/// Equality filters plus an optional order clause for row operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    filters: Vec<(String, Value)>,
    order: Option<(String, bool)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only rows where `column` equals `value`.
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push((column.to_string(), value.into()));
        self
    }

    /// Order results by `column`, largest/newest first.
    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some((column.to_string(), true));
        self
    }

    /// Render as PostgREST-style query parameters (`col=eq.value`,
    /// `order=col.desc`).
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|(column, value)| (column.clone(), format!("eq.{}", literal(value))))
            .collect();
        if let Some((column, descending)) = &self.order {
            let direction = if *descending { "desc" } else { "asc" };
            params.push(("order".to_string(), format!("{column}.{direction}")));
        }
        params
    }

    /// Does `row` satisfy every filter?
    pub fn matches(&self, row: &Value) -> bool {
        self.filters
            .iter()
            .all(|(column, expected)| row.get(column) == Some(expected))
    }

    /// Sort `rows` by the order clause, if any. String columns that parse as
    /// RFC 3339 timestamps are compared chronologically.
    pub fn sort(&self, rows: &mut [Value]) {
        let Some((column, descending)) = &self.order else {
            return;
        };
        rows.sort_by(|a, b| {
            let ordering = compare_values(a.get(column), b.get(column));
            if *descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }
}

/// A filter value as PostgREST expects it in the URL: strings bare,
/// everything else through its JSON rendering.
fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
                (Ok(tx), Ok(ty)) => tx.cmp(&ty),
                _ => x.cmp(y),
            }
        }
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

/// Async interface to the hosted backend.
///
/// Storage and database methods take the signed-in user's access token so the
/// service can apply its per-user policies; auth methods authenticate with
/// the project key alone.
pub trait Backend: Clone + 'static {
    // Auth
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Option<Session>, Error>>;
    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<Session, Error>>;
    fn sign_in_with_id_token(
        &self,
        provider: &str,
        token: &str,
        redirect_to: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Session, Error>>;
    fn sign_out(
        &self,
        access_token: &str,
    ) -> impl std::future::Future<Output = Result<(), Error>>;

    // Object storage
    fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        access_token: &str,
    ) -> impl std::future::Future<Output = Result<String, Error>>;
    fn remove_objects(
        &self,
        bucket: &str,
        keys: &[String],
        access_token: &str,
    ) -> impl std::future::Future<Output = Result<(), Error>>;
    fn public_object_url(&self, bucket: &str, path: &str) -> String;

    // Database
    fn insert_row(
        &self,
        table: &str,
        row: Value,
        access_token: &str,
    ) -> impl std::future::Future<Output = Result<Value, Error>>;
    fn select_rows(
        &self,
        table: &str,
        query: &Query,
        access_token: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Value>, Error>>;
    fn update_rows(
        &self,
        table: &str,
        patch: Value,
        query: &Query,
        access_token: &str,
    ) -> impl std::future::Future<Output = Result<(), Error>>;
    fn delete_rows(
        &self,
        table: &str,
        query: &Query,
        access_token: &str,
    ) -> impl std::future::Future<Output = Result<(), Error>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params_render_filters_then_order() {
        let query = Query::new()
            .eq("user_id", "user-1")
            .eq("id", 42)
            .order_desc("created_at");
        assert_eq!(
            query.to_params(),
            vec![
                ("user_id".to_string(), "eq.user-1".to_string()),
                ("id".to_string(), "eq.42".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_matches_requires_every_filter() {
        let query = Query::new().eq("user_id", "user-1").eq("id", 7);
        let row = json!({ "id": 7, "user_id": "user-1", "name": "Widget" });
        assert!(query.matches(&row));

        let other_owner = json!({ "id": 7, "user_id": "user-2" });
        assert!(!query.matches(&other_owner));

        let missing_column = json!({ "user_id": "user-1" });
        assert!(!query.matches(&missing_column));
    }

    #[test]
    fn test_sort_compares_timestamps_chronologically() {
        // Mixed sub-second precision would sort wrongly as plain strings.
        let mut rows = vec![
            json!({ "id": 1, "created_at": "2026-03-01T10:00:00+00:00" }),
            json!({ "id": 2, "created_at": "2026-03-01T10:00:00.500000+00:00" }),
            json!({ "id": 3, "created_at": "2026-02-28T23:59:59+00:00" }),
        ];
        Query::new().order_desc("created_at").sort(&mut rows);
        let ids: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_without_order_clause_is_a_noop() {
        let mut rows = vec![json!({ "id": 2 }), json!({ "id": 1 })];
        Query::new().sort(&mut rows);
        assert_eq!(rows[0]["id"], 2);
    }
}
