//! # HttpBackend — reqwest implementation of [`Backend`]
//!
//! Talks to a hosted Supabase-compatible project over its REST surface. All
//! routes hang off the project endpoint from [`Config`]:
//!
//! | Group | Routes |
//! |-------|--------|
//! | auth | `POST /auth/v1/signup`, `POST /auth/v1/token?grant_type=password`, `POST /auth/v1/token?grant_type=id_token`, `POST /auth/v1/logout` |
//! | storage | `POST /storage/v1/object/{bucket}/{key}`, `DELETE /storage/v1/object/{bucket}`, public reads under `/storage/v1/object/public/` |
//! | database | `POST`/`GET`/`PATCH`/`DELETE /rest/v1/{table}` |
//!
//! Every request carries the project key in the `apikey` header; storage and
//! database requests also carry the user's bearer token. Non-2xx responses
//! are mapped to the typed [`Error`] variant of the group they came from,
//! keeping whatever human-readable message the service put in the body.

use reqwest::{Client, Response};
use serde_json::{json, Value};

use crate::backend::{Backend, Query};
use crate::config::Config;
use crate::error::Error;
use crate::models::Session;

/// Which service group a request went to, for error classification.
#[derive(Clone, Copy)]
enum Group {
    Auth,
    Storage,
    Database,
}

/// HTTP client for the hosted backend. Cheap to clone; clones share the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    config: Config,
}

impl HttpBackend {
    pub fn new(config: Config) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.url, path)
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    async fn ok_or_error(resp: Response, group: Group) -> Result<Response, Error> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let message = provider_message(&body);
        Err(match group {
            Group::Auth => Error::Auth(message),
            Group::Storage => Error::Storage(message),
            Group::Database => Error::Database(message),
        })
    }

    fn session_from(value: Value) -> Result<Session, Error> {
        serde_json::from_value(value).map_err(|e| Error::Decode(e.to_string()))
    }
}

impl Backend for HttpBackend {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: Option<&str>,
    ) -> Result<Option<Session>, Error> {
        let mut request = self
            .http
            .post(self.endpoint("/auth/v1/signup"))
            .header("apikey", &self.config.anon_key)
            .json(&json!({ "email": email, "password": password }));
        if let Some(redirect) = redirect_to {
            request = request.query(&[("redirect_to", redirect)]);
        }
        let resp = Self::ok_or_error(request.send().await?, Group::Auth).await?;
        let value: Value = resp.json().await?;

        // Auto-confirm projects answer with a full session; projects that
        // require email confirmation answer with the bare user record.
        if value.get("access_token").is_some() {
            Ok(Some(Self::session_from(value)?))
        } else {
            Ok(None)
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, Error> {
        let resp = self
            .http
            .post(self.endpoint("/auth/v1/token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.config.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let resp = Self::ok_or_error(resp, Group::Auth).await?;
        Self::session_from(resp.json().await?)
    }

    async fn sign_in_with_id_token(
        &self,
        provider: &str,
        token: &str,
        redirect_to: Option<&str>,
    ) -> Result<Session, Error> {
        let mut request = self
            .http
            .post(self.endpoint("/auth/v1/token"))
            .query(&[("grant_type", "id_token")])
            .header("apikey", &self.config.anon_key)
            .json(&json!({ "provider": provider, "id_token": token }));
        if let Some(redirect) = redirect_to {
            request = request.query(&[("redirect_to", redirect)]);
        }
        let resp = Self::ok_or_error(request.send().await?, Group::Auth).await?;
        Self::session_from(resp.json().await?)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), Error> {
        let resp = self
            .http
            .post(self.endpoint("/auth/v1/logout"))
            .header("apikey", &self.config.anon_key)
            .header("Authorization", Self::bearer(access_token))
            .send()
            .await?;
        Self::ok_or_error(resp, Group::Auth).await?;
        Ok(())
    }

    async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        access_token: &str,
    ) -> Result<String, Error> {
        let resp = self
            .http
            .post(self.endpoint(&format!("/storage/v1/object/{bucket}/{key}")))
            .header("apikey", &self.config.anon_key)
            .header("Authorization", Self::bearer(access_token))
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;
        let resp = Self::ok_or_error(resp, Group::Storage).await?;

        // The service answers `{"Key": "bucket/key"}`; rows reference the
        // path inside the bucket.
        let value: Value = resp.json().await?;
        let path = value
            .get("Key")
            .and_then(|v| v.as_str())
            .and_then(|full| full.strip_prefix(&format!("{bucket}/")))
            .unwrap_or(key)
            .to_string();
        Ok(path)
    }

    async fn remove_objects(
        &self,
        bucket: &str,
        keys: &[String],
        access_token: &str,
    ) -> Result<(), Error> {
        let resp = self
            .http
            .delete(self.endpoint(&format!("/storage/v1/object/{bucket}")))
            .header("apikey", &self.config.anon_key)
            .header("Authorization", Self::bearer(access_token))
            .json(&json!({ "prefixes": keys }))
            .send()
            .await?;
        Self::ok_or_error(resp, Group::Storage).await?;
        Ok(())
    }

    fn public_object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{bucket}/{path}", self.config.url)
    }

    async fn insert_row(&self, table: &str, row: Value, access_token: &str) -> Result<Value, Error> {
        let resp = self
            .http
            .post(self.endpoint(&format!("/rest/v1/{table}")))
            .header("apikey", &self.config.anon_key)
            .header("Authorization", Self::bearer(access_token))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;
        let resp = Self::ok_or_error(resp, Group::Database).await?;
        let mut rows: Vec<Value> = resp.json().await?;
        if rows.is_empty() {
            return Err(Error::Decode("insert returned no row".to_string()));
        }
        Ok(rows.remove(0))
    }

    async fn select_rows(
        &self,
        table: &str,
        query: &Query,
        access_token: &str,
    ) -> Result<Vec<Value>, Error> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(query.to_params());
        let resp = self
            .http
            .get(self.endpoint(&format!("/rest/v1/{table}")))
            .query(&params)
            .header("apikey", &self.config.anon_key)
            .header("Authorization", Self::bearer(access_token))
            .send()
            .await?;
        let resp = Self::ok_or_error(resp, Group::Database).await?;
        Ok(resp.json().await?)
    }

    async fn update_rows(
        &self,
        table: &str,
        patch: Value,
        query: &Query,
        access_token: &str,
    ) -> Result<(), Error> {
        let resp = self
            .http
            .patch(self.endpoint(&format!("/rest/v1/{table}")))
            .query(&query.to_params())
            .header("apikey", &self.config.anon_key)
            .header("Authorization", Self::bearer(access_token))
            .header("Prefer", "return=minimal")
            .json(&patch)
            .send()
            .await?;
        Self::ok_or_error(resp, Group::Database).await?;
        Ok(())
    }

    async fn delete_rows(&self, table: &str, query: &Query, access_token: &str) -> Result<(), Error> {
        let resp = self
            .http
            .delete(self.endpoint(&format!("/rest/v1/{table}")))
            .query(&query.to_params())
            .header("apikey", &self.config.anon_key)
            .header("Authorization", Self::bearer(access_token))
            .send()
            .await?;
        Self::ok_or_error(resp, Group::Database).await?;
        Ok(())
    }
}

/// Pull the human-readable message out of a provider error body. The three
/// service groups use different JSON shapes (`msg`, `message`,
/// `error_description`, `error`); fall back to the raw body.
fn provider_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "request failed".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_message_reads_known_shapes() {
        assert_eq!(
            provider_message(r#"{"code":400,"msg":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(
            provider_message(r#"{"statusCode":"409","message":"The resource already exists"}"#),
            "The resource already exists"
        );
        assert_eq!(
            provider_message(r#"{"error":"invalid_grant","error_description":"Token expired"}"#),
            "Token expired"
        );
        assert_eq!(provider_message("gateway timeout"), "gateway timeout");
        assert_eq!(provider_message(""), "request failed");
    }

    #[test]
    fn test_public_object_url_shape() {
        let backend = HttpBackend::new(Config::new("https://project.example.com/", "anon"));
        assert_eq!(
            backend.public_object_url("productimages", "abc.png"),
            "https://project.example.com/storage/v1/object/public/productimages/abc.png"
        );
    }
}
