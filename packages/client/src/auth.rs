//! Auth operations and the current-session state.
//!
//! [`Auth`] is the only writer of the session. Every successful sign-in,
//! sign-up, and sign-out publishes the new value on a `tokio::sync::watch`
//! channel; anything that needs to react (the session gate in the UI) calls
//! [`Auth::subscribe`] and holds the receiver. Dropping the receiver is the
//! unsubscribe, so a component that goes away stops listening with it.

use std::sync::Arc;

use tokio::sync::watch;

use crate::backend::Backend;
use crate::error::Error;
use crate::models::Session;

/// Client for the backend's auth group, holding the current session.
#[derive(Clone)]
pub struct Auth<B: Backend> {
    backend: B,
    session: Arc<watch::Sender<Option<Session>>>,
}

impl<B: Backend> Auth<B> {
    pub fn new(backend: B) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            backend,
            session: Arc::new(sender),
        }
    }

    /// The current session, if any.
    pub fn session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    /// Watch for session changes. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, Error> {
        let session = self.backend.sign_in_with_password(email, password).await?;
        tracing::info!(user = %session.user.id, "signed in");
        self.session.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// Register a new account. Returns the session when the project
    /// auto-confirms sign-ups; `None` when the user has to confirm by email
    /// first.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: Option<&str>,
    ) -> Result<Option<Session>, Error> {
        let session = self.backend.sign_up(email, password, redirect_to).await?;
        if let Some(session) = &session {
            tracing::info!(user = %session.user.id, "signed up and confirmed");
            self.session.send_replace(Some(session.clone()));
        } else {
            tracing::info!("signed up, confirmation pending");
        }
        Ok(session)
    }

    /// Exchange a federated identity token (e.g. a Google one-tap credential)
    /// for a session.
    pub async fn sign_in_with_id_token(
        &self,
        provider: &str,
        token: &str,
        redirect_to: Option<&str>,
    ) -> Result<Session, Error> {
        let session = self
            .backend
            .sign_in_with_id_token(provider, token, redirect_to)
            .await?;
        tracing::info!(user = %session.user.id, provider, "signed in with id token");
        self.session.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// Sign out and clear the session. Without a session this is a no-op.
    pub async fn sign_out(&self) -> Result<(), Error> {
        let Some(session) = self.session() else {
            return Ok(());
        };
        self.backend.sign_out(&session.access_token).await?;
        self.session.send_replace(None);
        tracing::info!("signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;

    #[tokio::test]
    async fn test_sign_in_publishes_session() {
        let backend = MemoryBackend::new().with_user("ada@example.com", "hunter2");
        let auth = Auth::new(backend);
        let mut changes = auth.subscribe();

        assert!(auth.session().is_none());
        auth.sign_in("ada@example.com", "hunter2").await.unwrap();

        changes.changed().await.unwrap();
        let current = changes.borrow_and_update().clone();
        assert_eq!(
            current.map(|s| s.user.email),
            Some(Some("ada@example.com".to_string()))
        );
        assert!(auth.session().is_some());
    }

    #[tokio::test]
    async fn test_failed_sign_in_leaves_session_absent() {
        let backend = MemoryBackend::new().with_user("ada@example.com", "hunter2");
        let auth = Auth::new(backend);

        let err = auth.sign_in("ada@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
        assert!(auth.session().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_pending_confirmation_has_no_session() {
        let auth = Auth::new(MemoryBackend::new());

        let outcome = auth
            .sign_up("new@example.com", "password", Some("http://localhost:8080"))
            .await
            .unwrap();
        assert!(outcome.is_none());
        assert!(auth.session().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_clears_session_and_notifies() {
        let backend = MemoryBackend::new().with_user("ada@example.com", "hunter2");
        let auth = Auth::new(backend);
        auth.sign_in("ada@example.com", "hunter2").await.unwrap();

        let mut changes = auth.subscribe();
        auth.sign_out().await.unwrap();

        changes.changed().await.unwrap();
        assert!(changes.borrow_and_update().is_none());
        assert!(auth.session().is_none());

        // Signing out again is a quiet no-op.
        auth.sign_out().await.unwrap();
    }

    #[tokio::test]
    async fn test_id_token_sign_in_publishes_session() {
        let auth = Auth::new(MemoryBackend::new());

        let session = auth
            .sign_in_with_id_token("google", "credential-from-one-tap", None)
            .await
            .unwrap();
        assert_eq!(session.user.id, "google-federated-user");
        assert!(auth.session().is_some());

        let err = auth
            .sign_in_with_id_token("google", "", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }
}
