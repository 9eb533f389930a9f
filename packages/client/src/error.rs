//! Typed errors for backend operations.

use thiserror::Error;

/// What went wrong talking to the hosted backend.
///
/// The auth, storage, and database variants carry the provider's own
/// human-readable message so the UI can show it verbatim in a notification.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never completed: DNS, connection, timeout.
    #[error("network error: {0}")]
    Network(String),

    /// Rejected by the auth service (bad credentials, unconfirmed email, ...).
    #[error("{0}")]
    Auth(String),

    /// Rejected by the object storage service (collision, size limit, ...).
    #[error("{0}")]
    Storage(String),

    /// Rejected by the database service.
    #[error("{0}")]
    Database(String),

    /// A response arrived but did not have the expected shape.
    #[error("unexpected response from backend: {0}")]
    Decode(String),

    /// An operation that needs a signed-in user was called without one.
    #[error("not signed in")]
    NotAuthenticated,
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::Decode(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}
