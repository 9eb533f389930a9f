pub mod backend;
pub mod config;
pub mod error;
pub mod models;

mod auth;
pub use auth::Auth;

mod http;
pub use http::HttpBackend;

mod memory;
pub use memory::{CallCounts, MemoryBackend};

pub use backend::{Backend, Query};
pub use config::Config;
pub use error::Error;
pub use models::{Session, UserInfo};
