//! Backend connection settings from environment variables.

/// Connection settings for the hosted backend (a Supabase-compatible
/// project): the project endpoint, its public API key, and the optional
/// Google client id that enables the one-tap sign-in prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub url: String,
    pub anon_key: String,
    pub google_client_id: Option<String>,
}

impl Config {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            google_client_id: None,
        }
    }

    pub fn with_google_client_id(mut self, client_id: impl Into<String>) -> Self {
        let client_id = client_id.into();
        if !client_id.is_empty() {
            self.google_client_id = Some(client_id);
        }
        self
    }

    /// Read settings from the process environment, falling back to the
    /// local development stack when a variable is unset.
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        dotenvy::dotenv().ok();

        let url = std::env::var("BACKEND_URL")
            .unwrap_or_else(|_| "http://localhost:54321".to_string());
        let anon_key = std::env::var("BACKEND_ANON_KEY")
            .unwrap_or_else(|_| "dev-anon-key".to_string());
        let google_client_id = std::env::var("GOOGLE_CLIENT_ID").unwrap_or_default();

        Self::new(url, anon_key).with_google_client_id(google_client_id)
    }

    /// Settings baked in when this crate was compiled. Browser builds have no
    /// process environment, so the deploy pipeline supplies the variables at
    /// build time instead.
    pub fn from_build_env() -> Self {
        let url = option_env!("BACKEND_URL").unwrap_or("http://localhost:54321");
        let anon_key = option_env!("BACKEND_ANON_KEY").unwrap_or("dev-anon-key");
        let google_client_id = option_env!("GOOGLE_CLIENT_ID").unwrap_or("");

        Self::new(url, anon_key).with_google_client_id(google_client_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = Config::new("https://project.example.com/", "key");
        assert_eq!(config.url, "https://project.example.com");
    }

    #[test]
    fn test_empty_google_client_id_stays_unset() {
        let config = Config::new("http://localhost:54321", "key").with_google_client_id("");
        assert!(config.google_client_id.is_none());

        let config = Config::new("http://localhost:54321", "key")
            .with_google_client_id("1234.apps.googleusercontent.com");
        assert_eq!(
            config.google_client_id.as_deref(),
            Some("1234.apps.googleusercontent.com")
        );
    }
}
