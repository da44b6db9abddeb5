use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Mistral (replies + primary translation)
    pub mistral_api_key: String,
    pub mistral_model: String,
    pub mistral_api_url: String,

    // LibreTranslate (secondary translation)
    pub libretranslate_url: String,

    // Conversation log
    pub database_path: String,

    // Server
    pub port: u16,

    // Outbound provider calls
    pub request_timeout_secs: u64,

    // Shared secret expected from the auth gateway, if configured
    pub gateway_shared_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Mistral
            mistral_api_key: std::env::var("MISTRAL_API_KEY")
                .context("MISTRAL_API_KEY not set")?,
            mistral_model: std::env::var("MISTRAL_MODEL")
                .unwrap_or_else(|_| "mistral-small".to_string()),
            mistral_api_url: std::env::var("MISTRAL_API_URL")
                .unwrap_or_else(|_| "https://api.mistral.ai/v1/chat/completions".to_string()),

            // LibreTranslate
            libretranslate_url: std::env::var("LIBRETRANSLATE_URL")
                .unwrap_or_else(|_| "https://libretranslate.de/translate".to_string()),

            // Conversation log
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/chat.db".to_string()),

            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),

            // Outbound provider calls
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),

            // Gateway trust boundary
            gateway_shared_secret: std::env::var("GATEWAY_SHARED_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "MISTRAL_API_KEY",
            "MISTRAL_MODEL",
            "MISTRAL_API_URL",
            "LIBRETRANSLATE_URL",
            "DATABASE_PATH",
            "PORT",
            "REQUEST_TIMEOUT_SECS",
            "GATEWAY_SHARED_SECRET",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_requires_api_key() {
        clear_env();
        let result = Config::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("MISTRAL_API_KEY"));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        std::env::set_var("MISTRAL_API_KEY", "test-key");

        let config = Config::from_env().expect("Should load with defaults");
        assert_eq!(config.mistral_api_key, "test-key");
        assert_eq!(config.mistral_model, "mistral-small");
        assert_eq!(
            config.mistral_api_url,
            "https://api.mistral.ai/v1/chat/completions"
        );
        assert_eq!(
            config.libretranslate_url,
            "https://libretranslate.de/translate"
        );
        assert_eq!(config.database_path, "data/chat.db");
        assert_eq!(config.port, 5000);
        assert_eq!(config.request_timeout_secs, 8);
        assert!(config.gateway_shared_secret.is_none());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("MISTRAL_API_KEY", "test-key");
        std::env::set_var("MISTRAL_MODEL", "mistral-tiny");
        std::env::set_var("PORT", "8080");
        std::env::set_var("GATEWAY_SHARED_SECRET", "hunter2");

        let config = Config::from_env().expect("Should load");
        assert_eq!(config.mistral_model, "mistral-tiny");
        assert_eq!(config.port, 8080);
        assert_eq!(config.gateway_shared_secret.as_deref(), Some("hunter2"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_empty_secret_treated_as_unset() {
        clear_env();
        std::env::set_var("MISTRAL_API_KEY", "test-key");
        std::env::set_var("GATEWAY_SHARED_SECRET", "");

        let config = Config::from_env().expect("Should load");
        assert!(config.gateway_shared_secret.is_none());

        clear_env();
    }
}
