//! Build-time configuration.
//!
//! A static wasm bundle has no process environment at runtime, so settings are
//! read with `option_env!` when the crate is compiled.

pub const DEFAULT_API_BASE: &str = "http://localhost:8080";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(option_env!("DESPESAS_API_BASE").unwrap_or(DEFAULT_API_BASE))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path` (which must start with `/`) onto the configured origin.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            log_filter: option_env!("DESPESAS_LOG")
                .unwrap_or(DEFAULT_LOG_FILTER)
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = ApiConfig::new("https://api.example.com//");

        assert_eq!(config.base_url(), "https://api.example.com");
        assert_eq!(
            config.endpoint("/despesas/listar"),
            "https://api.example.com/despesas/listar"
        );
    }

    #[test]
    fn default_points_at_local_api() {
        assert_eq!(ApiConfig::default().base_url(), "http://localhost:8080");
    }
}
