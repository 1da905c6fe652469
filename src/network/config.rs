/// API route configuration.
///
/// The admin pages are served by the same process that implements the API,
/// so the default base URL is empty and every request goes out same-origin
/// relative.  A non-empty base is only useful for tests or a split
/// deployment.
pub struct ApiConfig {
    base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
        }
    }
}

impl ApiConfig {
    /// Create a config pointing at an explicit origin.
    pub fn from_url(url: &str) -> Self {
        Self {
            base_url: url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a server path.  Paths are passed verbatim – the debug
    /// collector lives at `/debug_log`, outside the `/api` prefix, so the
    /// prefix belongs to the caller.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn default_is_same_origin_relative() {
        let config = ApiConfig::default();
        assert_eq!(config.url("/api/sentiment/preview"), "/api/sentiment/preview");
        assert_eq!(config.url("/debug_log"), "/debug_log");
    }

    #[test]
    fn explicit_base_trims_trailing_slash() {
        let config = ApiConfig::from_url("http://localhost:8080/");
        assert_eq!(config.url("/debug_log"), "http://localhost:8080/debug_log");
    }
}
