//! Typed response payloads for the admin API.
//!
//! Every endpoint reports `success` plus an optional `error` string; the
//! panels render either the happy-path fields or the error inline.  Parsing
//! is pure serde over the body text returned by the fetch helper, so these
//! types unit-test natively.

use serde::Deserialize;

/// `GET …/preview` – how many messages the current filters would feed into
/// an analysis, with an optional sample.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message_count: u64,
    pub analysis_type: Option<String>,
    pub preview: Option<String>,
    pub error: Option<String>,
}

/// `POST /api/ai-analysis/analyze` – a rendered analysis.  The server emits
/// the payload under either `content` or `result` depending on the analysis
/// type; [`AnalyzeResponse::body`] folds the two.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub success: bool,
    pub title: Option<String>,
    pub content: Option<String>,
    pub result: Option<String>,
    pub error: Option<String>,
}

impl AnalyzeResponse {
    /// The analysis payload, whichever field the server used.  `content`
    /// wins when both are present.
    pub fn body(&self) -> Option<&str> {
        self.content.as_deref().or(self.result.as_deref())
    }
}

/// Bare success/error acknowledgement (analyze, generate, monitor, toggle…).
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub success: bool,
    pub error: Option<String>,
}

/// AI provider configuration as stored server-side.  Serialized back
/// verbatim on save, hence the Serialize derive.
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub struct AiConfig {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub sentiment_enabled: bool,
    #[serde(default)]
    pub summary_enabled: bool,
    #[serde(default)]
    pub auto_reactions_enabled: bool,
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    150
}

/// One configured analysis type, as listed on the settings page.  The server
/// stores the boolean-ish columns as 0/1 integers.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisType {
    pub id: u64,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub icon: Option<String>,
    #[serde(default)]
    pub is_builtin: u8,
    #[serde(default)]
    pub is_active: u8,
    #[serde(default)]
    pub min_messages: u32,
    #[serde(default)]
    pub max_hours: u32,
    #[serde(default)]
    pub requires_group: bool,
    #[serde(default)]
    pub requires_sender: bool,
}

impl AnalysisType {
    pub fn is_builtin(&self) -> bool {
        self.is_builtin == 1
    }

    pub fn is_active(&self) -> bool {
        self.is_active == 1
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisTypesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub types: Vec<AnalysisType>,
    pub error: Option<String>,
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn preview_parses_happy_path() {
        let resp: PreviewResponse =
            serde_json::from_str(r#"{"success":true,"message_count":17}"#).unwrap();
        assert!(resp.success);
        assert_eq!(resp.message_count, 17);
        assert!(resp.error.is_none());
    }

    #[test]
    fn preview_parses_error_shape() {
        let resp: PreviewResponse =
            serde_json::from_str(r#"{"success":false,"error":"no messages"}"#).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("no messages"));
        assert_eq!(resp.message_count, 0);
    }

    #[test]
    fn analyze_body_prefers_content_over_result() {
        let both: AnalyzeResponse = serde_json::from_str(
            r#"{"success":true,"title":"t","content":"<p>c</p>","result":"r"}"#,
        )
        .unwrap();
        assert_eq!(both.body(), Some("<p>c</p>"));

        let result_only: AnalyzeResponse =
            serde_json::from_str(r#"{"success":true,"result":"r"}"#).unwrap();
        assert_eq!(result_only.body(), Some("r"));

        let neither: AnalyzeResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert_eq!(neither.body(), None);
    }

    #[test]
    fn ai_config_defaults_fill_missing_fields() {
        let cfg: AiConfig = serde_json::from_str(r#"{"provider":"ollama"}"#).unwrap();
        assert_eq!(cfg.provider, "ollama");
        assert_eq!(cfg.temperature, 0.7);
        assert_eq!(cfg.max_tokens, 150);
        assert!(!cfg.sentiment_enabled);
    }

    #[test]
    fn analysis_type_int_flags() {
        let t: AnalysisType = serde_json::from_str(
            r#"{"id":3,"display_name":"Daily Recap","is_builtin":1,"is_active":0,
                "min_messages":5,"max_hours":48,"requires_group":true}"#,
        )
        .unwrap();
        assert!(t.is_builtin());
        assert!(!t.is_active());
        assert!(t.requires_group);
        assert!(!t.requires_sender);
    }
}
