use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use crate::filters::FilterSet;
use crate::network::responses::AiConfig;
use crate::network::ApiConfig;
use crate::utils::query_string;

/// REST client for the admin API.  One thin `fetch_json` helper plus a typed
/// wrapper per endpoint; response bodies come back as text for the caller to
/// decode with serde.
pub struct ApiClient {
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    // ---------------- AI analysis ----------------

    /// Preview how many messages the filters select for an analysis type.
    pub async fn analysis_preview(
        &self,
        analysis_type: &str,
        filters: &FilterSet,
    ) -> Result<String, JsValue> {
        let url = self.analysis_preview_url(analysis_type, filters);
        Self::fetch_json(&url, "GET", None).await
    }

    /// Run an analysis over the currently filtered messages.
    pub async fn analysis_run(
        &self,
        analysis_type: &str,
        filters: &FilterSet,
    ) -> Result<String, JsValue> {
        let url = self.config.url("/api/ai-analysis/analyze");
        let body = analyze_body(analysis_type, filters);
        Self::fetch_json(&url, "POST", Some(&body)).await
    }

    pub async fn analysis_types(&self) -> Result<String, JsValue> {
        let url = self.config.url("/api/ai-analysis/types");
        Self::fetch_json(&url, "GET", None).await
    }

    pub async fn toggle_analysis_type(&self, id: u64) -> Result<String, JsValue> {
        let url = self
            .config
            .url(&format!("/api/ai-analysis/type/{}/toggle", id));
        Self::fetch_json(&url, "POST", None).await
    }

    pub async fn delete_analysis_type(&self, id: u64) -> Result<String, JsValue> {
        let url = self.config.url(&format!("/api/ai-analysis/type/{}", id));
        Self::fetch_json(&url, "DELETE", None).await
    }

    // ---------------- Sentiment ----------------

    pub async fn sentiment_preview(&self, filters: &FilterSet) -> Result<String, JsValue> {
        let url = self.preview_url("/api/sentiment/preview", filters);
        Self::fetch_json(&url, "GET", None).await
    }

    pub async fn sentiment_analyze(
        &self,
        filters: &FilterSet,
        force_refresh: bool,
    ) -> Result<String, JsValue> {
        let url = self.config.url("/api/sentiment/analyze");
        let body = refreshable_body(filters, force_refresh);
        Self::fetch_json(&url, "POST", Some(&body)).await
    }

    // ---------------- Summary ----------------

    pub async fn summary_preview(&self, filters: &FilterSet) -> Result<String, JsValue> {
        let url = self.preview_url("/api/summary/preview", filters);
        Self::fetch_json(&url, "GET", None).await
    }

    pub async fn summary_generate(
        &self,
        filters: &FilterSet,
        force_refresh: bool,
    ) -> Result<String, JsValue> {
        let url = self.config.url("/api/summary/generate");
        let body = refreshable_body(filters, force_refresh);
        Self::fetch_json(&url, "POST", Some(&body)).await
    }

    // ---------------- AI provider config ----------------

    pub async fn load_ai_config(&self) -> Result<String, JsValue> {
        let url = self.config.url("/api/ai-config");
        Self::fetch_json(&url, "GET", None).await
    }

    pub async fn save_ai_config(&self, config: &AiConfig) -> Result<String, JsValue> {
        let url = self.config.url("/api/ai-config");
        let body = serde_json::to_string(config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::fetch_json(&url, "POST", Some(&body)).await
    }

    pub async fn test_ai_connection(&self) -> Result<String, JsValue> {
        let url = self.config.url("/api/ai-config/test");
        Self::fetch_json(&url, "POST", None).await
    }

    // ---------------- Groups ----------------

    pub async fn set_group_monitored(
        &self,
        group_id: &str,
        is_monitored: bool,
    ) -> Result<String, JsValue> {
        let url = self.config.url("/api/groups/monitor");
        let body = serde_json::json!({
            "group_id": group_id,
            "is_monitored": is_monitored,
        })
        .to_string();
        Self::fetch_json(&url, "POST", Some(&body)).await
    }

    // ---------------- Debug collector ----------------

    /// Deliver a debug report.  The response is ignored – the collector is a
    /// best-effort sink.
    pub async fn send_debug_report(&self, report_json: &str) -> Result<(), JsValue> {
        let url = self.config.url(crate::constants::DEBUG_LOG_ENDPOINT);
        let _ = Self::fetch_json(&url, "POST", Some(report_json)).await?;
        Ok(())
    }

    // ---------------- URL building (pure, unit-tested) ----------------

    fn analysis_preview_url(&self, analysis_type: &str, filters: &FilterSet) -> String {
        let mut pairs = vec![("analysis_type", analysis_type.to_string())];
        pairs.extend(filters.query_pairs());
        format!(
            "{}?{}",
            self.config.url("/api/ai-analysis/preview"),
            query_string(&pairs)
        )
    }

    fn preview_url(&self, path: &str, filters: &FilterSet) -> String {
        let pairs = filters.query_pairs();
        if pairs.is_empty() {
            self.config.url(path)
        } else {
            format!("{}?{}", self.config.url(path), query_string(&pairs))
        }
    }

    // -------------------------------------------------------------------
    // The single fetch helper everything above funnels through.
    // -------------------------------------------------------------------

    pub async fn fetch_json(url: &str, method: &str, body: Option<&str>) -> Result<String, JsValue> {
        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::SameOrigin);

        let headers = Headers::new()?;
        if let Some(data) = body {
            let js_body = JsValue::from_str(data);
            opts.set_body(&js_body);
            headers.append("Content-Type", "application/json")?;
        }
        opts.set_headers(&headers);

        let request = Request::new_with_str_and_init(url, &opts)?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
        let resp: Response = resp_value.dyn_into()?;

        if !resp.ok() {
            let status = resp.status();
            let status_text = resp.status_text();
            return Err(JsValue::from_str(&format!(
                "API request failed: {} {}",
                status, status_text
            )));
        }

        // Body as text – the caller decodes JSON.
        let text = JsFuture::from(resp.text()?).await?;
        Ok(text.as_string().unwrap_or_default())
    }
}

/// Body for `POST /api/ai-analysis/analyze`: the analysis type plus whichever
/// filters are set.  Unset filters are omitted, not sent as null.
fn analyze_body(analysis_type: &str, filters: &FilterSet) -> String {
    let mut map = serde_json::Map::new();
    map.insert("analysis_type".into(), analysis_type.into());
    extend_with_filters(&mut map, filters);
    serde_json::Value::Object(map).to_string()
}

/// Body for the sentiment/summary run endpoints: optional filters plus a
/// `force_refresh` flag, included only when the user asked to bypass the
/// server-side cache.
fn refreshable_body(filters: &FilterSet, force_refresh: bool) -> String {
    let mut map = serde_json::Map::new();
    extend_with_filters(&mut map, filters);
    if force_refresh {
        map.insert("force_refresh".into(), true.into());
    }
    serde_json::Value::Object(map).to_string()
}

fn extend_with_filters(map: &mut serde_json::Map<String, serde_json::Value>, filters: &FilterSet) {
    if let Some(group_id) = &filters.group_id {
        map.insert("group_id".into(), group_id.as_str().into());
    }
    if let Some(sender_id) = &filters.sender_id {
        map.insert("sender_id".into(), sender_id.as_str().into());
    }
    if let Some(date) = &filters.date {
        map.insert("date".into(), date.as_str().into());
    }
    if let Some(hours) = filters.hours {
        map.insert("hours".into(), hours.into());
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::network::ApiConfig;

    fn client() -> ApiClient {
        ApiClient::new(ApiConfig::default())
    }

    fn filters() -> FilterSet {
        FilterSet {
            group_id: Some("grp+1=".into()),
            sender_id: None,
            date: Some("2026-08-05".into()),
            hours: Some(24),
        }
    }

    #[test]
    fn analysis_preview_url_carries_type_and_filters() {
        let url = client().analysis_preview_url("daily", &filters());
        assert_eq!(
            url,
            "/api/ai-analysis/preview?analysis_type=daily&group_id=grp%2B1%3D&date=2026-08-05&hours=24"
        );
    }

    #[test]
    fn preview_url_without_filters_has_no_query() {
        let url = client().preview_url("/api/summary/preview", &FilterSet::default());
        assert_eq!(url, "/api/summary/preview");
    }

    #[test]
    fn analyze_body_omits_unset_filters() {
        let body: serde_json::Value =
            serde_json::from_str(&analyze_body("custom", &filters())).unwrap();
        assert_eq!(body["analysis_type"], "custom");
        assert_eq!(body["group_id"], "grp+1=");
        assert_eq!(body["hours"], 24);
        assert!(body.get("sender_id").is_none());
    }

    #[test]
    fn force_refresh_flag_only_present_when_set() {
        let with: serde_json::Value =
            serde_json::from_str(&refreshable_body(&FilterSet::default(), true)).unwrap();
        assert_eq!(with["force_refresh"], true);

        let without: serde_json::Value =
            serde_json::from_str(&refreshable_body(&FilterSet::default(), false)).unwrap();
        assert!(without.get("force_refresh").is_none());
    }
}
