//! Custom AI-analysis panel: pick an analysis type, preview how many
//! messages the current filters select, then run the analysis and render the
//! returned fragment.
//!
//! Overlapping requests are resolved with a per-panel request token: every
//! click bumps the counter, and a response whose token is no longer current
//! is discarded instead of overwriting newer panel state.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, MouseEvent};

use crate::debug_log::DebugLogger;
use crate::dom_utils::{render_error, render_loading, select_value};
use crate::filters::FilterSource;
use crate::network::responses::{AnalyzeResponse, PreviewResponse};
use crate::network::ApiClient;
use crate::utils::{escape_html, local_time_short};

const PANEL_ID: &str = "ai-analysis-panel";
const TYPE_SELECT_ID: &str = "analysis-type";
const PREVIEW_BTN_ID: &str = "analysis-preview-btn";
const RUN_BTN_ID: &str = "analysis-run-btn";
const RESULTS_ID: &str = "analysis-results";

/// Wire the panel if this page hosts it.  Returns `false` when absent.
pub fn init(
    document: &Document,
    api: Rc<ApiClient>,
    filters: Rc<dyn FilterSource>,
    logger: Rc<DebugLogger>,
) -> Result<bool, JsValue> {
    if document.get_element_by_id(PANEL_ID).is_none() {
        return Ok(false);
    }
    let results = document
        .get_element_by_id(RESULTS_ID)
        .ok_or_else(|| JsValue::from_str("analysis panel has no results region"))?;

    // One token per panel – preview and run share it, so whichever request
    // was issued last is the only one allowed to render.
    let token = Rc::new(Cell::new(0u64));

    wire_preview(
        document,
        api.clone(),
        filters.clone(),
        logger.clone(),
        results.clone(),
        token.clone(),
    )?;
    wire_run(document, api, filters, logger, results, token)?;
    Ok(true)
}

fn wire_preview(
    document: &Document,
    api: Rc<ApiClient>,
    filters: Rc<dyn FilterSource>,
    logger: Rc<DebugLogger>,
    results: Element,
    token: Rc<Cell<u64>>,
) -> Result<(), JsValue> {
    let Some(button) = document.get_element_by_id(PREVIEW_BTN_ID) else {
        return Ok(());
    };
    let document = document.clone();

    let closure = Closure::wrap(Box::new(move |_: MouseEvent| {
        let Some(analysis_type) = select_value(&document, TYPE_SELECT_ID) else {
            render_error(&results, "Select an analysis type first");
            return;
        };
        let my_token = token.get() + 1;
        token.set(my_token);

        logger.log(
            "analysis preview requested",
            serde_json::json!({ "analysis_type": analysis_type }),
        );
        render_loading(&results, "Loading preview…");

        let api = api.clone();
        let filter_set = filters.values();
        let results = results.clone();
        let token = token.clone();
        spawn_local(async move {
            let outcome = api.analysis_preview(&analysis_type, &filter_set).await;
            if token.get() != my_token {
                return;
            }
            match outcome.and_then(parse_preview) {
                Ok(resp) if resp.success => {
                    let mut html = format!(
                        "<p>Found {} messages to analyze</p>",
                        resp.message_count
                    );
                    if let Some(preview) = &resp.preview {
                        html.push_str(&format!(
                            "<pre class=\"preview\">{}</pre>",
                            escape_html(preview)
                        ));
                    }
                    results.set_inner_html(&html);
                }
                Ok(resp) => render_error(
                    &results,
                    resp.error.as_deref().unwrap_or("Preview failed"),
                ),
                Err(err) => render_error(&results, &describe(err)),
            }
        });
    }) as Box<dyn FnMut(MouseEvent)>);
    button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_run(
    document: &Document,
    api: Rc<ApiClient>,
    filters: Rc<dyn FilterSource>,
    logger: Rc<DebugLogger>,
    results: Element,
    token: Rc<Cell<u64>>,
) -> Result<(), JsValue> {
    let Some(button) = document.get_element_by_id(RUN_BTN_ID) else {
        return Ok(());
    };
    let document = document.clone();

    let closure = Closure::wrap(Box::new(move |_: MouseEvent| {
        let Some(analysis_type) = select_value(&document, TYPE_SELECT_ID) else {
            render_error(&results, "Select an analysis type first");
            return;
        };
        let my_token = token.get() + 1;
        token.set(my_token);

        logger.log(
            "analysis run requested",
            serde_json::json!({ "analysis_type": analysis_type }),
        );
        render_loading(&results, "Running analysis…");

        let api = api.clone();
        let filter_set = filters.values();
        let results = results.clone();
        let token = token.clone();
        spawn_local(async move {
            let outcome = api.analysis_run(&analysis_type, &filter_set).await;
            if token.get() != my_token {
                return;
            }
            match outcome.and_then(parse_analyze) {
                Ok(resp) if resp.success => {
                    let title = resp.title.as_deref().unwrap_or("Analysis result");
                    // The analysis body is server-rendered HTML; the title is
                    // plain text.
                    let body = resp.body().unwrap_or("");
                    results.set_inner_html(&format!(
                        "<h3>{}</h3><div class=\"analysis-body\">{}</div>\
                         <div class=\"generated-at\">Generated at {}</div>",
                        escape_html(title),
                        body,
                        local_time_short()
                    ));
                }
                Ok(resp) => render_error(
                    &results,
                    resp.error.as_deref().unwrap_or("Analysis failed"),
                ),
                Err(err) => render_error(&results, &describe(err)),
            }
        });
    }) as Box<dyn FnMut(MouseEvent)>);
    button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn parse_preview(text: String) -> Result<PreviewResponse, JsValue> {
    serde_json::from_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_analyze(text: String) -> Result<AnalyzeResponse, JsValue> {
    serde_json::from_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))
}

pub(crate) fn describe(err: JsValue) -> String {
    err.as_string()
        .unwrap_or_else(|| format!("Request failed: {:?}", err))
}
