//! Sentiment panel: preview the message count for the selected group/date,
//! or kick off a full sentiment analysis.  A successful analysis reloads the
//! page so the server-rendered results section picks up the new data.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlElement, MouseEvent};

use crate::components::analysis_panel::describe;
use crate::debug_log::DebugLogger;
use crate::dom_utils::{checkbox_checked, render_error, render_loading, set_button_loading};
use crate::filters::FilterSource;
use crate::network::responses::{PreviewResponse, StatusResponse};
use crate::network::ApiClient;

const PANEL_ID: &str = "sentiment-panel";
const PREVIEW_BTN_ID: &str = "sentiment-preview-btn";
const ANALYZE_BTN_ID: &str = "sentiment-analyze-btn";
const RESULTS_ID: &str = "sentiment-results";
const FORCE_REFRESH_ID: &str = "force-refresh";

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
        .ok_or_else(|| JsValue::from_str("sentiment panel has no results region"))?;

    if let Some(button) = document.get_element_by_id(PREVIEW_BTN_ID) {
        let api = api.clone();
        let filters = filters.clone();
        let logger = logger.clone();
        let results = results.clone();
        let closure = Closure::wrap(Box::new(move |_: MouseEvent| {
            logger.log("sentiment preview requested", serde_json::json!({}));
            render_loading(&results, "Counting messages…");
            let api = api.clone();
            let filter_set = filters.values();
            let results = results.clone();
            spawn_local(async move {
                let outcome = api
                    .sentiment_preview(&filter_set)
                    .await
                    .and_then(|text| {
                        serde_json::from_str::<PreviewResponse>(&text)
                            .map_err(|e| JsValue::from_str(&e.to_string()))
                    });
                match outcome {
                    Ok(resp) if resp.success => results.set_inner_html(&format!(
                        "<p>Found {} messages to analyze</p>",
                        resp.message_count
                    )),
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
    }

    if let Some(button) = document.get_element_by_id(ANALYZE_BTN_ID) {
        let btn_el: HtmlElement = button.clone().unchecked_into();
        let document = document.clone();
        let results = results.clone();
        let closure = Closure::wrap(Box::new(move |_: MouseEvent| {
            let force_refresh = checkbox_checked(&document, FORCE_REFRESH_ID);
            logger.log(
                "sentiment analysis requested",
                serde_json::json!({ "force_refresh": force_refresh }),
            );
            set_button_loading(&btn_el, true, Some("⏳ Analyzing…"));

            let api = api.clone();
            let filter_set = filters.values();
            let results = results.clone();
            let btn_el = btn_el.clone();
            spawn_local(async move {
                let outcome = api
                    .sentiment_analyze(&filter_set, force_refresh)
                    .await
                    .and_then(|text| {
                        serde_json::from_str::<StatusResponse>(&text)
                            .map_err(|e| JsValue::from_str(&e.to_string()))
                    });
                match outcome {
                    Ok(resp) if resp.success => {
                        // Results are server-rendered; a reload shows them.
                        if let Some(window) = web_sys::window() {
                            let _ = window.location().reload();
                        }
                    }
                    Ok(resp) => {
                        render_error(
                            &results,
                            resp.error.as_deref().unwrap_or("Analysis failed"),
                        );
                        set_button_loading(&btn_el, false, None);
                    }
                    Err(err) => {
                        render_error(&results, &describe(err));
                        set_button_loading(&btn_el, false, None);
                    }
                }
            });
        }) as Box<dyn FnMut(MouseEvent)>);
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(true)
}
