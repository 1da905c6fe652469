//! In-browser behaviour tests: toast replacement, tab activation, debounce
//! collapse, and debug-logger enablement/persistence.
//!
//! Run with `wasm-pack test --headless --chrome` (or firefox).

#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;
use web_sys::Document;

use signal_admin_frontend::constants::DEBUG_STORAGE_KEY;
use signal_admin_frontend::debounce::Debouncer;
use signal_admin_frontend::debug_log::DebugLogger;
use signal_admin_frontend::network::{ApiClient, ApiConfig};
use signal_admin_frontend::tabs::TabController;
use signal_admin_frontend::toast::{Notifier, ToastKind};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn toast_count(document: &Document) -> u32 {
    document
        .get_element_by_id("toast-root")
        .map(|root| root.children().length())
        .unwrap_or(0)
}

#[wasm_bindgen_test]
async fn newer_toast_replaces_older_one() {
    let document = document();
    let notifier = Notifier::new(&document);

    notifier.notify("x", ToastKind::Error, 100).unwrap();
    notifier.notify("y", ToastKind::Success, 100).unwrap();
    TimeoutFuture::new(150).await;

    assert_eq!(toast_count(&document), 1);
    let root = document.get_element_by_id("toast-root").unwrap();
    let text = root.first_element_child().unwrap().text_content().unwrap();
    assert_eq!(text, "y");

    notifier.dismiss();
    assert_eq!(toast_count(&document), 0);
}

#[wasm_bindgen_test]
async fn toast_is_removed_after_fade() {
    let document = document();
    let notifier = Notifier::new(&document);

    notifier.notify("fading", ToastKind::Info, 100).unwrap();
    assert_eq!(toast_count(&document), 1);

    // display duration (100) + fade (300) + slack
    TimeoutFuture::new(550).await;
    assert_eq!(toast_count(&document), 0);
}

fn build_tab_fixture(document: &Document) -> web_sys::Element {
    let fixture = document.create_element("div").unwrap();
    fixture.set_id("tab-fixture");
    fixture.set_inner_html(
        "<button class=\"tab-btn active\" data-tab=\"general\">General</button>\
         <button class=\"tab-btn\" data-tab=\"advanced\">Advanced</button>\
         <div id=\"general-tab\" class=\"tab-content active\"></div>\
         <div id=\"advanced-tab\" class=\"tab-content\"></div>",
    );
    document.body().unwrap().append_child(&fixture).unwrap();
    fixture
}

#[wasm_bindgen_test]
fn activate_switches_trigger_and_region_together() {
    let document = document();
    let fixture = build_tab_fixture(&document);
    let window = web_sys::window().unwrap();

    let tabs = TabController::init(&window, &document).unwrap();
    tabs.activate("advanced").unwrap();

    let advanced_btn = document
        .query_selector(".tab-btn[data-tab=\"advanced\"]")
        .unwrap()
        .unwrap();
    assert!(advanced_btn.class_list().contains("active"));
    let advanced_region = document.get_element_by_id("advanced-tab").unwrap();
    assert!(advanced_region.class_list().contains("active"));

    let general_btn = document
        .query_selector(".tab-btn[data-tab=\"general\"]")
        .unwrap()
        .unwrap();
    assert!(!general_btn.class_list().contains("active"));

    fixture.remove();
}

#[wasm_bindgen_test]
fn unknown_tab_deactivates_without_activating() {
    let document = document();
    let fixture = build_tab_fixture(&document);
    let window = web_sys::window().unwrap();

    let tabs = TabController::init(&window, &document).unwrap();
    tabs.activate("does-not-exist").unwrap();

    assert!(document
        .query_selector(".tab-btn.active")
        .unwrap()
        .is_none());
    assert!(document
        .query_selector(".tab-content.active")
        .unwrap()
        .is_none());

    fixture.remove();
}

#[wasm_bindgen_test]
async fn debounced_burst_collapses_to_one_call() {
    let debouncer = Debouncer::new(50);
    let calls = Rc::new(Cell::new(0u32));

    for _ in 0..5 {
        let calls = calls.clone();
        debouncer.call(move || calls.set(calls.get() + 1));
    }
    TimeoutFuture::new(200).await;
    assert_eq!(calls.get(), 1);

    // A fresh trigger after the quiet period fires again.
    {
        let calls = calls.clone();
        debouncer.call(move || calls.set(calls.get() + 1));
    }
    TimeoutFuture::new(200).await;
    assert_eq!(calls.get(), 2);
}

fn fresh_logger() -> Rc<DebugLogger> {
    let api = Rc::new(ApiClient::new(ApiConfig::default()));
    Rc::new(DebugLogger::new(api, &web_sys::window().unwrap()))
}

fn clear_debug_preference() {
    let storage = web_sys::window().unwrap().local_storage().unwrap().unwrap();
    storage.remove_item(DEBUG_STORAGE_KEY).unwrap();
}

#[wasm_bindgen_test]
fn enablement_persists_but_buffer_does_not() {
    clear_debug_preference();

    let logger = fresh_logger();
    assert!(!logger.enabled());
    logger.log("ignored while disabled", serde_json::json!({}));
    assert_eq!(logger.entry_count(), 0);

    logger.set_enabled(true);
    logger.log("first", serde_json::json!({}));
    logger.log("second", serde_json::json!({}));
    assert_eq!(logger.entry_count(), 2);

    // "Reload": a new logger picks up the persisted flag, not the buffer.
    let reloaded = fresh_logger();
    assert!(reloaded.enabled());
    assert_eq!(reloaded.entry_count(), 0);

    // Disabling clears the persisted preference.
    reloaded.set_enabled(false);
    let after_disable = fresh_logger();
    assert!(!after_disable.enabled());

    clear_debug_preference();
}

#[wasm_bindgen_test]
fn log_error_hands_back_the_original_error() {
    clear_debug_preference();
    let logger = fresh_logger();

    // Disabled: pure pass-through, nothing recorded.
    let err = JsValue::from_str("boom");
    let returned = logger.log_error(err.clone());
    assert_eq!(returned.as_string().as_deref(), Some("boom"));
    assert_eq!(logger.entry_count(), 0);

    // Enabled: recorded, still returned unchanged.
    logger.set_enabled(true);
    let returned = logger.log_error(err);
    assert_eq!(returned.as_string().as_deref(), Some("boom"));
    assert_eq!(logger.entry_count(), 1);

    logger.set_enabled(false);
    clear_debug_preference();
}
