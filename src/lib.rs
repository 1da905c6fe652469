//! Browser-side glue for the Signal bot admin pages.
//!
//! One wasm bundle serves every admin page.  At startup it constructs the
//! shared services (API client, debug logger, notifier, tab controller,
//! filter source), then wires whichever panels the current page actually
//! renders – each panel checks for its container and stays dormant
//! otherwise.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

pub mod components;
pub mod constants;
pub mod debounce;
pub mod debug_log;
pub mod dom_utils;
pub mod filters;
pub mod network;
pub mod tabs;
pub mod toast;
pub mod utils;

use debug_log::DebugLogger;
use filters::FilterSource;
use network::{ApiClient, ApiConfig};
use tabs::TabController;
use toast::Notifier;

/// The application's service graph.  Everything is constructed here and
/// passed to the call sites that need it; nothing is reached through ambient
/// global state.
pub struct App {
    pub api: Rc<ApiClient>,
    pub logger: Rc<DebugLogger>,
    pub notifier: Notifier,
    pub tabs: Rc<TabController>,
    pub filters: Rc<dyn FilterSource>,
}

impl App {
    pub fn bootstrap(window: &Window, document: &Document) -> Result<Self, JsValue> {
        let api = Rc::new(ApiClient::new(ApiConfig::default()));

        let logger = Rc::new(DebugLogger::new(api.clone(), window));
        logger.init(document)?;

        let notifier = Notifier::new(document);
        let tabs = TabController::init(window, document)?;
        let filters = filters::resolve(document);

        Ok(Self {
            api,
            logger,
            notifier,
            tabs,
            filters,
        })
    }

    /// Wire whichever panels the current page hosts.
    pub fn wire_panels(&self, document: &Document) -> Result<(), JsValue> {
        let mut mounted: Vec<&str> = Vec::new();

        if components::analysis_panel::init(
            document,
            self.api.clone(),
            self.filters.clone(),
            self.logger.clone(),
        )? {
            mounted.push("ai-analysis");
        }
        if components::sentiment_panel::init(
            document,
            self.api.clone(),
            self.filters.clone(),
            self.logger.clone(),
        )? {
            mounted.push("sentiment");
        }
        if components::summary_panel::init(
            document,
            self.api.clone(),
            self.filters.clone(),
            self.logger.clone(),
        )? {
            mounted.push("summary");
        }
        if components::ai_config_panel::init(
            document,
            self.api.clone(),
            self.notifier.clone(),
            self.logger.clone(),
        )? {
            mounted.push("ai-config");
        }
        if components::groups_panel::init(
            document,
            self.api.clone(),
            self.notifier.clone(),
            self.logger.clone(),
        )? {
            mounted.push("groups");
        }
        if components::analysis_types_panel::init(
            document,
            self.api.clone(),
            self.notifier.clone(),
            self.logger.clone(),
        )? {
            mounted.push("analysis-types");
        }

        self.logger.log(
            "admin frontend initialised",
            serde_json::json!({ "panels": mounted }),
        );
        Ok(())
    }

    /// Unhook everything the services registered on the page.
    pub fn teardown(&self) {
        self.logger.teardown();
        self.notifier.dismiss();
    }
}

thread_local! {
    // Keeps the service graph alive for the lifetime of the page.
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document on window"))?;

    let app = App::bootstrap(&window, &document)?;
    if let Err(err) = app.wire_panels(&document) {
        // Recorded (when debug logging is on) and propagated unchanged.
        return Err(app.logger.log_error(err));
    }

    APP.with(|slot| *slot.borrow_mut() = Some(app));
    Ok(())
}
