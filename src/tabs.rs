//! Tab controller.
//!
//! The server renders tab triggers (`.tab-btn[data-tab]`) and content regions
//! (`#<tab>-tab.tab-content`); exactly one pair carries the `active` class.
//! The active tab id is mirrored in the `?tab=` query parameter, so state
//! survives reloads, and back/forward navigation re-derives it from the URL
//! at that history entry instead of reloading the page.
//!
//! Tab changes triggered elsewhere in the app navigate (updating the URL)
//! rather than calling `activate` directly, which keeps the URL and the
//! visible tab in agreement.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, PopStateEvent, Window};

use crate::constants::{ATTR_TAB_TARGET, CSS_ACTIVE, CSS_TAB_CONTENT, CSS_TAB_TRIGGER,
                       TAB_QUERY_PARAM};
use crate::utils::query_param;

pub struct TabController {
    document: Document,
}

impl TabController {
    /// Apply the tab encoded in the current URL and keep following the URL on
    /// `popstate`.  The returned controller can also be driven directly via
    /// [`TabController::activate`].
    pub fn init(window: &Window, document: &Document) -> Result<Rc<Self>, JsValue> {
        let controller = Rc::new(Self {
            document: document.clone(),
        });
        controller.apply_from_url(window)?;

        let on_popstate = controller.clone();
        let popstate_window = window.clone();
        let closure = Closure::wrap(Box::new(move |_: PopStateEvent| {
            let _ = on_popstate.apply_from_url(&popstate_window);
        }) as Box<dyn FnMut(PopStateEvent)>);
        window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())?;
        closure.forget();

        Ok(controller)
    }

    /// Activate `tab_id`: every trigger and content region is deactivated,
    /// then the pair matching `tab_id` is activated if it exists.  An unknown
    /// id deactivates the previous tab without activating a new one; callers
    /// treat that as a no-op, not an error.
    pub fn activate(&self, tab_id: &str) -> Result<(), JsValue> {
        let triggers = self
            .document
            .query_selector_all(&format!(".{}", CSS_TAB_TRIGGER))?;
        for i in 0..triggers.length() {
            if let Some(el) = triggers.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                let _ = el.class_list().remove_1(CSS_ACTIVE);
            }
        }
        let regions = self
            .document
            .query_selector_all(&format!(".{}", CSS_TAB_CONTENT))?;
        for i in 0..regions.length() {
            if let Some(el) = regions.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                let _ = el.class_list().remove_1(CSS_ACTIVE);
            }
        }

        if let Some(trigger) = self.document.query_selector(&format!(
            ".{}[{}=\"{}\"]",
            CSS_TAB_TRIGGER, ATTR_TAB_TARGET, tab_id
        ))? {
            trigger.class_list().add_1(CSS_ACTIVE)?;
        }
        if let Some(region) = self.document.get_element_by_id(&format!("{}-tab", tab_id)) {
            region.class_list().add_1(CSS_ACTIVE)?;
        }
        Ok(())
    }

    /// Re-derive the active tab from the window's current URL.  Without a
    /// `?tab=` parameter the first rendered trigger wins.
    pub fn apply_from_url(&self, window: &Window) -> Result<(), JsValue> {
        let search = window.location().search()?;
        let tab_id = match query_param(&search, TAB_QUERY_PARAM) {
            Some(id) => Some(id),
            None => self.default_tab()?,
        };
        if let Some(id) = tab_id {
            self.activate(&id)?;
        }
        Ok(())
    }

    fn default_tab(&self) -> Result<Option<String>, JsValue> {
        Ok(self
            .document
            .query_selector(&format!(".{}", CSS_TAB_TRIGGER))?
            .and_then(|el| el.get_attribute(ATTR_TAB_TARGET)))
    }
}
