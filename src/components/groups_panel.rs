//! Group monitoring toggles.  The groups page renders one
//! `.monitor-toggle` button per group, carrying the group id and the desired
//! monitoring state as data attributes; a successful toggle reloads the page
//! so the tables re-render server-side, a failure restores the button and
//! raises a toast.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlElement, MouseEvent};

use crate::components::analysis_panel::describe;
use crate::constants::FORM_DEBOUNCE_MS;
use crate::debounce::Debouncer;
use crate::debug_log::DebugLogger;
use crate::dom_utils::set_button_loading;
use crate::network::responses::StatusResponse;
use crate::network::ApiClient;
use crate::toast::Notifier;

const TOGGLE_SELECTOR: &str = ".monitor-toggle";
const ATTR_GROUP_ID: &str = "data-group-id";
const ATTR_MONITOR: &str = "data-monitor";

pub fn init(
    document: &Document,
    api: Rc<ApiClient>,
    notifier: Notifier,
    logger: Rc<DebugLogger>,
) -> Result<bool, JsValue> {
    let buttons = document.query_selector_all(TOGGLE_SELECTOR)?;
    if buttons.length() == 0 {
        return Ok(false);
    }

    // One debouncer for the whole page, matching the single debounced
    // handler the buttons share.
    let debouncer = Rc::new(Debouncer::new(FORM_DEBOUNCE_MS));

    for i in 0..buttons.length() {
        let Some(button) = buttons
            .item(i)
            .and_then(|n| n.dyn_into::<HtmlElement>().ok())
        else {
            continue;
        };
        let Some(group_id) = button.get_attribute(ATTR_GROUP_ID) else {
            continue;
        };
        let monitor = button
            .get_attribute(ATTR_MONITOR)
            .map(|v| v == "true")
            .unwrap_or(false);

        let api = api.clone();
        let notifier = notifier.clone();
        let logger = logger.clone();
        let debouncer = debouncer.clone();
        let btn_el = button.clone();
        let closure = Closure::wrap(Box::new(move |_: MouseEvent| {
            let api = api.clone();
            let notifier = notifier.clone();
            let logger = logger.clone();
            let group_id = group_id.clone();
            let btn_el = btn_el.clone();
            debouncer.call(move || {
                set_button_loading(&btn_el, true, Some("⏳ Updating…"));
                logger.log(
                    "group monitoring toggle",
                    serde_json::json!({ "group_id": group_id, "monitor": monitor }),
                );
                spawn_local(async move {
                    let outcome = api
                        .set_group_monitored(&group_id, monitor)
                        .await
                        .and_then(|text| {
                            serde_json::from_str::<StatusResponse>(&text)
                                .map_err(|e| JsValue::from_str(&e.to_string()))
                        });
                    match outcome {
                        Ok(resp) if resp.success => {
                            if let Some(window) = web_sys::window() {
                                let _ = window.location().reload();
                            }
                        }
                        Ok(resp) => {
                            notifier.error(&format!(
                                "Failed to update group monitoring: {}",
                                resp.error.as_deref().unwrap_or("unknown error")
                            ));
                            set_button_loading(&btn_el, false, None);
                        }
                        Err(err) => {
                            notifier.error(&format!("Error: {}", describe(err)));
                            set_button_loading(&btn_el, false, None);
                        }
                    }
                });
            });
        }) as Box<dyn FnMut(MouseEvent)>);
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(true)
}
