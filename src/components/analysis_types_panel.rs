//! Analysis-type management on the settings page: list the configured
//! analysis types as cards, toggle one active/inactive, or delete a custom
//! one (built-ins can only be toggled).  The list re-fetches after every
//! successful mutation.
//!
//! The cards are rebuilt from scratch on each load, so their buttons are
//! handled through one delegated click listener on the container instead of
//! re-wiring per card.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, MouseEvent};

use crate::components::analysis_panel::describe;
use crate::debug_log::DebugLogger;
use crate::dom_utils::render_loading;
use crate::network::responses::{AnalysisType, AnalysisTypesResponse, StatusResponse};
use crate::network::ApiClient;
use crate::toast::Notifier;
use crate::utils::escape_html;

const LIST_ID: &str = "analysis-types-list";

struct Panel {
    container: Element,
    api: Rc<ApiClient>,
    notifier: Notifier,
    logger: Rc<DebugLogger>,
}

pub fn init(
    document: &Document,
    api: Rc<ApiClient>,
    notifier: Notifier,
    logger: Rc<DebugLogger>,
) -> Result<bool, JsValue> {
    let Some(container) = document.get_element_by_id(LIST_ID) else {
        return Ok(false);
    };

    let panel = Rc::new(Panel {
        container: container.clone(),
        api,
        notifier,
        logger,
    });

    // Delegated handler: cards are re-rendered wholesale, the listener on
    // the container survives every re-render.
    {
        let panel = panel.clone();
        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            let Some(target) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
            else {
                return;
            };
            let Ok(Some(button)) = target.closest("[data-action]") else {
                return;
            };
            let Some(action) = button.get_attribute("data-action") else {
                return;
            };
            let Some(id) = button
                .get_attribute("data-type-id")
                .and_then(|v| v.parse::<u64>().ok())
            else {
                return;
            };
            match action.as_str() {
                "toggle" => toggle_type(panel.clone(), id),
                "delete" => delete_type(panel.clone(), id),
                _ => {}
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        container.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    load(panel);
    Ok(true)
}

fn load(panel: Rc<Panel>) {
    render_loading(&panel.container, "Loading analysis types…");
    spawn_local(async move {
        let outcome = panel.api.analysis_types().await.and_then(|text| {
            serde_json::from_str::<AnalysisTypesResponse>(&text)
                .map_err(|e| JsValue::from_str(&e.to_string()))
        });
        match outcome {
            Ok(resp) if resp.success => {
                panel.logger.log(
                    "analysis types loaded",
                    serde_json::json!({ "count": resp.types.len() }),
                );
                render_list(&panel.container, &resp.types);
            }
            Ok(resp) => panel.container.set_inner_html(&format!(
                "<div class=\"error\">Error loading analysis types: {}</div>",
                escape_html(resp.error.as_deref().unwrap_or("unknown error"))
            )),
            Err(err) => panel.container.set_inner_html(&format!(
                "<div class=\"error\">Error: {}</div>",
                escape_html(&describe(err))
            )),
        }
    });
}

fn toggle_type(panel: Rc<Panel>, id: u64) {
    spawn_local(async move {
        let outcome = panel.api.toggle_analysis_type(id).await.and_then(|text| {
            serde_json::from_str::<StatusResponse>(&text)
                .map_err(|e| JsValue::from_str(&e.to_string()))
        });
        match outcome {
            Ok(resp) if resp.success => load(panel.clone()),
            Ok(resp) => panel.notifier.error(&format!(
                "Error toggling analysis type: {}",
                resp.error.as_deref().unwrap_or("unknown error")
            )),
            Err(err) => panel.notifier.error(&format!("Error: {}", describe(err))),
        }
    });
}

fn delete_type(panel: Rc<Panel>, id: u64) {
    let confirmed = web_sys::window()
        .and_then(|w| {
            w.confirm_with_message("Are you sure you want to delete this analysis type?")
                .ok()
        })
        .unwrap_or(false);
    if !confirmed {
        return;
    }
    spawn_local(async move {
        let outcome = panel.api.delete_analysis_type(id).await.and_then(|text| {
            serde_json::from_str::<StatusResponse>(&text)
                .map_err(|e| JsValue::from_str(&e.to_string()))
        });
        match outcome {
            Ok(resp) if resp.success => load(panel.clone()),
            Ok(resp) => panel.notifier.error(&format!(
                "Error deleting analysis type: {}",
                resp.error.as_deref().unwrap_or("unknown error")
            )),
            Err(err) => panel.notifier.error(&format!("Error: {}", describe(err))),
        }
    });
}

fn render_list(container: &Element, types: &[AnalysisType]) {
    if types.is_empty() {
        container.set_inner_html("<div class=\"empty-state\">No analysis types configured</div>");
        return;
    }

    let mut html = String::from("<div class=\"analysis-types\">");
    for t in types {
        html.push_str(&render_card(t));
    }
    html.push_str("</div>");
    container.set_inner_html(&html);
}

fn render_card(t: &AnalysisType) -> String {
    let icon = t.icon.as_deref().unwrap_or("🤖");
    let builtin_badge = if t.is_builtin() {
        "<span class=\"badge badge-builtin\">Built-in</span>"
    } else {
        ""
    };
    let toggle_label = if t.is_active() { "Active" } else { "Inactive" };
    let toggle_class = if t.is_active() {
        "btn-success"
    } else {
        "btn-secondary"
    };
    // Custom types can be deleted; built-ins only toggled.
    let delete_button = if t.is_builtin() {
        String::new()
    } else {
        format!(
            "<button class=\"btn btn-sm btn-danger\" data-action=\"delete\" data-type-id=\"{}\">Delete</button>",
            t.id
        )
    };
    let mut requirements = String::new();
    if t.requires_group {
        requirements.push_str("<span class=\"req\">Requires group</span>");
    }
    if t.requires_sender {
        requirements.push_str("<span class=\"req\">Requires sender filter</span>");
    }

    format!(
        "<div class=\"analysis-type-card\">\
           <div class=\"card-header\">\
             <h4><span class=\"icon\">{icon}</span>{name}{builtin}</h4>\
             <div class=\"card-actions\">\
               <button class=\"btn btn-sm {toggle_class}\" data-action=\"toggle\" data-type-id=\"{id}\">{toggle_label}</button>\
               {delete}\
             </div>\
           </div>\
           <p class=\"description\">{description}</p>\
           <div class=\"card-meta\">\
             <span>Min messages: {min_messages}</span>\
             <span>Max hours: {max_hours}</span>\
             {requirements}\
           </div>\
         </div>",
        icon = escape_html(icon),
        name = escape_html(&t.display_name),
        builtin = builtin_badge,
        toggle_class = toggle_class,
        id = t.id,
        toggle_label = toggle_label,
        delete = delete_button,
        description = escape_html(if t.description.is_empty() {
            "No description"
        } else {
            &t.description
        }),
        min_messages = t.min_messages,
        max_hours = t.max_hours,
        requirements = requirements,
    )
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    fn custom_type() -> AnalysisType {
        serde_json::from_str(
            r#"{"id":9,"display_name":"Mood <Watch>","description":"Tracks mood",
                "is_builtin":0,"is_active":1,"min_messages":10,"max_hours":24,
                "requires_group":true,"requires_sender":false}"#,
        )
        .unwrap()
    }

    #[test]
    fn card_escapes_names_and_offers_delete_for_custom_types() {
        let html = render_card(&custom_type());
        assert!(html.contains("Mood &lt;Watch&gt;"));
        assert!(html.contains("data-action=\"delete\""));
        assert!(html.contains("data-type-id=\"9\""));
        assert!(html.contains(">Active<"));
        assert!(html.contains("Requires group"));
    }

    #[test]
    fn builtin_card_has_no_delete_button() {
        let mut t = custom_type();
        t.is_builtin = 1;
        t.is_active = 0;
        let html = render_card(&t);
        assert!(!html.contains("data-action=\"delete\""));
        assert!(html.contains("Built-in"));
        assert!(html.contains(">Inactive<"));
    }
}
