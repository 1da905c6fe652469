//! AI provider configuration form: load the stored config into the form on
//! page load, then save or test-connection on demand.  Both actions are
//! debounced so double-clicks collapse into one request, and both surface
//! their outcome through the notification controller.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlElement, MouseEvent};

use crate::components::analysis_panel::describe;
use crate::constants::FORM_DEBOUNCE_MS;
use crate::debounce::Debouncer;
use crate::debug_log::DebugLogger;
use crate::dom_utils::{checkbox_checked, input_value, select_value, set_button_loading,
                       set_checkbox_checked, set_input_value, set_select_value,
                       set_textarea_value, textarea_value};
use crate::network::responses::{AiConfig, StatusResponse};
use crate::network::ApiClient;
use crate::toast::Notifier;

const SAVE_BTN_ID: &str = "save-btn";
const TEST_BTN_ID: &str = "test-btn";

pub fn init(
    document: &Document,
    api: Rc<ApiClient>,
    notifier: Notifier,
    logger: Rc<DebugLogger>,
) -> Result<bool, JsValue> {
    let Some(save_btn) = document.get_element_by_id(SAVE_BTN_ID) else {
        return Ok(false);
    };

    load_config(document, api.clone(), notifier.clone());

    // Save – debounced so a double-click produces one POST.
    {
        let debouncer = Rc::new(Debouncer::new(FORM_DEBOUNCE_MS));
        let document = document.clone();
        let api = api.clone();
        let notifier = notifier.clone();
        let logger = logger.clone();
        let btn_el: HtmlElement = save_btn.clone().unchecked_into();
        let closure = Closure::wrap(Box::new(move |_: MouseEvent| {
            let document = document.clone();
            let api = api.clone();
            let notifier = notifier.clone();
            let logger = logger.clone();
            let btn_el = btn_el.clone();
            debouncer.call(move || {
                set_button_loading(&btn_el, true, Some("⏳ Saving…"));
                let config = collect_config(&document);
                logger.log(
                    "ai config save requested",
                    serde_json::json!({ "provider": config.provider }),
                );
                spawn_local(async move {
                    let outcome = api.save_ai_config(&config).await.and_then(|text| {
                        serde_json::from_str::<StatusResponse>(&text)
                            .map_err(|e| JsValue::from_str(&e.to_string()))
                    });
                    match outcome {
                        Ok(resp) if resp.success => {
                            notifier.success("Configuration saved successfully!")
                        }
                        Ok(resp) => notifier.error(&format!(
                            "Error saving configuration: {}",
                            resp.error.as_deref().unwrap_or("unknown error")
                        )),
                        Err(err) => notifier
                            .error(&format!("Error saving configuration: {}", describe(err))),
                    }
                    set_button_loading(&btn_el, false, None);
                });
            });
        }) as Box<dyn FnMut(MouseEvent)>);
        save_btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Test connection – its own debouncer, same quiet period.
    if let Some(test_btn) = document.get_element_by_id(TEST_BTN_ID) {
        let debouncer = Rc::new(Debouncer::new(FORM_DEBOUNCE_MS));
        let btn_el: HtmlElement = test_btn.clone().unchecked_into();
        let closure = Closure::wrap(Box::new(move |_: MouseEvent| {
            let api = api.clone();
            let notifier = notifier.clone();
            let logger = logger.clone();
            let btn_el = btn_el.clone();
            debouncer.call(move || {
                set_button_loading(&btn_el, true, Some("⏳ Testing…"));
                logger.log("ai connection test requested", serde_json::json!({}));
                spawn_local(async move {
                    let outcome = api.test_ai_connection().await.and_then(|text| {
                        serde_json::from_str::<StatusResponse>(&text)
                            .map_err(|e| JsValue::from_str(&e.to_string()))
                    });
                    match outcome {
                        Ok(resp) if resp.success => {
                            notifier.success("AI connection test successful!")
                        }
                        Ok(resp) => notifier.error(&format!(
                            "Connection test failed: {}",
                            resp.error.as_deref().unwrap_or("unknown error")
                        )),
                        Err(err) => {
                            notifier.error(&format!("Connection test failed: {}", describe(err)))
                        }
                    }
                    set_button_loading(&btn_el, false, None);
                });
            });
        }) as Box<dyn FnMut(MouseEvent)>);
        test_btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(true)
}

fn load_config(document: &Document, api: Rc<ApiClient>, notifier: Notifier) {
    let document = document.clone();
    spawn_local(async move {
        let outcome = api.load_ai_config().await.and_then(|text| {
            serde_json::from_str::<AiConfig>(&text)
                .map_err(|e| JsValue::from_str(&e.to_string()))
        });
        match outcome {
            Ok(config) => populate_form(&document, &config),
            Err(_) => notifier.error("Error loading configuration"),
        }
    });
}

fn populate_form(document: &Document, config: &AiConfig) {
    set_select_value(document, "provider", &config.provider);
    set_select_value(document, "model", &config.model);
    set_input_value(document, "api-key", &config.api_key);
    set_input_value(document, "temperature", &config.temperature.to_string());
    set_input_value(document, "max-tokens", &config.max_tokens.to_string());
    set_textarea_value(document, "system-prompt", &config.system_prompt);
    set_checkbox_checked(document, "sentiment-enabled", config.sentiment_enabled);
    set_checkbox_checked(document, "summary-enabled", config.summary_enabled);
    set_checkbox_checked(document, "auto-reactions", config.auto_reactions_enabled);
}

fn collect_config(document: &Document) -> AiConfig {
    AiConfig {
        provider: select_value(document, "provider").unwrap_or_default(),
        model: select_value(document, "model").unwrap_or_default(),
        api_key: input_value(document, "api-key").unwrap_or_default(),
        temperature: input_value(document, "temperature")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.7),
        max_tokens: input_value(document, "max-tokens")
            .and_then(|v| v.parse().ok())
            .unwrap_or(150),
        system_prompt: textarea_value(document, "system-prompt"),
        sentiment_enabled: checkbox_checked(document, "sentiment-enabled"),
        summary_enabled: checkbox_checked(document, "summary-enabled"),
        auto_reactions_enabled: checkbox_checked(document, "auto-reactions"),
    }
}
