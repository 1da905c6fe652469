//! dom_utils.rs – thin helper layer for repetitive DOM operations.
//!
//! Small ergonomic wrappers for the show / hide / read-a-form-field patterns
//! the panels repeat, so the rest of the code base isn't sprinkled with
//! `dyn_into` chains and `set_attribute("style", …)` calls.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement,
              HtmlTextAreaElement};

use crate::utils::escape_html;

/// Remove the `hidden` class so the element becomes visible.
pub fn show(el: &Element) {
    let _ = el.class_list().remove_1("hidden");
    let _ = el.class_list().add_1("visible");
}

/// Hide the element by toggling CSS classes.
pub fn hide(el: &Element) {
    let _ = el.class_list().remove_1("visible");
    let _ = el.class_list().add_1("hidden");
}

/// Read the value of an `<input>` by id.  `None` when the element is missing,
/// of a different type, or holds an empty string.
pub fn input_value(document: &Document, id: &str) -> Option<String> {
    let value = document
        .get_element_by_id(id)?
        .dyn_into::<HtmlInputElement>()
        .ok()?
        .value();
    non_empty(value)
}

/// Read the value of a `<select>` by id.  Empty selection maps to `None`.
pub fn select_value(document: &Document, id: &str) -> Option<String> {
    let value = document
        .get_element_by_id(id)?
        .dyn_into::<HtmlSelectElement>()
        .ok()?
        .value();
    non_empty(value)
}

/// Read a `<textarea>` value by id ("" when missing – textarea content is
/// free-form, an empty string is a legitimate value).
pub fn textarea_value(document: &Document, id: &str) -> String {
    document
        .get_element_by_id(id)
        .and_then(|e| e.dyn_into::<HtmlTextAreaElement>().ok())
        .map(|t| t.value())
        .unwrap_or_default()
}

/// Checkbox state by id; missing elements read as unchecked.
pub fn checkbox_checked(document: &Document, id: &str) -> bool {
    document
        .get_element_by_id(id)
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        .map(|i| i.checked())
        .unwrap_or(false)
}

pub fn set_input_value(document: &Document, id: &str, value: &str) {
    if let Some(input) = document
        .get_element_by_id(id)
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_value(value);
    }
}

pub fn set_select_value(document: &Document, id: &str, value: &str) {
    if let Some(select) = document
        .get_element_by_id(id)
        .and_then(|e| e.dyn_into::<HtmlSelectElement>().ok())
    {
        select.set_value(value);
    }
}

pub fn set_textarea_value(document: &Document, id: &str, value: &str) {
    if let Some(area) = document
        .get_element_by_id(id)
        .and_then(|e| e.dyn_into::<HtmlTextAreaElement>().ok())
    {
        area.set_value(value);
    }
}

pub fn set_checkbox_checked(document: &Document, id: &str, checked: bool) {
    if let Some(input) = document
        .get_element_by_id(id)
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_checked(checked);
    }
}

/// Swap a button into (or out of) its loading state.  The original label is
/// stashed in a `data-original-text` attribute so a later restore call does
/// not need to know it.
pub fn set_button_loading(btn: &HtmlElement, loading: bool, label: Option<&str>) {
    if loading {
        if btn.get_attribute("data-original-text").is_none() {
            let _ = btn.set_attribute("data-original-text", &btn.inner_text());
        }
        let _ = btn.set_attribute("disabled", "disabled");
        btn.set_inner_text(label.unwrap_or("Working…"));
    } else {
        if let Some(original) = btn.get_attribute("data-original-text") {
            btn.set_inner_text(&original);
            let _ = btn.remove_attribute("data-original-text");
        }
        let _ = btn.remove_attribute("disabled");
    }
}

/// Render an inline error into a panel's result region.  The message is
/// escaped – server error strings are interpolated here.
pub fn render_error(region: &Element, message: &str) {
    region.set_inner_html(&format!(
        "<div class=\"error\">{}</div>",
        escape_html(message)
    ));
}

/// Render a transient "working…" placeholder into a result region.
pub fn render_loading(region: &Element, message: &str) {
    region.set_inner_html(&format!(
        "<div class=\"loading\">{}</div>",
        escape_html(message)
    ));
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
