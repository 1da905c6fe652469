//! Toast / notification controller.
//!
//! Renders a single transient toast anchored top-right and auto-dismisses it
//! in two phases: an opacity/transform fade after the display duration, then
//! DOM removal once the transition has played out.  Showing a new toast
//! replaces the previous one immediately; the replaced toast's pending timers
//! are dropped (gloo `Timeout` cancels on drop) and a generation counter
//! guards against a stale timer acting on its successor.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use crate::constants::{DEFAULT_TOAST_DURATION_MS, TOAST_FADE_MS, TOAST_ROOT_ID};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    fn css_suffix(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
            ToastKind::Info => "info",
        }
    }
}

struct ActiveToast {
    el: HtmlElement,
    // Held so that replacing the toast cancels whatever phase was pending.
    _fade: Timeout,
    remove: Option<Timeout>,
}

struct ToastSlot {
    generation: u64,
    current: Option<ActiveToast>,
}

/// Explicitly constructed notification service.  Clones share the same slot,
/// so any clone handed to an event closure replaces the same single toast.
#[derive(Clone)]
pub struct Notifier {
    document: Document,
    slot: Rc<RefCell<ToastSlot>>,
}

impl Notifier {
    pub fn new(document: &Document) -> Self {
        Self {
            document: document.clone(),
            slot: Rc::new(RefCell::new(ToastSlot {
                generation: 0,
                current: None,
            })),
        }
    }

    pub fn success(&self, message: &str) {
        let _ = self.notify(message, ToastKind::Success, DEFAULT_TOAST_DURATION_MS);
    }

    pub fn error(&self, message: &str) {
        let _ = self.notify(message, ToastKind::Error, DEFAULT_TOAST_DURATION_MS);
    }

    pub fn warning(&self, message: &str) {
        let _ = self.notify(message, ToastKind::Warning, DEFAULT_TOAST_DURATION_MS);
    }

    pub fn info(&self, message: &str) {
        let _ = self.notify(message, ToastKind::Info, DEFAULT_TOAST_DURATION_MS);
    }

    /// Show a toast, replacing whichever one is currently visible.
    pub fn notify(&self, message: &str, kind: ToastKind, duration_ms: u32) -> Result<(), JsValue> {
        ensure_styles(&self.document)?;
        let root = ensure_root(&self.document)?;

        let mut slot = self.slot.borrow_mut();
        slot.generation += 1;
        let generation = slot.generation;

        // Replacing drops the previous toast's timers with its handle struct.
        if let Some(previous) = slot.current.take() {
            previous.el.remove();
        }

        let toast = self.document.create_element("div")?;
        toast.set_class_name(&format!("toast toast-{}", kind.css_suffix()));
        toast.set_text_content(Some(message));
        root.append_child(&toast)?;
        let el: HtmlElement = toast.unchecked_into();

        let fade_slot = self.slot.clone();
        let fade = Timeout::new(duration_ms, move || {
            let mut slot = fade_slot.borrow_mut();
            if slot.generation != generation {
                return;
            }
            let Some(active) = slot.current.as_mut() else {
                return;
            };
            let style = active.el.style();
            let _ = style.set_property("opacity", "0");
            let _ = style.set_property("transform", "translateX(100%)");

            let remove_slot = fade_slot.clone();
            let remove = Timeout::new(TOAST_FADE_MS, move || {
                let mut slot = remove_slot.borrow_mut();
                if slot.generation != generation {
                    return;
                }
                if let Some(active) = slot.current.take() {
                    active.el.remove();
                }
            });
            active.remove = Some(remove);
        });

        slot.current = Some(ActiveToast {
            el,
            _fade: fade,
            remove: None,
        });
        Ok(())
    }

    /// Drop the current toast (and its timers) without waiting for the fade.
    pub fn dismiss(&self) {
        let mut slot = self.slot.borrow_mut();
        slot.generation += 1;
        if let Some(active) = slot.current.take() {
            active.el.remove();
        }
    }
}

fn ensure_root(document: &Document) -> Result<Element, JsValue> {
    if let Some(el) = document.get_element_by_id(TOAST_ROOT_ID) {
        return Ok(el);
    }
    let root = document.create_element("div")?;
    root.set_id(TOAST_ROOT_ID);
    root.set_class_name("toast-root");
    document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?
        .append_child(&root)?;
    Ok(root)
}

fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.get_element_by_id("toast-styles").is_some() {
        return Ok(());
    }

    let css = "
.toast-root{position:fixed;top:20px;right:20px;z-index:9999;font-family:Arial,Helvetica,sans-serif}
.toast{min-width:250px;padding:12px 20px;border-radius:4px;color:#fff;box-shadow:0 2px 5px rgba(0,0,0,.2);opacity:1;transform:translateX(0);transition:opacity .3s ease,transform .3s ease}
.toast-success{background:#16a34a}
.toast-error{background:#dc2626}
.toast-warning{background:#d97706}
.toast-info{background:#2563eb}
.loading{color:#666;font-style:italic}
.error{color:#dc2626}
";

    let style = document.create_element("style")?;
    style.set_id("toast-styles");
    style.set_text_content(Some(css));
    if let Some(head) = document.query_selector("head")? {
        head.append_child(&style)?;
    } else if let Some(body) = document.body() {
        body.append_child(&style)?;
    }
    Ok(())
}
