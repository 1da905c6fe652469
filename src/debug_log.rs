//! Opt-in diagnostic event logger.
//!
//! Keeps a bounded in-memory ring of [`LogEntry`] records and, on request,
//! snapshots them into a report that is delivered fire-and-forget to the
//! server's `/debug_log` collector.  The facility is off unless the session
//! was started with `?debug=1` or a persisted preference re-enables it; the
//! buffer itself never survives a reload, only the enablement flag does.
//!
//! The logger is an explicitly constructed service with an `init`/`teardown`
//! lifecycle.  `init` registers page-lifecycle listeners that append entries
//! and nothing else; diagnostics must never alter application behaviour, and
//! a delivery failure is only ever reported to the console.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{console, Document, ErrorEvent, Event, EventTarget, Window};

use crate::constants::{DEBUG_QUERY_PARAM, DEBUG_STORAGE_KEY, LOG_BUFFER_CAPACITY};
use crate::network::ApiClient;
use crate::utils::{iso_now, now_ms, query_param};

/// One diagnostic event.  Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub message: String,
    pub data: serde_json::Value,
    pub url: String,
    pub user_agent: String,
    pub page: String,
}

/// Bounded FIFO of log entries.  Pure so it can be exercised natively.
#[derive(Debug)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest once the buffer is full.
    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clone the buffered entries oldest-first.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }
}

struct ListenerHandle {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// The logging service.  Constructed once at startup and shared by `Rc`;
/// enablement is decided in [`DebugLogger::new`] and not reevaluated until
/// the next page load.
pub struct DebugLogger {
    window: Window,
    api: Rc<ApiClient>,
    enabled: Cell<bool>,
    buffer: RefCell<LogBuffer>,
    page: String,
    started_ms: u64,
    listeners: RefCell<Vec<ListenerHandle>>,
}

impl DebugLogger {
    /// Decide enablement from the URL (`?debug=1`) or the persisted
    /// preference.  Enabling via the URL also persists the preference, so the
    /// flag survives navigation within the admin pages.
    pub fn new(api: Rc<ApiClient>, window: &Window) -> Self {
        let location = window.location();
        let page = location.pathname().unwrap_or_default();

        let logger = Self {
            window: window.clone(),
            api,
            enabled: Cell::new(false),
            buffer: RefCell::new(LogBuffer::new(LOG_BUFFER_CAPACITY)),
            page,
            started_ms: now_ms(),
            listeners: RefCell::new(Vec::new()),
        };

        let url_flag = location
            .search()
            .ok()
            .and_then(|s| query_param(&s, DEBUG_QUERY_PARAM))
            .map(|v| v == "1")
            .unwrap_or(false);
        if url_flag {
            logger.set_enabled(true);
        } else if logger.persisted_flag() {
            logger.enabled.set(true);
        }
        logger
    }

    pub fn enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn entry_count(&self) -> usize {
        self.buffer.borrow().len()
    }

    /// Register the page-lifecycle listeners (unload, visibility, uncaught
    /// errors).  They only append entries.  No-op while disabled.
    pub fn init(self: &Rc<Self>, document: &Document) -> Result<(), JsValue> {
        if !self.enabled.get() {
            return Ok(());
        }

        let window_target: &EventTarget = self.window.as_ref();
        let document_target: &EventTarget = document.as_ref();

        {
            let weak = Rc::downgrade(self);
            self.add_listener(window_target, "beforeunload", move |_| {
                if let Some(logger) = weak.upgrade() {
                    logger.log("page unload", serde_json::json!({}));
                }
            })?;
        }
        {
            let weak = Rc::downgrade(self);
            let doc = document.clone();
            self.add_listener(document_target, "visibilitychange", move |_| {
                if let Some(logger) = weak.upgrade() {
                    let state = format!("{:?}", doc.visibility_state());
                    logger.log(
                        "visibility changed",
                        serde_json::json!({ "state": state }),
                    );
                }
            })?;
        }
        {
            let weak = Rc::downgrade(self);
            self.add_listener(window_target, "error", move |event| {
                let Some(logger) = weak.upgrade() else { return };
                let data = match event.dyn_ref::<ErrorEvent>() {
                    Some(err) => serde_json::json!({
                        "error": err.message(),
                        "source": err.filename(),
                        "line": err.lineno(),
                    }),
                    None => serde_json::json!({ "error": "unknown" }),
                };
                logger.log("uncaught error", data);
            })?;
        }
        Ok(())
    }

    /// Unregister every listener added by [`DebugLogger::init`].
    pub fn teardown(&self) {
        for handle in self.listeners.borrow_mut().drain(..) {
            let _ = handle.target.remove_event_listener_with_callback(
                handle.event,
                handle.closure.as_ref().unchecked_ref(),
            );
        }
    }

    /// Record a diagnostic event.  No-op while the facility is disabled.
    pub fn log(&self, message: &str, data: serde_json::Value) {
        if !self.enabled.get() {
            return;
        }
        let entry = LogEntry {
            timestamp: iso_now(),
            message: message.to_string(),
            data,
            url: self.window.location().href().unwrap_or_default(),
            user_agent: self
                .window
                .navigator()
                .user_agent()
                .unwrap_or_default(),
            page: self.page.clone(),
        };
        self.buffer.borrow_mut().push(entry);
    }

    /// Toggle the facility.  Enabling persists the preference so it survives
    /// a reload; disabling removes it entirely.
    pub fn set_enabled(&self, flag: bool) {
        self.enabled.set(flag);
        let Ok(Some(storage)) = self.window.local_storage() else {
            return;
        };
        if flag {
            let _ = storage.set_item(DEBUG_STORAGE_KEY, "1");
        } else {
            let _ = storage.remove_item(DEBUG_STORAGE_KEY);
        }
    }

    /// Snapshot the buffer plus page-timing and heap metrics and deliver the
    /// report fire-and-forget.  Failures surface on the console only.
    pub fn send_report(&self) {
        if !self.enabled.get() || self.buffer.borrow().is_empty() {
            return;
        }
        let report = serde_json::json!({
            "generated_at": iso_now(),
            "page": self.page,
            "session_ms": now_ms().saturating_sub(self.started_ms),
            "entries": self.buffer.borrow().snapshot(),
            "timing": self.page_timing(),
            "memory": self.memory_usage(),
        });
        let api = self.api.clone();
        spawn_local(async move {
            if let Err(err) = api.send_debug_report(&report.to_string()).await {
                console::warn_1(&format!("debug report delivery failed: {:?}", err).into());
            }
        });
    }

    /// Record an error and attempt delivery, then hand the error back
    /// unchanged so the caller can keep propagating it.  While disabled this
    /// is a pure pass-through.
    pub fn log_error(&self, err: JsValue) -> JsValue {
        if self.enabled.get() {
            // Structured JS errors cross into a serde value where possible;
            // anything else falls back to its debug rendering.
            let data = serde_wasm_bindgen::from_value::<serde_json::Value>(err.clone())
                .unwrap_or_else(|_| serde_json::Value::String(format!("{:?}", err)));
            self.log("unhandled error", serde_json::json!({ "error": data }));
            self.send_report();
        }
        err
    }

    fn persisted_flag(&self) -> bool {
        self.window
            .local_storage()
            .ok()
            .flatten()
            .and_then(|s| s.get_item(DEBUG_STORAGE_KEY).ok().flatten())
            .map(|v| v == "1")
            .unwrap_or(false)
    }

    fn page_timing(&self) -> serde_json::Value {
        let Some(performance) = self.window.performance() else {
            return serde_json::Value::Null;
        };
        let timing = performance.timing();
        let start = timing.navigation_start();
        let dcl = timing.dom_content_loaded_event_end();
        let load = timing.load_event_end();
        serde_json::json!({
            "dom_content_loaded_ms": if dcl > 0.0 { dcl - start } else { 0.0 },
            "load_ms": if load > 0.0 { load - start } else { 0.0 },
        })
    }

    /// JS heap usage where the browser exposes it (`performance.memory` is
    /// non-standard, hence the reflective access).
    fn memory_usage(&self) -> serde_json::Value {
        let Some(performance) = self.window.performance() else {
            return serde_json::Value::Null;
        };
        let Ok(memory) = js_sys::Reflect::get(performance.as_ref(), &"memory".into()) else {
            return serde_json::Value::Null;
        };
        if memory.is_undefined() || memory.is_null() {
            return serde_json::Value::Null;
        }
        let used = js_sys::Reflect::get(&memory, &"usedJSHeapSize".into())
            .ok()
            .and_then(|v| v.as_f64());
        let total = js_sys::Reflect::get(&memory, &"totalJSHeapSize".into())
            .ok()
            .and_then(|v| v.as_f64());
        serde_json::json!({
            "used_js_heap_size": used,
            "total_js_heap_size": total,
        })
    }

    fn add_listener<F>(
        &self,
        target: &EventTarget,
        event: &'static str,
        handler: F,
    ) -> Result<(), JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.listeners.borrow_mut().push(ListenerHandle {
            target: target.clone(),
            event,
            closure,
        });
        Ok(())
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(n: usize) -> LogEntry {
        LogEntry {
            timestamp: format!("2026-01-01T00:00:{:02}Z", n % 60),
            message: format!("event {}", n),
            data: serde_json::json!({ "n": n }),
            url: "/settings?tab=general".into(),
            user_agent: "test".into(),
            page: "/settings".into(),
        }
    }

    #[test]
    fn buffer_keeps_call_order_below_capacity() {
        let mut buf = LogBuffer::new(100);
        for n in 0..42 {
            buf.push(entry(n));
        }
        let messages: Vec<_> = buf.snapshot().iter().map(|e| e.message.clone()).collect();
        assert_eq!(messages.len(), 42);
        assert_eq!(messages[0], "event 0");
        assert_eq!(messages[41], "event 41");
    }

    #[test]
    fn buffer_evicts_oldest_first_at_capacity() {
        let mut buf = LogBuffer::new(100);
        for n in 0..250 {
            buf.push(entry(n));
        }
        assert_eq!(buf.len(), 100);
        let snapshot = buf.snapshot();
        assert_eq!(snapshot.first().unwrap().message, "event 150");
        assert_eq!(snapshot.last().unwrap().message, "event 249");
    }

    #[test]
    fn entries_serialize_with_expected_fields() {
        let json = serde_json::to_value(entry(7)).unwrap();
        assert_eq!(json["message"], "event 7");
        assert_eq!(json["data"]["n"], 7);
        for key in ["timestamp", "url", "user_agent", "page"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }

    proptest! {
        #[test]
        fn buffer_retains_most_recent_hundred(total in 0usize..400) {
            let mut buf = LogBuffer::new(100);
            for n in 0..total {
                buf.push(entry(n));
            }
            let snapshot = buf.snapshot();
            prop_assert_eq!(snapshot.len(), total.min(100));
            let first = total.saturating_sub(100);
            for (i, e) in snapshot.iter().enumerate() {
                prop_assert_eq!(&e.message, &format!("event {}", first + i));
            }
        }
    }
}
