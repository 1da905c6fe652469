//! Shared constants and default values for the admin frontend.

/// Most-recent entries the debug logger keeps in memory.  Oldest entries are
/// evicted first once this many are buffered; the buffer itself is never
/// persisted across reloads.
pub const LOG_BUFFER_CAPACITY: usize = 100;

/// localStorage key holding the debug-logging opt-in.  Present (value "1")
/// while the facility is enabled, removed entirely when it is disabled.
pub const DEBUG_STORAGE_KEY: &str = "signal_debug_logging";

/// Query parameter that switches debug logging on for the session
/// (`?debug=1`).
pub const DEBUG_QUERY_PARAM: &str = "debug";

/// Query parameter carrying the active tab id so tab state survives
/// reloads and back/forward navigation.
pub const TAB_QUERY_PARAM: &str = "tab";

/// How long a toast stays fully visible before it starts fading.
pub const DEFAULT_TOAST_DURATION_MS: u32 = 3_000;

/// Length of the fade-out transition between "start hiding" and removal
/// from the DOM.
pub const TOAST_FADE_MS: u32 = 300;

/// Quiet period for debounced form actions (save / test / toggle buttons).
pub const FORM_DEBOUNCE_MS: u32 = 300;

/// Collector endpoint for debug reports.  Not under `/api` – the server
/// treats it as a best-effort sink, not a real API.
pub const DEBUG_LOG_ENDPOINT: &str = "/debug_log";

// ---------------------------------------------------------------------------
// Shared CSS hooks.  The server templates render tab triggers / content
// regions with these classes; the toast container is created on demand.
// ---------------------------------------------------------------------------

pub const TOAST_ROOT_ID: &str = "toast-root";
pub const CSS_ACTIVE: &str = "active";
pub const CSS_TAB_TRIGGER: &str = "tab-btn";
pub const CSS_TAB_CONTENT: &str = "tab-content";

/// Attribute on a tab trigger naming the tab it selects.  The matching
/// content region has the id `<tab>-tab`.
pub const ATTR_TAB_TARGET: &str = "data-tab";

// ---------------------------------------------------------------------------
// Element ids of the shared filter bar.  Pages that render the bar use these
// ids; pages without one simply resolve to the no-op filter source.
// ---------------------------------------------------------------------------

pub const GROUP_FILTER_ID: &str = "group-filter";
pub const SENDER_FILTER_ID: &str = "sender-filter";
pub const DATE_INPUT_ID: &str = "date-input";
pub const HOURS_INPUT_ID: &str = "hours-input";
