// One module per UI feature.  Every panel exposes an `init` that wires
// itself only when the current page renders its container, since a single
// bundle serves all of the admin pages.
pub mod ai_config_panel;
pub mod analysis_panel;
pub mod analysis_types_panel;
pub mod groups_panel;
pub mod sentiment_panel;
pub mod summary_panel;
