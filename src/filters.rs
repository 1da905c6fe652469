//! Filter bar access.
//!
//! Some admin pages render a shared filter bar (group, sender, date, hours);
//! others have none.  Rather than probing the DOM at every call site, the
//! capability is resolved once at startup into a [`FilterSource`]: either a
//! [`DomFilterSource`] bound to the page's controls or the [`NoFilters`]
//! default.

use std::rc::Rc;

use web_sys::Document;

use crate::constants::{DATE_INPUT_ID, GROUP_FILTER_ID, HOURS_INPUT_ID, SENDER_FILTER_ID};
use crate::dom_utils;

/// Snapshot of the filter controls.  Unset controls map to `None` and are
/// simply omitted from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub group_id: Option<String>,
    pub sender_id: Option<String>,
    pub date: Option<String>,
    pub hours: Option<u32>,
}

impl FilterSet {
    /// The set as ordered query-string pairs, skipping unset filters.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(group_id) = &self.group_id {
            pairs.push(("group_id", group_id.clone()));
        }
        if let Some(sender_id) = &self.sender_id {
            pairs.push(("sender_id", sender_id.clone()));
        }
        if let Some(date) = &self.date {
            pairs.push(("date", date.clone()));
        }
        if let Some(hours) = self.hours {
            pairs.push(("hours", hours.to_string()));
        }
        pairs
    }
}

pub trait FilterSource {
    fn values(&self) -> FilterSet;
}

/// Default for pages without a filter bar.
pub struct NoFilters;

impl FilterSource for NoFilters {
    fn values(&self) -> FilterSet {
        FilterSet::default()
    }
}

/// Reads the live filter controls each time it is asked, so a request always
/// carries what the user currently sees.
pub struct DomFilterSource {
    document: Document,
}

impl DomFilterSource {
    pub fn new(document: &Document) -> Self {
        Self {
            document: document.clone(),
        }
    }
}

impl FilterSource for DomFilterSource {
    fn values(&self) -> FilterSet {
        FilterSet {
            group_id: dom_utils::select_value(&self.document, GROUP_FILTER_ID),
            sender_id: dom_utils::select_value(&self.document, SENDER_FILTER_ID),
            date: dom_utils::input_value(&self.document, DATE_INPUT_ID),
            hours: dom_utils::input_value(&self.document, HOURS_INPUT_ID)
                .and_then(|v| v.parse().ok()),
        }
    }
}

/// Resolve the page's filter capability once at startup.
pub fn resolve(document: &Document) -> Rc<dyn FilterSource> {
    let has_filter_bar = [GROUP_FILTER_ID, SENDER_FILTER_ID, DATE_INPUT_ID, HOURS_INPUT_ID]
        .iter()
        .any(|id| document.get_element_by_id(id).is_some());
    if has_filter_bar {
        Rc::new(DomFilterSource::new(document))
    } else {
        Rc::new(NoFilters)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn empty_set_yields_no_pairs() {
        assert!(FilterSet::default().query_pairs().is_empty());
    }

    #[test]
    fn pairs_keep_stable_order_and_skip_unset() {
        let set = FilterSet {
            group_id: Some("g1".into()),
            sender_id: None,
            date: Some("2026-08-05".into()),
            hours: Some(24),
        };
        assert_eq!(
            set.query_pairs(),
            vec![
                ("group_id", "g1".to_string()),
                ("date", "2026-08-05".to_string()),
                ("hours", "24".to_string()),
            ]
        );
    }
}
