//! System filter construction.
//!
//! The console understands a small filter DSL. This client only ever builds
//! the handful of shorthand forms below and passes anything else through
//! untouched.

use std::fmt;

/// A system filter expression in the console's DSL.
///
/// Opaque to this crate: built from a [`Selector`] or taken verbatim from
/// the user, never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemFilter(String);

impl SystemFilter {
    /// Wrap a raw DSL expression.
    pub fn new(expr: impl Into<String>) -> Self {
        Self(expr.into())
    }

    /// `agent='<name>'`
    pub fn agent(name: &str) -> Self {
        Self(format!("agent='{name}'"))
    }

    /// `key='<key>'`
    pub fn instance(key: &str) -> Self {
        Self(format!("key='{key}'"))
    }

    /// `tags='<a;b>'`: entries carrying every tag.
    pub fn all_tags(tags: &str) -> Self {
        Self(format!("tags='{tags}'"))
    }

    /// `tags.hasAny('<a;b>')`: entries carrying at least one tag.
    pub fn any_tag(tags: &str) -> Self {
        Self(format!("tags.hasAny('{tags}')"))
    }

    /// The DSL expression.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SystemFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shorthand selector inputs.
///
/// The CLI only ever sets one of these; if several are set anyway, the
/// first in field order wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    /// Agent name.
    pub agent: Option<String>,
    /// Instance key (`agent:/mountPoint`).
    pub instance: Option<String>,
    /// `;`-separated tags, all required.
    pub all_tags: Option<String>,
    /// `;`-separated tags, any one required.
    pub any_tag: Option<String>,
}

impl Selector {
    /// Build the filter for this selector, or `None` when nothing is selected.
    #[must_use]
    pub fn system_filter(&self) -> Option<SystemFilter> {
        if let Some(agent) = non_empty(&self.agent) {
            Some(SystemFilter::agent(agent))
        } else if let Some(instance) = non_empty(&self.instance) {
            Some(SystemFilter::instance(instance))
        } else if let Some(tags) = non_empty(&self.all_tags) {
            Some(SystemFilter::all_tags(tags))
        } else {
            non_empty(&self.any_tag).map(SystemFilter::any_tag)
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selector_has_no_filter() {
        let selector = Selector::default();
        assert_eq!(selector.system_filter(), None);
    }

    #[test]
    fn test_agent_filter() {
        let selector = Selector {
            agent: Some("agent-1".to_string()),
            ..Default::default()
        };
        assert_eq!(selector.system_filter().unwrap().as_str(), "agent='agent-1'");
    }

    #[test]
    fn test_instance_filter() {
        let selector = Selector {
            instance: Some("agent-1:/sample/i001".to_string()),
            ..Default::default()
        };
        assert_eq!(
            selector.system_filter().unwrap().as_str(),
            "key='agent-1:/sample/i001'"
        );
    }

    #[test]
    fn test_all_tags_filter() {
        let selector = Selector {
            all_tags: Some("frontend;backend".to_string()),
            ..Default::default()
        };
        assert_eq!(
            selector.system_filter().unwrap().as_str(),
            "tags='frontend;backend'"
        );
    }

    #[test]
    fn test_any_tag_filter() {
        let selector = Selector {
            any_tag: Some("frontend;backend".to_string()),
            ..Default::default()
        };
        assert_eq!(
            selector.system_filter().unwrap().as_str(),
            "tags.hasAny('frontend;backend')"
        );
    }

    #[test]
    fn test_agent_takes_precedence() {
        let selector = Selector {
            agent: Some("a1".to_string()),
            instance: Some("i1".to_string()),
            all_tags: Some("t1".to_string()),
            any_tag: Some("t2".to_string()),
        };
        assert_eq!(selector.system_filter().unwrap().as_str(), "agent='a1'");
    }

    #[test]
    fn test_empty_strings_are_ignored() {
        let selector = Selector {
            agent: Some(String::new()),
            any_tag: Some("web".to_string()),
            ..Default::default()
        };
        assert_eq!(
            selector.system_filter().unwrap().as_str(),
            "tags.hasAny('web')"
        );
    }

    #[test]
    fn test_raw_filter_display() {
        let filter = SystemFilter::new("metadata.product='search'");
        assert_eq!(filter.to_string(), "metadata.product='search'");
    }
}
