//! Browser control interface
//!
//! Scenarios talk to a page exclusively through [`Page`], so the same checks
//! run against a live Playwright page or an offline [`StaticPage`].
//!
//! [`StaticPage`]: crate::static_page::StaticPage

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AuditResult;

/// Elements that can receive keyboard focus
pub const FOCUSABLE_SELECTOR: &str =
    r#"a, button, input, select, textarea, [tabindex]:not([tabindex="-1"])"#;

/// Landmark elements, in the order a page is expected to present them
pub const LANDMARK_TAGS: [&str; 5] = ["header", "nav", "main", "aside", "footer"];

/// Page regions that sequential focus must visit in this order
pub const REGION_TAGS: [&str; 3] = ["header", "main", "footer"];

/// Serializable projection of a DOM element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementInfo {
    /// Lowercase tag name
    pub tag: String,

    /// Trimmed text content with whitespace collapsed
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    /// Closest enclosing landmark tag, if any
    #[serde(default)]
    pub landmark: Option<String>,

    /// Outermost enclosing `header`, `main` or `footer`, if any
    #[serde(default)]
    pub region: Option<String>,

    /// Unique structural path (`html > body:nth-child(2) > ...`)
    #[serde(default)]
    pub path: String,
}

impl ElementInfo {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn tabindex(&self) -> Option<i32> {
        self.attr("tabindex").and_then(|v| v.trim().parse().ok())
    }

    /// Heading level for `h1`..`h6`
    pub fn heading_level(&self) -> Option<u8> {
        let mut chars = self.tag.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some('h'), Some(d @ '1'..='6'), None) => d.to_digit(10).map(|d| d as u8),
            _ => None,
        }
    }

    /// Whether the element takes part in sequential keyboard navigation
    pub fn is_tabbable(&self) -> bool {
        if matches!(self.tabindex(), Some(t) if t < 0) {
            return false;
        }
        if self.attr("disabled").is_some() {
            return false;
        }
        match self.tag.as_str() {
            "a" => self.attr("href").is_some() || self.tabindex().is_some(),
            "input" => self.attr("type") != Some("hidden"),
            _ => true,
        }
    }

    /// Short human-readable description for messages
    pub fn describe(&self) -> String {
        let text: String = self.text.chars().take(20).collect();
        if text.is_empty() {
            format!("<{}>", self.tag)
        } else {
            format!("<{}> \"{}\"", self.tag, text)
        }
    }
}

/// Order focusable elements the way sequential Tab navigation visits them:
/// positive `tabindex` values first (ascending, ties in document order),
/// then everything else in document order.
pub fn tab_sequence(elements: Vec<ElementInfo>) -> Vec<ElementInfo> {
    let (mut positive, rest): (Vec<_>, Vec<_>) = elements
        .into_iter()
        .filter(ElementInfo::is_tabbable)
        .partition(|e| matches!(e.tabindex(), Some(t) if t > 0));

    positive.sort_by_key(|e| e.tabindex().unwrap_or(0));
    positive.extend(rest);
    positive
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// A viewport preset audited by the responsive scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedViewport {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl NamedViewport {
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.width,
            height: self.height,
        }
    }
}

/// A single page/tab owned by the scenario that opened it
#[async_trait]
pub trait Page: Send {
    /// Navigate to a URL and wait for the load event
    async fn goto(&mut self, url: &str) -> AuditResult<()>;

    async fn current_url(&mut self) -> AuditResult<String>;

    async fn title(&mut self) -> AuditResult<String>;

    /// Attribute of the first element matching `selector`.
    /// Errors when nothing matches.
    async fn attribute(&mut self, selector: &str, name: &str) -> AuditResult<Option<String>>;

    /// All elements matching `selector`, in document order
    async fn query_all(&mut self, selector: &str) -> AuditResult<Vec<ElementInfo>>;

    async fn count(&mut self, selector: &str) -> AuditResult<usize> {
        Ok(self.query_all(selector).await?.len())
    }

    /// Simulate a key press on whatever has focus
    async fn press(&mut self, key: &str) -> AuditResult<()>;

    /// Focused element, `None` when focus is on the document body or outside the page
    async fn active_element(&mut self) -> AuditResult<Option<ElementInfo>>;

    /// Focus the `index`-th match of `selector`
    async fn focus(&mut self, selector: &str, index: usize) -> AuditResult<()>;

    /// Click the `index`-th match of `selector`, skipping actionability checks
    async fn click(&mut self, selector: &str, index: usize) -> AuditResult<()>;

    async fn set_viewport(&mut self, viewport: Viewport) -> AuditResult<()>;

    /// First contentful paint start time in milliseconds, if the page painted
    async fn first_contentful_paint(&mut self) -> AuditResult<Option<f64>>;

    /// Evaluate a JavaScript expression in the page, awaiting promises
    async fn evaluate(&mut self, expression: &str) -> AuditResult<serde_json::Value>;

    /// Inject a classic script into the page
    async fn add_script(&mut self, source: &str) -> AuditResult<()>;

    async fn close(&mut self) -> AuditResult<()>;
}

/// Factory for fresh, isolated pages
#[async_trait]
pub trait Browser: Send + Sync {
    async fn new_page(&self) -> AuditResult<Box<dyn Page>>;

    async fn shutdown(&self) -> AuditResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str, attrs: &[(&str, &str)]) -> ElementInfo {
        ElementInfo {
            tag: tag.to_string(),
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            path: format!("{}{}", tag, attrs.len()),
            ..Default::default()
        }
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(element("h1", &[]).heading_level(), Some(1));
        assert_eq!(element("h6", &[]).heading_level(), Some(6));
        assert_eq!(element("h7", &[]).heading_level(), None);
        assert_eq!(element("header", &[]).heading_level(), None);
        assert_eq!(element("h", &[]).heading_level(), None);
    }

    #[test]
    fn test_tabbable_rules() {
        assert!(element("a", &[("href", "#")]).is_tabbable());
        assert!(!element("a", &[]).is_tabbable());
        assert!(!element("button", &[("disabled", "")]).is_tabbable());
        assert!(!element("button", &[("tabindex", "-1")]).is_tabbable());
        assert!(!element("input", &[("type", "hidden")]).is_tabbable());
        assert!(element("div", &[("tabindex", "0")]).is_tabbable());
    }

    #[test]
    fn test_tab_sequence_puts_positive_tabindex_first() {
        let elements = vec![
            element("a", &[("href", "#a")]),
            element("button", &[("tabindex", "2")]),
            element("input", &[]),
            element("select", &[("tabindex", "1")]),
        ];
        let tags: Vec<String> = tab_sequence(elements).into_iter().map(|e| e.tag).collect();
        assert_eq!(tags, vec!["select", "button", "a", "input"]);
    }
}
