//! Offline page backed by a parsed HTML document
//!
//! Lets the structural and keyboard scenarios run against a saved HTML file
//! without a browser. Script evaluation, and therefore the audit engine, is
//! not available. Keyboard focus follows the sequential navigation order
//! computed by [`tab_sequence`].

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use kuchiki::traits::TendrilSink;
use kuchiki::{ElementData, NodeDataRef, NodeRef};

use crate::error::{AuditError, AuditResult};
use crate::page::{tab_sequence, Browser, ElementInfo, Page, Viewport, FOCUSABLE_SELECTOR, LANDMARK_TAGS, REGION_TAGS};

/// Serves [`StaticPage`]s over one HTML document
pub struct StaticBrowser {
    html: Arc<str>,
}

impl StaticBrowser {
    pub fn new(html: impl Into<Arc<str>>) -> Self {
        Self { html: html.into() }
    }

    pub fn from_file(path: &Path) -> AuditResult<Self> {
        let html = std::fs::read_to_string(path)?;
        Ok(Self::new(html))
    }
}

#[async_trait]
impl Browser for StaticBrowser {
    async fn new_page(&self) -> AuditResult<Box<dyn Page>> {
        Ok(Box::new(StaticPage::new(Arc::clone(&self.html))))
    }
}

pub struct StaticPage {
    html: Arc<str>,
    url: String,
    viewport: Option<Viewport>,
    /// Path of the focused element
    focused: Option<String>,
}

impl StaticPage {
    pub fn new(html: impl Into<Arc<str>>) -> Self {
        Self {
            html: html.into(),
            url: "about:blank".to_string(),
            viewport: None,
            focused: None,
        }
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    // The DOM is re-parsed per call: kuchiki nodes are `Rc`-based and cannot
    // be held by a `Send` page.
    fn document(&self) -> NodeRef {
        kuchiki::parse_html().one(self.html.as_ref())
    }

    fn select(&self, selector: &str) -> AuditResult<Vec<ElementInfo>> {
        let document = self.document();
        let matches = document
            .select(selector)
            .map_err(|_| AuditError::InvalidSelector(selector.to_string()))?;
        Ok(matches.map(|el| project(&el)).collect())
    }

    fn nth(&self, selector: &str, index: usize) -> AuditResult<ElementInfo> {
        self.select(selector)?
            .into_iter()
            .nth(index)
            .ok_or_else(|| AuditError::ElementNotFound(format!("{} >> nth={}", selector, index)))
    }

    fn tab_order(&self) -> AuditResult<Vec<ElementInfo>> {
        Ok(tab_sequence(self.select(FOCUSABLE_SELECTOR)?))
    }

    fn move_focus(&mut self, forward: bool) -> AuditResult<()> {
        let order = self.tab_order()?;
        let current = self
            .focused
            .as_ref()
            .and_then(|path| order.iter().position(|e| &e.path == path));

        // Past either end focus leaves the document, as it does for the browser UI
        let next = match (current, forward) {
            (None, true) => order.first(),
            (None, false) => order.last(),
            (Some(i), true) => order.get(i + 1),
            (Some(i), false) => i.checked_sub(1).and_then(|i| order.get(i)),
        };
        self.focused = next.map(|e| e.path.clone());
        Ok(())
    }
}

fn element_tag(element: &ElementData) -> String {
    element.name.local.to_string().to_ascii_lowercase()
}

fn project(el: &NodeDataRef<ElementData>) -> ElementInfo {
    let node = el.as_node();
    let attributes = el
        .attributes
        .borrow()
        .map
        .iter()
        .map(|(name, attr)| (name.local.to_string(), attr.value.clone()))
        .collect();

    let ancestors: Vec<String> = node
        .ancestors()
        .filter_map(|n| n.as_element().map(element_tag))
        .collect();
    let landmark = ancestors
        .iter()
        .find(|tag| LANDMARK_TAGS.contains(&tag.as_str()))
        .cloned();
    let region = ancestors
        .iter()
        .rev()
        .find(|tag| REGION_TAGS.contains(&tag.as_str()))
        .cloned();

    ElementInfo {
        tag: element_tag(el),
        text: node.text_contents().split_whitespace().collect::<Vec<_>>().join(" "),
        attributes,
        landmark,
        region,
        path: structural_path(node),
    }
}

/// `html > body:nth-child(2) > main:nth-child(3) > ...`, same shape the
/// Playwright driver produces
fn structural_path(node: &NodeRef) -> String {
    let mut parts = Vec::new();
    let mut current = Some(node.clone());

    while let Some(n) = current {
        let Some(element) = n.as_element() else {
            break;
        };
        let tag = element_tag(element);
        let parent = n.parent().filter(|p| p.as_element().is_some());

        if parent.is_none() {
            parts.push(tag);
            break;
        }

        let index = 1 + n.preceding_siblings().filter(|s| s.as_element().is_some()).count();
        parts.push(format!("{}:nth-child({})", tag, index));
        current = parent;
    }

    parts.reverse();
    parts.join(" > ")
}

#[async_trait]
impl Page for StaticPage {
    async fn goto(&mut self, url: &str) -> AuditResult<()> {
        self.url = url.to_string();
        self.focused = None;
        Ok(())
    }

    async fn current_url(&mut self) -> AuditResult<String> {
        Ok(self.url.clone())
    }

    async fn title(&mut self) -> AuditResult<String> {
        let title = self
            .document()
            .select_first("title")
            .map(|t| t.as_node().text_contents().trim().to_string())
            .unwrap_or_default();
        Ok(title)
    }

    async fn attribute(&mut self, selector: &str, name: &str) -> AuditResult<Option<String>> {
        let element = self
            .select(selector)?
            .into_iter()
            .next()
            .ok_or_else(|| AuditError::ElementNotFound(selector.to_string()))?;
        Ok(element.attr(name).map(String::from))
    }

    async fn query_all(&mut self, selector: &str) -> AuditResult<Vec<ElementInfo>> {
        self.select(selector)
    }

    async fn press(&mut self, key: &str) -> AuditResult<()> {
        match key {
            "Tab" => self.move_focus(true),
            "Shift+Tab" => self.move_focus(false),
            _ => Ok(()),
        }
    }

    async fn active_element(&mut self) -> AuditResult<Option<ElementInfo>> {
        let Some(path) = self.focused.clone() else {
            return Ok(None);
        };
        Ok(self.select("*")?.into_iter().find(|e| e.path == path))
    }

    async fn focus(&mut self, selector: &str, index: usize) -> AuditResult<()> {
        let element = self.nth(selector, index)?;
        if element.is_tabbable() || element.tabindex().is_some() {
            self.focused = Some(element.path);
        }
        Ok(())
    }

    async fn click(&mut self, selector: &str, index: usize) -> AuditResult<()> {
        self.focus(selector, index).await
    }

    async fn set_viewport(&mut self, viewport: Viewport) -> AuditResult<()> {
        self.viewport = Some(viewport);
        Ok(())
    }

    async fn first_contentful_paint(&mut self) -> AuditResult<Option<f64>> {
        Ok(None)
    }

    async fn evaluate(&mut self, _expression: &str) -> AuditResult<serde_json::Value> {
        Err(AuditError::Unsupported("script evaluation on a static page".to_string()))
    }

    async fn add_script(&mut self, _source: &str) -> AuditResult<()> {
        Err(AuditError::Unsupported("script injection on a static page".to_string()))
    }

    async fn close(&mut self) -> AuditResult<()> {
        Ok(())
    }
}
