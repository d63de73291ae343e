//! Violation model as reported by the audit engine
//!
//! Field names follow axe-core's JSON result shape (`helpUrl`,
//! `failureSummary`) so engine output deserializes without a mapping layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of a violation, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Minor,
    Moderate,
    Serious,
    Critical,
}

impl Impact {
    pub const ALL: [Impact; 4] = [Impact::Critical, Impact::Serious, Impact::Moderate, Impact::Minor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Minor => "minor",
            Impact::Moderate => "moderate",
            Impact::Serious => "serious",
            Impact::Critical => "critical",
        }
    }
}

impl FromStr for Impact {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minor" => Ok(Impact::Minor),
            "moderate" => Ok(Impact::Moderate),
            "serious" => Ok(Impact::Serious),
            "critical" => Ok(Impact::Critical),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One element matched by a failing rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeResult {
    /// Serialized outer markup, for display only
    #[serde(default)]
    pub html: String,

    /// Selector path identifying the element
    #[serde(default)]
    pub target: Vec<String>,

    #[serde(default)]
    pub failure_summary: Option<String>,
}

impl NodeResult {
    pub fn failure_summary(&self) -> &str {
        self.failure_summary.as_deref().unwrap_or("")
    }
}

/// A single rule failure found during an audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub id: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub help: String,

    #[serde(default)]
    pub help_url: String,

    /// Raw impact as reported by the engine; may be absent or unrecognized
    #[serde(default)]
    pub impact: Option<String>,

    #[serde(default)]
    pub nodes: Vec<NodeResult>,
}

impl Violation {
    /// Recognized severity, `None` when absent or unknown
    pub fn severity(&self) -> Option<Impact> {
        self.impact.as_deref().and_then(|s| s.parse().ok())
    }
}

/// Result set returned by one engine invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditResults {
    #[serde(default)]
    pub violations: Vec<Violation>,

    /// Page URL the engine evaluated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl AuditResults {
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impact_ordering() {
        assert!(Impact::Critical > Impact::Serious);
        assert!(Impact::Serious > Impact::Moderate);
        assert!(Impact::Moderate > Impact::Minor);
    }

    #[test]
    fn test_parse_axe_violation() {
        let json = r##"{
            "violations": [{
                "id": "image-alt",
                "impact": "critical",
                "description": "Ensure <img> elements have alternate text or a role of none or presentation",
                "help": "Images must have alternate text",
                "helpUrl": "https://dequeuniversity.com/rules/axe/4.8/image-alt",
                "tags": ["wcag2a"],
                "nodes": [{
                    "html": "<img src=\"logo.png\">",
                    "target": ["#header > img"],
                    "failureSummary": "Fix any of the following:\n  Element does not have an alt attribute",
                    "any": []
                }]
            }],
            "url": "http://localhost:3000/"
        }"##;

        let results: AuditResults = serde_json::from_str(json).unwrap();
        assert_eq!(results.violations.len(), 1);
        let violation = &results.violations[0];
        assert_eq!(violation.severity(), Some(Impact::Critical));
        assert_eq!(violation.nodes[0].target, vec!["#header > img".to_string()]);
        assert!(violation.nodes[0].failure_summary().starts_with("Fix any"));
    }

    #[test]
    fn test_unknown_impact_is_kept_verbatim() {
        let json = r#"{"id": "x", "impact": "catastrophic", "nodes": []}"#;
        let violation: Violation = serde_json::from_str(json).unwrap();
        assert_eq!(violation.impact.as_deref(), Some("catastrophic"));
        assert_eq!(violation.severity(), None);

        let json = r#"{"id": "x", "impact": null}"#;
        let violation: Violation = serde_json::from_str(json).unwrap();
        assert_eq!(violation.severity(), None);
    }
}
