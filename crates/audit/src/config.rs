//! Suite configuration
//!
//! Everything has a default so the suite runs with no config file at all; a
//! YAML file (`--config`) overrides any subset of fields, and CLI flags
//! override the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::engine::RuleOptions;
use crate::error::{AuditError, AuditResult};
use crate::page::NamedViewport;
use crate::playwright::PlaywrightConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Page under test
    pub base_url: String,

    /// Directory receiving the HTML report and JSON results
    pub report_dir: PathBuf,

    /// Rule configuration every audit starts from
    pub default_rules: RuleOptions,

    /// Viewports audited by the responsive scenario
    pub viewports: Vec<NamedViewport>,

    pub performance: PerformanceBudget,

    pub playwright: PlaywrightConfig,

    /// Path to `axe.min.js`
    pub axe_source: PathBuf,

    /// How long to wait for `base_url` to answer before giving up
    pub target_timeout_secs: u64,

    /// Upper bound for a single scenario
    pub scenario_timeout_secs: u64,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            report_dir: PathBuf::from("test-results"),
            default_rules: default_rules(),
            viewports: default_viewports(),
            performance: PerformanceBudget::default(),
            playwright: PlaywrightConfig::default(),
            axe_source: PathBuf::from("node_modules/axe-core/axe.min.js"),
            target_timeout_secs: 30,
            scenario_timeout_secs: 60,
        }
    }
}

fn default_rules() -> RuleOptions {
    RuleOptions::new()
        .with(
            "runOnly",
            json!({
                "type": "tag",
                "values": ["wcag2a", "wcag2aa", "wcag21a", "wcag21aa", "best-practice"]
            }),
        )
        .with("resultTypes", json!(["violations"]))
}

fn default_viewports() -> Vec<NamedViewport> {
    vec![
        NamedViewport::new("mobile", 375, 667),
        NamedViewport::new("tablet", 768, 1024),
        NamedViewport::new("desktop", 1440, 900),
    ]
}

/// Time budgets for the performance scenarios, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceBudget {
    pub load_ms: u64,
    pub focus_ms: u64,
    pub click_ms: u64,
    pub first_contentful_paint_ms: f64,
}

impl Default for PerformanceBudget {
    fn default() -> Self {
        Self {
            load_ms: 3000,
            focus_ms: 100,
            click_ms: 300,
            first_contentful_paint_ms: 2000.0,
        }
    }
}

impl SuiteConfig {
    pub fn from_yaml(yaml: &str) -> AuditResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> AuditResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> AuditResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(AuditError::Config("base_url must not be empty".to_string()));
        }
        if let Some(v) = self.viewports.iter().find(|v| v.width == 0 || v.height == 0) {
            return Err(AuditError::Config(format!(
                "viewport '{}' has a zero dimension",
                v.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SuiteConfig::default();
        assert_eq!(config.viewports.len(), 3);
        assert_eq!(config.viewports[0], NamedViewport::new("mobile", 375, 667));
        assert_eq!(config.performance.load_ms, 3000);
        assert!(config.default_rules.get("runOnly").is_some());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
base_url: https://staging.example.org
performance:
  load_ms: 5000
default_rules:
  resultTypes: [violations, incomplete]
"#;
        let config = SuiteConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.base_url, "https://staging.example.org");
        assert_eq!(config.performance.load_ms, 5000);
        assert_eq!(config.performance.focus_ms, 100);
        assert_eq!(config.viewports.len(), 3);
        assert!(config.default_rules.get("runOnly").is_none());
    }

    #[test]
    fn test_rejects_zero_viewport() {
        let yaml = r#"
viewports:
  - { name: broken, width: 0, height: 100 }
"#;
        assert!(matches!(SuiteConfig::from_yaml(yaml), Err(AuditError::Config(_))));
    }
}
