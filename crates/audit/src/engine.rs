//! Audit engine integration and the audit invoker
//!
//! The invoker merges per-check rule options over the suite defaults, runs
//! the engine, and turns a non-empty violation list into
//! [`AuditError::ViolationsFound`] carrying the formatted diagnostic.

use std::path::PathBuf;
use std::sync::Arc;

use a11y_report::{format_violations, AuditResults};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{AuditError, AuditResult};
use crate::page::Page;

/// Prefix of the failure message raised when violations are found
pub const VIOLATIONS_HEADER: &str = "Violações de acessibilidade encontradas:";

/// Rule-selection configuration handed to the engine.
///
/// Recognized keys include `runOnly`; any other key passes through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleOptions(Map<String, Value>);

impl RuleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict evaluation to the named rule ids
    pub fn run_only<S: AsRef<str>>(rules: &[S]) -> Self {
        Self::new().with(
            "runOnly",
            Value::Array(rules.iter().map(|r| Value::String(r.as_ref().to_string())).collect()),
        )
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shallow merge: keys in `overrides` replace keys in `self`
    pub fn merged(&self, overrides: &RuleOptions) -> RuleOptions {
        let mut merged = self.0.clone();
        for (key, value) in &overrides.0 {
            merged.insert(key.clone(), value.clone());
        }
        RuleOptions(merged)
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// External rule-evaluation engine
#[async_trait]
pub trait AuditEngine: Send + Sync {
    /// Evaluate `page`, optionally scoped to the subtree matched by `context`
    async fn analyze(
        &self,
        page: &mut dyn Page,
        context: Option<&str>,
        options: &RuleOptions,
    ) -> AuditResult<AuditResults>;
}

/// axe-core injected into the page under test
pub struct AxeEngine {
    source_path: PathBuf,
    source: OnceCell<String>,
}

impl AxeEngine {
    /// Engine loading `axe.min.js` from `source_path` on first use
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            source: OnceCell::new(),
        }
    }

    /// Engine with the axe-core source already in memory
    pub fn from_source(source: String) -> Self {
        Self {
            source_path: PathBuf::new(),
            source: OnceCell::with_value(source),
        }
    }

    fn source(&self) -> AuditResult<&str> {
        self.source
            .get_or_try_init(|| {
                std::fs::read_to_string(&self.source_path).map_err(|e| {
                    AuditError::Engine(format!(
                        "cannot read axe-core from {}: {}",
                        self.source_path.display(),
                        e
                    ))
                })
            })
            .map(String::as_str)
    }

    /// Expression running axe against the document or an included subtree
    pub fn run_expression(context: Option<&str>, options: &RuleOptions) -> String {
        let context = match context {
            Some(selector) => serde_json::json!({ "include": [selector] }).to_string(),
            None => "document".to_string(),
        };
        format!("axe.run({}, {})", context, options.as_value())
    }
}

#[async_trait]
impl AuditEngine for AxeEngine {
    async fn analyze(
        &self,
        page: &mut dyn Page,
        context: Option<&str>,
        options: &RuleOptions,
    ) -> AuditResult<AuditResults> {
        let loaded = page.evaluate("typeof window.axe !== 'undefined'").await?;
        if loaded != Value::Bool(true) {
            debug!("Injecting axe-core into page");
            let source = self.source()?.to_string();
            page.add_script(&source).await?;
        }

        let raw = page.evaluate(&Self::run_expression(context, options)).await?;
        serde_json::from_value(raw).map_err(|e| AuditError::Engine(format!("unexpected axe result: {}", e)))
    }
}

/// Runs audits with the suite-wide default rule configuration
#[derive(Clone)]
pub struct AuditInvoker {
    engine: Arc<dyn AuditEngine>,
    defaults: RuleOptions,
}

impl AuditInvoker {
    pub fn new(engine: Arc<dyn AuditEngine>, defaults: RuleOptions) -> Self {
        Self { engine, defaults }
    }

    pub fn defaults(&self) -> &RuleOptions {
        &self.defaults
    }

    /// Audit `page` and fail with a formatted diagnostic if anything is found.
    ///
    /// Engine errors are returned unchanged.
    pub async fn run_check(
        &self,
        page: &mut dyn Page,
        context: Option<&str>,
        options: Option<&RuleOptions>,
    ) -> AuditResult<AuditResults> {
        let merged = match options {
            Some(overrides) => self.defaults.merged(overrides),
            None => self.defaults.clone(),
        };

        debug!(context = ?context, options = %merged.as_value(), "Running audit");
        let results = self.engine.analyze(page, context, &merged).await?;

        if results.has_violations() {
            let message = format!("{}\n{}", VIOLATIONS_HEADER, format_violations(&results));
            return Err(AuditError::ViolationsFound {
                message,
                results: Box::new(results),
            });
        }

        Ok(results)
    }
}
