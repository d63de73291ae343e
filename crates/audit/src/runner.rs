//! Suite runner: one fresh page per scenario, shared violation buffer,
//! report and JSON results at the end

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use a11y_report::ReportGenerator;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::buffer::ViolationBuffer;
use crate::config::SuiteConfig;
use crate::engine::{AuditEngine, AuditInvoker};
use crate::error::{AuditError, AuditResult};
use crate::page::Browser;
use crate::scenario::{Scenario, ScenarioContext};

/// Machine-readable results written next to the HTML report
pub const RESULTS_FILE_NAME: &str = "a11y-results.json";

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub title: String,
    pub success: bool,
    pub duration_ms: u64,
    /// Violations this scenario added to the report
    pub violations: usize,
    pub error: Option<String>,
}

/// Result of running a list of scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    /// Total violations collected across the run
    pub violations: usize,
    pub report_path: PathBuf,
    pub results: Vec<ScenarioResult>,
}

impl SuiteResult {
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

pub struct SuiteRunner {
    config: SuiteConfig,
    browser: Arc<dyn Browser>,
    invoker: AuditInvoker,
    reporter: ReportGenerator,
}

impl SuiteRunner {
    pub fn new(config: SuiteConfig, browser: Arc<dyn Browser>, engine: Arc<dyn AuditEngine>) -> Self {
        let invoker = AuditInvoker::new(engine, config.default_rules.clone());
        let reporter = ReportGenerator::new(config.report_dir.clone());
        Self {
            config,
            browser,
            invoker,
            reporter,
        }
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Run every scenario in the catalog
    pub async fn run_all(&self) -> AuditResult<SuiteResult> {
        self.run(&Scenario::catalog()).await
    }

    /// Run scenarios carrying `tag`
    pub async fn run_tagged(&self, tag: &str) -> AuditResult<SuiteResult> {
        self.run(&Scenario::filter_by_tag(Scenario::catalog(), tag)).await
    }

    /// Run a single scenario by name
    pub async fn run_named(&self, name: &str) -> AuditResult<SuiteResult> {
        let scenario = Scenario::find(name)
            .ok_or_else(|| AuditError::Config(format!("Scenario not found: {}", name)))?;
        self.run(&[scenario]).await
    }

    /// Run `scenarios` in order and generate the report.
    ///
    /// Scenario failures are recorded, not returned; only report and
    /// results I/O aborts the run.
    pub async fn run(&self, scenarios: &[Scenario]) -> AuditResult<SuiteResult> {
        let start = Instant::now();
        let mut violations = ViolationBuffer::new();
        let mut results = Vec::with_capacity(scenarios.len());
        let mut passed = 0;
        let mut failed = 0;

        info!("Running {} scenario(s) against {}", scenarios.len(), self.config.base_url);

        for scenario in scenarios {
            let result = self.run_scenario(scenario, &mut violations).await;
            if result.success {
                passed += 1;
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                failed += 1;
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let report_path =
            self.reporter
                .generate_report(violations.as_slice(), &self.config.base_url, &timestamp)?;

        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!(
            "Results: {} passed, {} failed, {} violation(s) ({} ms)",
            passed,
            failed,
            violations.len(),
            duration_ms
        );

        let suite = SuiteResult {
            total: scenarios.len(),
            passed,
            failed,
            duration_ms,
            violations: violations.len(),
            report_path,
            results,
        };
        self.write_results(&suite)?;
        Ok(suite)
    }

    /// Run one scenario on its own page
    pub async fn run_scenario(&self, scenario: &Scenario, violations: &mut ViolationBuffer) -> ScenarioResult {
        let start = Instant::now();
        let before = violations.len();

        let outcome = self.execute(scenario, violations).await;

        ScenarioResult {
            name: scenario.name.to_string(),
            title: scenario.title.to_string(),
            success: outcome.is_ok(),
            duration_ms: start.elapsed().as_millis() as u64,
            violations: violations.len() - before,
            error: outcome.err().map(|e| e.to_string()),
        }
    }

    async fn execute(&self, scenario: &Scenario, violations: &mut ViolationBuffer) -> AuditResult<()> {
        debug!("Opening page for scenario: {}", scenario.name);
        let mut page = self.browser.new_page().await?;

        let limit = Duration::from_secs(self.config.scenario_timeout_secs);
        let run = async {
            if scenario.needs_navigation() {
                page.goto(&self.config.base_url).await?;
            }
            let mut ctx = ScenarioContext {
                page: page.as_mut(),
                invoker: &self.invoker,
                violations,
                config: &self.config,
            };
            scenario.run(&mut ctx).await
        };

        let outcome = match tokio::time::timeout(limit, run).await {
            Ok(result) => result,
            Err(_) => Err(AuditError::Timeout(format!(
                "scenario '{}' ({} s)",
                scenario.name, self.config.scenario_timeout_secs
            ))),
        };

        if let Err(e) = page.close().await {
            warn!("Failed to close page for {}: {}", scenario.name, e);
        }

        outcome
    }

    /// Write suite results to JSON file
    pub fn write_results(&self, results: &SuiteResult) -> AuditResult<PathBuf> {
        std::fs::create_dir_all(&self.config.report_dir)?;

        let path = self.config.report_dir.join(RESULTS_FILE_NAME);
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }

    /// Release the browser
    pub async fn shutdown(&self) -> AuditResult<()> {
        self.browser.shutdown().await
    }
}
