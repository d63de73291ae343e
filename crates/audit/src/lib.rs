//! Accessibility test suite
//!
//! Drives a real browser through Playwright, audits pages with axe-core and
//! runs structural, keyboard and performance checks. Every violation found
//! along the way is collected into one detailed HTML report.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  SuiteRunner (Rust)                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  for each Scenario:                                         │
//! │    Browser::new_page() -> Box<dyn Page>                     │
//! │      ├── PlaywrightBrowser (node driver, JSON lines)        │
//! │      └── StaticBrowser     (kuchiki, offline)               │
//! │    Scenario::run(ScenarioContext)                           │
//! │      ├── AuditInvoker::run_check -> AuditEngine (axe-core)  │
//! │      └── structural / keyboard / timing assertions          │
//! │    violations -> ViolationBuffer                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ReportGenerator -> accessibility-report-detailed.html      │
//! │  write_results   -> a11y-results.json                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod buffer;
pub mod config;
pub mod engine;
pub mod error;
pub mod page;
pub mod playwright;
pub mod runner;
pub mod scenario;
pub mod static_page;
pub mod target;

pub use buffer::ViolationBuffer;
pub use config::{PerformanceBudget, SuiteConfig};
pub use engine::{AuditEngine, AuditInvoker, AxeEngine, RuleOptions, VIOLATIONS_HEADER};
pub use error::{AuditError, AuditResult};
pub use page::{Browser, ElementInfo, Page};
pub use runner::{ScenarioResult, SuiteResult, SuiteRunner};
pub use scenario::{Check, Scenario, ScenarioContext};
pub use static_page::{StaticBrowser, StaticPage};
