//! a11y-report: violation model, pt-BR translations and report generation
//!
//! This crate holds the browser-free half of the accessibility suite:
//! - The violation model as produced by axe-core (`model`)
//! - Immutable translation and remediation tables (`translations`, `remediation`)
//! - Formatting of violations into inline failure messages (`formatter`)
//! - Rendering and persisting the detailed HTML report (`report`)
//!
//! # Data flow
//!
//! ```text
//! AuditResults ──► format_violations() ──► failure message
//!      │
//!      └──► ViolationBuffer (audit crate) ──► generate_report() ──► HTML file
//! ```

pub mod error;
pub mod formatter;
pub mod model;
pub mod remediation;
pub mod report;
pub mod translations;

pub use error::{ReportError, ReportResult};
pub use formatter::format_violations;
pub use model::{AuditResults, Impact, NodeResult, Violation};
pub use report::{ImpactSummary, ReportGenerator, REPORT_FILE_NAME};
pub use translations::{translate, translate_failure_summary, translate_impact, Category};
