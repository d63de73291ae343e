//! Suite-scoped violation accumulator

use a11y_report::Violation;

/// Append-only list of every violation found during a suite run.
///
/// Owned by the runner and lent to each scenario; read once at the end to
/// build the report.
#[derive(Debug, Default)]
pub struct ViolationBuffer {
    violations: Vec<Violation>,
}

impl ViolationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend<I: IntoIterator<Item = Violation>>(&mut self, violations: I) {
        self.violations.extend(violations);
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn as_slice(&self) -> &[Violation] {
        &self.violations
    }
}
