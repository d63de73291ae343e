//! Inline failure messages for violations found by an audit

use std::fmt::Write;

use crate::model::{AuditResults, Violation};
use crate::translations::{translate, translate_failure_summary, translate_impact, Category};

/// Render every violation of `results` as a human-readable block.
///
/// Blocks keep the order of the input and are joined with newlines. An
/// empty result set renders as an empty string.
pub fn format_violations(results: &AuditResults) -> String {
    results
        .violations
        .iter()
        .map(format_violation)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_violation(violation: &Violation) -> String {
    let first = violation.nodes.first();
    let mut block = String::new();

    // writing to a String cannot fail
    let _ = writeln!(block, "Regra: {}", violation.id);
    let _ = writeln!(block, "Impacto: {}", translate_impact(violation.impact.as_deref()));
    let _ = writeln!(
        block,
        "Descrição: {}",
        translate(&violation.description, Category::Descriptions)
    );
    let _ = writeln!(block, "Ajuda: {}", translate(&violation.help, Category::Help));
    let _ = writeln!(block, "URL de ajuda: {}", violation.help_url);
    let _ = writeln!(block, "Elementos afetados: {}", violation.nodes.len());
    let _ = writeln!(
        block,
        "Primeiro elemento afetado: {}",
        first.map(|n| n.html.as_str()).unwrap_or("")
    );
    let _ = writeln!(
        block,
        "Resumo da falha: {}",
        first
            .map(|n| translate_failure_summary(n.failure_summary()))
            .unwrap_or_default()
    );

    block
}
