//! Detailed HTML accessibility report
//!
//! The report aggregates every violation accumulated during a suite run,
//! grouped per rule, with severity counts and remediation hints. It is
//! written to a fixed file name so each run overwrites the previous one.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ReportResult;
use crate::model::{Impact, Violation};
use crate::remediation::recommendations;
use crate::translations::{translate, translate_failure_summary, translate_impact, Category};

/// File name of the generated report inside the report directory
pub const REPORT_FILE_NAME: &str = "accessibility-report-detailed.html";

const REPORT_STYLE: &str = r#"        body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 1000px; margin: 0 auto; padding: 20px; }
        h1, h2, h3 { color: #2c3e50; }
        .violation { background-color: #f8f9fa; border-left: 5px solid #e74c3c; margin-bottom: 20px; padding: 15px; }
        .impact { font-weight: bold; }
        .impact.critical { color: #c0392b; }
        .impact.serious { color: #e67e22; }
        .impact.moderate { color: #f39c12; }
        .impact.minor { color: #16a085; }
        .impact.unknown { color: #7f8c8d; }
        code { background-color: #ecf0f1; padding: 2px 4px; border-radius: 4px; }
        .summary { background-color: #eee; padding: 10px; margin-bottom: 20px; }
        .node { border: 1px solid #bdc3c7; padding: 10px; margin-bottom: 10px; }
        .recommendations { background-color: #e8f8f5; padding: 10px; margin-top: 10px; }
"#;

const NEXT_STEPS: [&str; 5] = [
    "Priorize a correção das violações críticas e graves.",
    "Revise o código-fonte nos locais indicados pelos seletores.",
    "Implemente as correções sugeridas nas recomendações.",
    "Realize testes manuais para garantir que as correções não introduziram novos problemas.",
    "Execute novamente os testes automatizados após as correções.",
];

/// Violation counts per impact level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactSummary {
    pub total: usize,
    pub critical: usize,
    pub serious: usize,
    pub moderate: usize,
    pub minor: usize,
}

impl ImpactSummary {
    /// Count violations per recognized impact. Violations with an absent or
    /// unknown impact only contribute to `total`.
    pub fn from_violations(violations: &[Violation]) -> Self {
        let mut summary = Self {
            total: violations.len(),
            ..Default::default()
        };

        for violation in violations {
            match violation.severity() {
                Some(Impact::Critical) => summary.critical += 1,
                Some(Impact::Serious) => summary.serious += 1,
                Some(Impact::Moderate) => summary.moderate += 1,
                Some(Impact::Minor) => summary.minor += 1,
                None => {}
            }
        }

        summary
    }

    pub fn count(&self, impact: Impact) -> usize {
        match impact {
            Impact::Critical => self.critical,
            Impact::Serious => self.serious,
            Impact::Moderate => self.moderate,
            Impact::Minor => self.minor,
        }
    }

    /// Sum of the four recognized buckets
    pub fn classified(&self) -> usize {
        self.critical + self.serious + self.moderate + self.minor
    }
}

/// Writes the detailed report into a directory
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    report_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_dir: report_dir.into(),
        }
    }

    /// Fixed path the report is written to
    pub fn report_path(&self) -> PathBuf {
        self.report_dir.join(REPORT_FILE_NAME)
    }

    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// Render and write the report, overwriting any previous one.
    ///
    /// `url` is embedded verbatim. I/O errors are returned as-is.
    pub fn generate_report(
        &self,
        violations: &[Violation],
        url: &str,
        timestamp: &str,
    ) -> ReportResult<PathBuf> {
        std::fs::create_dir_all(&self.report_dir)?;

        let path = self.report_path();
        let html = render_report(violations, url, timestamp);
        std::fs::write(&path, html)?;

        info!("Relatório detalhado de acessibilidade gerado: {}", path.display());
        Ok(path)
    }
}

/// Render the full report document
pub fn render_report(violations: &[Violation], url: &str, timestamp: &str) -> String {
    let summary = ImpactSummary::from_violations(violations);
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Relatório Detalhado de Acessibilidade</title>
    <style>
{style}    </style>
</head>
<body>
    <h1>Relatório Detalhado de Acessibilidade</h1>
    <div class="summary">
        <p><strong>URL testada:</strong> {url}</p>
        <p><strong>Data do teste:</strong> {timestamp}</p>
        <p><strong>Total de violações:</strong> {total}</p>
    </div>

    <h2>Resumo das Violações por Impacto</h2>
    <ul>
        <li>Crítico: {critical}</li>
        <li>Grave: {serious}</li>
        <li>Moderado: {moderate}</li>
        <li>Leve: {minor}</li>
    </ul>

    <h2>Detalhes das Violações</h2>
"#,
        style = REPORT_STYLE,
        url = url,
        timestamp = escape_html(timestamp),
        total = summary.total,
        critical = summary.critical,
        serious = summary.serious,
        moderate = summary.moderate,
        minor = summary.minor,
    );

    for violation in violations {
        render_violation(&mut html, violation);
    }

    html.push_str("\n    <h2>Próximos Passos</h2>\n    <ol>\n");
    for step in NEXT_STEPS {
        let _ = writeln!(html, "        <li>{}</li>", step);
    }
    html.push_str("    </ol>\n</body>\n</html>\n");

    html
}

fn render_violation(html: &mut String, violation: &Violation) {
    let impact_class = violation.severity().map(|i| i.as_str()).unwrap_or("unknown");

    let _ = write!(
        html,
        r#"    <div class="violation">
        <h3>{id}: {description}</h3>
        <p><span class="impact {class}">Impacto: {impact}</span></p>
        <p><strong>Ajuda:</strong> <a href="{help_url}" target="_blank">{help}</a></p>
        <h4>Elementos afetados:</h4>
"#,
        id = escape_html(&violation.id),
        description = escape_html(translate(&violation.description, Category::Descriptions)),
        class = impact_class,
        impact = translate_impact(violation.impact.as_deref()),
        help_url = escape_html(&violation.help_url),
        help = escape_html(translate(&violation.help, Category::Help)),
    );

    for node in &violation.nodes {
        let _ = write!(
            html,
            r#"        <div class="node">
            <p><strong>HTML:</strong> <code>{markup}</code></p>
            <p><strong>Seletor:</strong> <code>{selectors}</code></p>
            <p><strong>Ação sugerida:</strong> {summary}</p>
        </div>
"#,
            markup = escape_html(&node.html),
            selectors = escape_html(&node.target.join(", ")),
            summary = escape_html(&translate_failure_summary(node.failure_summary())),
        );
    }

    html.push_str(
        "        <div class=\"recommendations\">\n            <h4>Recomendações para correção:</h4>\n            <ul>\n",
    );
    for rec in recommendations(&violation.id) {
        let _ = writeln!(html, "                <li>{}</li>", escape_html(rec));
    }
    html.push_str("            </ul>\n        </div>\n    </div>\n");
}

/// Escape text for display inside an element
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeResult;

    fn violation(id: &str, impact: Option<&str>) -> Violation {
        Violation {
            id: id.to_string(),
            description: format!("{} description", id),
            help: format!("{} help", id),
            help_url: format!("https://dequeuniversity.com/rules/axe/4.8/{}", id),
            impact: impact.map(String::from),
            nodes: vec![NodeResult {
                html: "<img src=\"x.png\">".to_string(),
                target: vec!["main".to_string(), "img:nth-child(2)".to_string()],
                failure_summary: Some("Fix any of the following:\n  Element does not have an alt attribute".to_string()),
            }],
        }
    }

    #[test]
    fn test_summary_counts_recognized_impacts() {
        let violations = vec![
            violation("a", Some("critical")),
            violation("b", Some("critical")),
            violation("c", Some("serious")),
            violation("d", Some("moderate")),
            violation("e", Some("minor")),
        ];
        let summary = ImpactSummary::from_violations(&violations);
        assert_eq!(summary.critical, 2);
        assert_eq!(summary.count(Impact::Serious), 1);
        assert_eq!(summary.classified(), violations.len());
        assert_eq!(summary.total, violations.len());
    }

    #[test]
    fn test_summary_excludes_unknown_impacts() {
        let violations = vec![
            violation("a", Some("critical")),
            violation("b", None),
            violation("c", Some("weird")),
        ];
        let summary = ImpactSummary::from_violations(&violations);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.classified(), 1);
    }

    #[test]
    fn test_render_includes_node_details_and_recommendations() {
        let html = render_report(&[violation("image-alt", Some("critical"))], "http://localhost:3000", "2024-01-01T00:00:00Z");

        assert!(html.contains("<li>Crítico: 1</li>"));
        assert!(html.contains("<li>Grave: 0</li>"));
        assert!(html.contains("<strong>URL testada:</strong> http://localhost:3000"));
        assert!(html.contains(r#"<span class="impact critical">Impacto: crítico</span>"#));
        assert!(html.contains("<code>main, img:nth-child(2)</code>"));
        assert!(html.contains("<code>&lt;img src=&quot;x.png&quot;&gt;</code>"));
        assert!(html.contains("Adicione um atributo alt descritivo a todas as imagens."));
        assert!(html.contains("Próximos Passos"));
    }

    #[test]
    fn test_render_unknown_rule_gets_generic_recommendation() {
        let html = render_report(&[violation("custom-rule", None)], "u", "t");
        assert!(html.contains(r#"class="impact unknown">Impacto: desconhecido"#));
        assert!(html.contains("Consulte a documentação específica"));
    }

    #[test]
    fn test_render_empty_report() {
        let html = render_report(&[], "u", "t");
        assert!(html.contains("<strong>Total de violações:</strong> 0"));
        assert!(!html.contains("class=\"violation\""));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_url_is_embedded_verbatim() {
        let url = "http://localhost:3000/?a=1&b=<x>";
        let html = render_report(&[], url, "t");
        assert!(html.contains(&format!("<strong>URL testada:</strong> {}</p>", url)));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }
}
