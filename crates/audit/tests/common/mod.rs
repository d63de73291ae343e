#![allow(dead_code)]

use std::sync::Mutex;

use a11y_audit::page::Page;
use a11y_audit::{AuditEngine, AuditError, AuditResult, RuleOptions};
use a11y_report::{AuditResults, NodeResult, Violation};
use async_trait::async_trait;

pub const GOOD_PAGE: &str = r##"<!DOCTYPE html>
<html lang="pt-BR">
<head><title>Loja</title></head>
<body>
  <a href="#main">Ir para o conteúdo</a>
  <header><a href="/">Logo</a><nav><a href="/produtos">Produtos</a></nav></header>
  <main id="main">
    <h1>Ofertas</h1>
    <h2>Semana</h2>
    <h3>Eletrônicos</h3>
    <h2>Mês</h2>
    <form><label>Busca <input type="text" name="q"></label><button>Buscar</button></form>
  </main>
  <footer><a href="/contato">Contato</a></footer>
</body>
</html>"##;

/// Engine returning a canned outcome and recording every call
pub struct ScriptedEngine {
    outcome: Result<AuditResults, String>,
    pub calls: Mutex<Vec<(Option<String>, RuleOptions)>>,
}

impl ScriptedEngine {
    pub fn clean() -> Self {
        Self::returning(AuditResults::default())
    }

    pub fn returning(results: AuditResults) -> Self {
        Self {
            outcome: Ok(results),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AuditEngine for ScriptedEngine {
    async fn analyze(
        &self,
        _page: &mut dyn Page,
        context: Option<&str>,
        options: &RuleOptions,
    ) -> AuditResult<AuditResults> {
        self.calls
            .lock()
            .unwrap()
            .push((context.map(str::to_string), options.clone()));

        match &self.outcome {
            Ok(results) => Ok(results.clone()),
            Err(message) => Err(AuditError::Engine(message.clone())),
        }
    }
}

pub fn violation(id: &str, impact: &str, nodes: usize) -> Violation {
    Violation {
        id: id.to_string(),
        description: format!("{} description", id),
        help: format!("{} help", id),
        help_url: format!("https://dequeuniversity.com/rules/axe/4.8/{}", id),
        impact: Some(impact.to_string()),
        nodes: (0..nodes)
            .map(|i| NodeResult {
                html: format!("<img src=\"{}.png\">", i),
                target: vec![format!("img:nth-child({})", i + 1)],
                failure_summary: Some("Fix any of the following:\n  Element does not have an alt attribute".to_string()),
            })
            .collect(),
    }
}

pub fn results(violations: Vec<Violation>) -> AuditResults {
    AuditResults {
        violations,
        ..Default::default()
    }
}
