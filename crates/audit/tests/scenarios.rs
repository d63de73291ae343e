//! Scenario checks against static pages and a scripted audit engine

mod common;

use std::sync::Arc;

use a11y_audit::{
    AuditError, AuditInvoker, AuditResult, Page, RuleOptions, Scenario, ScenarioContext, StaticPage, SuiteConfig,
    ViolationBuffer, VIOLATIONS_HEADER,
};
use common::{results, violation, ScriptedEngine, GOOD_PAGE};
use serde_json::json;
use test_case::test_case;

async fn run_scenario(html: &str, name: &str, engine: Arc<ScriptedEngine>) -> (AuditResult<()>, ViolationBuffer) {
    let config = SuiteConfig::default();
    let invoker = AuditInvoker::new(engine, config.default_rules.clone());
    let scenario = Scenario::find(name).unwrap();

    let mut page = StaticPage::new(html);
    page.goto(&config.base_url).await.unwrap();

    let mut violations = ViolationBuffer::new();
    let outcome = {
        let mut ctx = ScenarioContext {
            page: &mut page,
            invoker: &invoker,
            violations: &mut violations,
            config: &config,
        };
        scenario.run(&mut ctx).await
    };
    (outcome, violations)
}

async fn check(html: &str, name: &str) -> AuditResult<()> {
    run_scenario(html, name, Arc::new(ScriptedEngine::clean())).await.0
}

fn assertion_message(outcome: AuditResult<()>) -> String {
    match outcome {
        Err(AuditError::AssertionFailed(message)) => message,
        other => panic!("expected an assertion failure, got {:?}", other),
    }
}

#[test_case("document-structure")]
#[test_case("heading-hierarchy")]
#[test_case("keyboard-navigation")]
#[test_case("reading-order")]
#[test_case("landmarks")]
#[test_case("skip-link")]
#[test_case("tab-order")]
#[test_case("load-time")]
#[test_case("focus-latency")]
#[test_case("click-latency")]
#[tokio::test]
async fn test_check_passes_on_good_page(name: &str) {
    let outcome = check(GOOD_PAGE, name).await;
    assert!(outcome.is_ok(), "{} failed: {:?}", name, outcome);
}

#[tokio::test]
async fn test_missing_lang_fails_without_engine() {
    let html = GOOD_PAGE.replace(r#"<html lang="pt-BR">"#, "<html>");
    let engine = Arc::new(ScriptedEngine::failing("must not be called"));

    let (outcome, _) = run_scenario(&html, "document-structure", engine.clone()).await;

    assert_eq!(
        assertion_message(outcome),
        "O atributo lang deve estar presente na tag html"
    );
    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn test_two_h1_reports_expected_and_actual() {
    let html = GOOD_PAGE.replace("<h2>Mês</h2>", "<h1>Mês</h1>");
    let message = assertion_message(check(&html, "document-structure").await);
    assert!(message.contains("esperado 1, encontrado 2"), "{}", message);
}

#[tokio::test]
async fn test_empty_title_fails() {
    let html = GOOD_PAGE.replace("<title>Loja</title>", "<title>  </title>");
    let message = assertion_message(check(&html, "document-structure").await);
    assert_eq!(message, "A página deve ter um título");
}

#[tokio::test]
async fn test_heading_level_skip() {
    let html = GOOD_PAGE.replace("<h2>Semana</h2>", "");
    let message = assertion_message(check(&html, "heading-hierarchy").await);
    assert!(message.contains("Eletrônicos"), "{}", message);
    assert!(message.contains("h3"), "{}", message);
}

#[tokio::test]
async fn test_keyboard_navigation_needs_focusable_elements() {
    let html = r#"<html lang="pt-BR"><head><title>Vazio</title></head><body><p>Texto</p></body></html>"#;
    let message = assertion_message(check(html, "keyboard-navigation").await);
    assert_eq!(message, "O primeiro elemento focável deve estar presente");
}

#[tokio::test]
async fn test_footer_before_main_breaks_reading_order() {
    let html = r#"<html lang="pt-BR"><head><title>T</title></head><body>
        <header>Topo</header><footer>Rodapé</footer><main><h1>Conteúdo</h1></main>
    </body></html>"#;
    let message = assertion_message(check(html, "reading-order").await);
    assert_eq!(message, "O conteúdo principal deve vir antes do rodapé");
}

#[tokio::test]
async fn test_missing_footer_landmark() {
    let html = GOOD_PAGE
        .replace("<footer>", "<div>")
        .replace("</footer>", "</div>");
    let message = assertion_message(check(&html, "landmarks").await);
    assert!(message.starts_with("A página deve conter o landmark <footer>"), "{}", message);
}

#[tokio::test]
async fn test_missing_skip_link() {
    let html = GOOD_PAGE.replace(r##"<a href="#main">Ir para o conteúdo</a>"##, "");
    assert!(check(&html, "skip-link").await.is_err());
}

#[tokio::test]
async fn test_positive_tabindex_in_footer_breaks_tab_order() {
    let html = GOOD_PAGE.replace(
        r#"<a href="/contato">Contato</a>"#,
        r#"<a href="/contato" tabindex="1">Contato</a>"#,
    );
    let message = assertion_message(check(&html, "tab-order").await);
    assert!(message.contains("<a> \"Logo\" em <header>"), "{}", message);
    assert!(message.contains("<a> \"Contato\" em <footer>"), "{}", message);
}

#[tokio::test]
async fn test_header_navigation_reached_after_main_breaks_tab_order() {
    let html = r#"<html lang="pt-BR"><head><title>T</title></head><body>
        <header><nav><a href="/">Início</a></nav></header>
        <main><h1>Conteúdo</h1><a href="/mais" tabindex="1">Mais</a></main>
        <footer>Rodapé</footer>
    </body></html>"#;

    let message = assertion_message(check(html, "tab-order").await);
    assert!(message.contains("<a> \"Início\" em <header>"), "{}", message);
    assert!(message.contains("<a> \"Mais\" em <main>"), "{}", message);
}

#[tokio::test]
async fn test_no_paint_entry_fails_fcp() {
    let message = assertion_message(check(GOOD_PAGE, "first-contentful-paint").await);
    assert!(message.contains("first-contentful-paint"), "{}", message);
}

#[tokio::test]
async fn test_scoped_audit_collects_violations() {
    let engine = Arc::new(ScriptedEngine::returning(results(vec![violation("label", "critical", 2)])));

    let (outcome, violations) = run_scenario(GOOD_PAGE, "forms", engine.clone()).await;

    let Err(AuditError::ViolationsFound { message, results }) = outcome else {
        panic!("expected violations");
    };
    assert!(message.starts_with(VIOLATIONS_HEADER));
    assert!(message.contains("Regra: label"));
    assert!(message.contains("Elementos afetados: 2"));
    assert_eq!(results.violations.len(), 1);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations.as_slice()[0].id, "label");

    let calls = engine.calls.lock().unwrap();
    let (context, options) = &calls[0];
    assert_eq!(context.as_deref(), Some("form"));
    assert_eq!(
        options.get("runOnly"),
        RuleOptions::run_only(&["label", "form-field-multiple-labels", "select-name"]).get("runOnly")
    );
    assert_eq!(options.get("resultTypes"), Some(&json!(["violations"])));
}

#[tokio::test]
async fn test_engine_error_is_not_rewrapped() {
    let engine = Arc::new(ScriptedEngine::failing("axe exploded"));

    let (outcome, violations) = run_scenario(GOOD_PAGE, "axe-full-page", engine).await;

    match outcome {
        Err(AuditError::Engine(message)) => assert_eq!(message, "axe exploded"),
        other => panic!("expected engine error, got {:?}", other),
    }
    assert!(violations.is_empty());
}

#[tokio::test]
async fn test_viewports_audit_every_size() {
    let engine = Arc::new(ScriptedEngine::returning(results(vec![violation(
        "meta-viewport",
        "serious",
        1,
    )])));

    let (outcome, violations) = run_scenario(GOOD_PAGE, "viewports", engine.clone()).await;

    let Err(AuditError::ViolationsFound { message, results }) = outcome else {
        panic!("expected violations");
    };
    assert!(message.contains("Viewport mobile (375x667)"));
    assert!(message.contains("Viewport tablet (768x1024)"));
    assert!(message.contains("Viewport desktop (1440x900)"));
    assert_eq!(results.violations.len(), 3);
    assert_eq!(violations.len(), 3);

    let names: Vec<_> = engine
        .calls
        .lock()
        .unwrap()
        .iter()
        .map(|(_, options)| options.get("name").cloned())
        .collect();
    assert_eq!(
        names,
        vec![
            Some(json!("mobile viewport test")),
            Some(json!("tablet viewport test")),
            Some(json!("desktop viewport test")),
        ]
    );
}

#[tokio::test]
async fn test_clean_audit_passes() {
    let (outcome, violations) = run_scenario(GOOD_PAGE, "image-alt", Arc::new(ScriptedEngine::clean())).await;
    assert!(outcome.is_ok());
    assert!(violations.is_empty());
}
