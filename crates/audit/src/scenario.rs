//! Accessibility and performance scenarios
//!
//! Each scenario is independent: it gets a fresh page (already navigated to
//! the base URL unless it measures navigation itself), performs one check and
//! reports through `AuditResult`. Audit violations are appended to the
//! suite's [`ViolationBuffer`] before the failure is returned.

use std::time::Instant;

use a11y_report::AuditResults;
use serde_json::json;
use tracing::debug;

use crate::buffer::ViolationBuffer;
use crate::config::SuiteConfig;
use crate::engine::{AuditInvoker, RuleOptions};
use crate::error::{AuditError, AuditResult};
use crate::page::{tab_sequence, ElementInfo, Page, FOCUSABLE_SELECTOR};

const HEADINGS_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";
const LANDMARKS_SELECTOR: &str =
    "header, nav, main, footer, aside, section[aria-label], section[aria-labelledby]";
const SKIP_LINK_SELECTOR: &str = r##"a[href^="#main"]"##;
const INTERACTIVE_SELECTOR: &str = r#"button, a, input[type="submit"]"#;

/// Number of extra Tab presses in the keyboard navigation check
const TAB_PRESSES: usize = 10;

/// What a scenario checks
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    /// Run the audit engine, optionally scoped and restricted to `rules`
    Audit {
        context: Option<&'static str>,
        rules: &'static [&'static str],
    },
    DocumentStructure,
    HeadingHierarchy,
    KeyboardNavigation,
    ReadingOrder,
    Landmarks,
    SkipLink,
    TabOrder,
    Viewports,
    LoadTime,
    FocusLatency,
    ClickLatency,
    FirstContentfulPaint,
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub title: &'static str,
    pub tags: &'static [&'static str],
    pub check: Check,
}

/// Everything a running scenario may touch
pub struct ScenarioContext<'a> {
    pub page: &'a mut dyn Page,
    pub invoker: &'a AuditInvoker,
    pub violations: &'a mut ViolationBuffer,
    pub config: &'a SuiteConfig,
}

const fn audit(
    name: &'static str,
    title: &'static str,
    context: Option<&'static str>,
    rules: &'static [&'static str],
) -> Scenario {
    Scenario {
        name,
        title,
        tags: &["audit"],
        check: Check::Audit { context, rules },
    }
}

const fn check(name: &'static str, title: &'static str, tags: &'static [&'static str], check: Check) -> Scenario {
    Scenario { name, title, tags, check }
}

impl Scenario {
    /// The accessibility suite, in execution order
    pub fn accessibility() -> Vec<Scenario> {
        vec![
            audit("axe-full-page", "Deve passar nos testes do axe-core na página inteira", None, &[]),
            check(
                "document-structure",
                "Deve ter uma estrutura de documento adequada",
                &["structure"],
                Check::DocumentStructure,
            ),
            check(
                "heading-hierarchy",
                "Deve ter uma hierarquia de cabeçalhos adequada",
                &["structure"],
                Check::HeadingHierarchy,
            ),
            audit("image-alt", "Deve ter texto alternativo adequado para imagens", None, &["image-alt"]),
            audit("color-contrast", "Deve ter contraste de cores adequado", None, &["color-contrast"]),
            check(
                "keyboard-navigation",
                "Deve ser navegável por teclado",
                &["keyboard"],
                Check::KeyboardNavigation,
            ),
            audit(
                "forms",
                "Deve ter formulários acessíveis",
                Some("form"),
                &["label", "form-field-multiple-labels", "select-name"],
            ),
            audit("link-name", "Deve ter links acessíveis", None, &["link-name"]),
            check(
                "viewports",
                "Deve ser acessível em diferentes tamanhos de tela",
                &["audit", "responsive"],
                Check::Viewports,
            ),
            audit(
                "aria-attributes",
                "Deve ter atributos ARIA usados corretamente",
                None,
                &[
                    "aria-allowed-attr",
                    "aria-hidden-body",
                    "aria-hidden-focus",
                    "aria-input-field-name",
                    "aria-toggle-field-name",
                ],
            ),
            check(
                "reading-order",
                "Deve ter uma ordem de leitura lógica",
                &["structure"],
                Check::ReadingOrder,
            ),
            check("landmarks", "Deve ter landmarks semânticos", &["structure"], Check::Landmarks),
            check("skip-link", "Deve ter skip links", &["structure", "keyboard"], Check::SkipLink),
            audit("focus-visible", "Deve ter foco visível", None, &["focus-visible"]),
            audit(
                "document-structure-rules",
                "Deve ter uma estrutura de documento adequada para leitores de tela",
                None,
                &["document-structure"],
            ),
            audit("readability", "Deve ter textos legíveis", None, &["content-readability"]),
            audit(
                "media-alternatives",
                "Deve ter mídia alternativa para áudio e vídeo",
                None,
                &["audio-video-alternative"],
            ),
            audit("aria-roles", "Deve ter WAI-ARIA roles usados corretamente", None, &["aria-roles"]),
            audit(
                "aria-props",
                "Deve ter estados e propriedades ARIA usados corretamente",
                None,
                &["aria-props"],
            ),
            check(
                "tab-order",
                "Deve ter uma ordem de tabulação lógica",
                &["keyboard"],
                Check::TabOrder,
            ),
        ]
    }

    /// Accessibility-related performance checks
    pub fn performance() -> Vec<Scenario> {
        vec![
            check(
                "load-time",
                "Deve carregar a página em um tempo razoável",
                &["performance"],
                Check::LoadTime,
            ),
            check(
                "focus-latency",
                "Não deve haver atrasos significativos ao focar elementos",
                &["performance", "keyboard"],
                Check::FocusLatency,
            ),
            check(
                "click-latency",
                "Não deve haver atrasos significativos ao acionar elementos interativos",
                &["performance"],
                Check::ClickLatency,
            ),
            check(
                "first-contentful-paint",
                "Deve ter um tempo de primeira pintura significativa (FCP) razoável",
                &["performance"],
                Check::FirstContentfulPaint,
            ),
        ]
    }

    pub fn catalog() -> Vec<Scenario> {
        let mut all = Self::accessibility();
        all.extend(Self::performance());
        all
    }

    pub fn find(name: &str) -> Option<Scenario> {
        Self::catalog().into_iter().find(|s| s.name == name)
    }

    pub fn filter_by_tag(scenarios: Vec<Scenario>, tag: &str) -> Vec<Scenario> {
        scenarios.into_iter().filter(|s| s.tags.contains(&tag)).collect()
    }

    /// Whether the runner should open the base URL before the check
    pub fn needs_navigation(&self) -> bool {
        !matches!(self.check, Check::LoadTime)
    }

    /// Whether the check needs script evaluation or real timings, which a
    /// static page cannot provide
    pub fn requires_browser(&self) -> bool {
        matches!(
            self.check,
            Check::Audit { .. }
                | Check::Viewports
                | Check::LoadTime
                | Check::FocusLatency
                | Check::ClickLatency
                | Check::FirstContentfulPaint
        )
    }

    pub async fn run(&self, ctx: &mut ScenarioContext<'_>) -> AuditResult<()> {
        debug!("Running scenario: {}", self.name);

        match &self.check {
            Check::Audit { context, rules } => {
                let options = (!rules.is_empty()).then(|| RuleOptions::run_only(*rules));
                run_audit(ctx, *context, options.as_ref()).await
            }
            Check::DocumentStructure => document_structure(ctx.page).await,
            Check::HeadingHierarchy => heading_hierarchy(ctx.page).await,
            Check::KeyboardNavigation => keyboard_navigation(ctx.page).await,
            Check::ReadingOrder => reading_order(ctx.page).await,
            Check::Landmarks => landmarks(ctx.page).await,
            Check::SkipLink => skip_link(ctx.page).await,
            Check::TabOrder => tab_order(ctx.page).await,
            Check::Viewports => viewports(ctx).await,
            Check::LoadTime => load_time(ctx).await,
            Check::FocusLatency => focus_latency(ctx).await,
            Check::ClickLatency => click_latency(ctx).await,
            Check::FirstContentfulPaint => first_contentful_paint(ctx).await,
        }
    }
}

fn ensure(condition: bool, message: impl FnOnce() -> String) -> AuditResult<()> {
    if condition {
        Ok(())
    } else {
        Err(AuditError::AssertionFailed(message()))
    }
}

/// Audit the page, recording any violations before failing
pub async fn run_audit(
    ctx: &mut ScenarioContext<'_>,
    context: Option<&str>,
    options: Option<&RuleOptions>,
) -> AuditResult<()> {
    match ctx.invoker.run_check(&mut *ctx.page, context, options).await {
        Ok(_) => Ok(()),
        Err(AuditError::ViolationsFound { message, results }) => {
            ctx.violations.extend(results.violations.iter().cloned());
            Err(AuditError::ViolationsFound { message, results })
        }
        Err(e) => Err(e),
    }
}

async fn document_structure(page: &mut dyn Page) -> AuditResult<()> {
    let title = page.title().await?;
    ensure(!title.trim().is_empty(), || "A página deve ter um título".to_string())?;

    let lang = page.attribute("html", "lang").await?;
    ensure(lang.map_or(false, |l| !l.trim().is_empty()), || {
        "O atributo lang deve estar presente na tag html".to_string()
    })?;

    let h1_count = page.count("h1").await?;
    ensure(h1_count == 1, || {
        format!("A página deve ter exatamente um h1: esperado 1, encontrado {}", h1_count)
    })
}

async fn heading_hierarchy(page: &mut dyn Page) -> AuditResult<()> {
    let headings = page.query_all(HEADINGS_SELECTOR).await?;

    let mut previous = 0u8;
    for heading in &headings {
        let Some(level) = heading.heading_level() else {
            continue;
        };
        ensure(level <= previous + 1, || {
            format!(
                "O nível do cabeçalho não deve pular: \"{}\" (h{} após nível {})",
                heading.text, level, previous
            )
        })?;
        previous = level;
    }
    Ok(())
}

async fn keyboard_navigation(page: &mut dyn Page) -> AuditResult<()> {
    page.press("Tab").await?;
    let first = page.active_element().await?.ok_or_else(|| {
        AuditError::AssertionFailed("O primeiro elemento focável deve estar presente".to_string())
    })?;

    for _ in 0..TAB_PRESSES {
        page.press("Tab").await?;
    }

    let last = page.active_element().await?;
    ensure(last.map_or(true, |l| l.path != first.path), || {
        format!(
            "Deve ser possível navegar por vários elementos: o foco voltou para {}",
            first.describe()
        )
    })
}

async fn reading_order(page: &mut dyn Page) -> AuditResult<()> {
    let regions = page.query_all("header, main, footer").await?;

    let mut header_found = false;
    let mut main_found = false;
    for region in &regions {
        match region.tag.as_str() {
            "header" => header_found = true,
            "main" => {
                main_found = true;
                ensure(header_found, || {
                    "O cabeçalho deve vir antes do conteúdo principal".to_string()
                })?;
            }
            "footer" => {
                ensure(main_found, || "O conteúdo principal deve vir antes do rodapé".to_string())?;
            }
            _ => {}
        }
    }
    Ok(())
}

async fn landmarks(page: &mut dyn Page) -> AuditResult<()> {
    let found: Vec<String> = page
        .query_all(LANDMARKS_SELECTOR)
        .await?
        .into_iter()
        .map(|e| e.tag)
        .collect();

    for required in ["header", "main", "footer"] {
        ensure(found.iter().any(|t| t == required), || {
            format!("A página deve conter o landmark <{}> (encontrados: {:?})", required, found)
        })?;
    }
    Ok(())
}

async fn skip_link(page: &mut dyn Page) -> AuditResult<()> {
    let count = page.count(SKIP_LINK_SELECTOR).await?;
    ensure(count > 0, || {
        "A página deve ter um skip link para o conteúdo principal".to_string()
    })
}

fn landmark_rank(element: &ElementInfo) -> Option<(u8, &'static str)> {
    match element.region.as_deref() {
        Some("header") => Some((0, "header")),
        Some("main") => Some((1, "main")),
        Some("footer") => Some((2, "footer")),
        _ => None,
    }
}

/// Sequential focus must visit header, main and footer content in that
/// order. An element belongs to its outermost such region, so header
/// navigation counts as header content. Elements outside all three are not
/// constrained.
async fn tab_order(page: &mut dyn Page) -> AuditResult<()> {
    let sequence = tab_sequence(page.query_all(FOCUSABLE_SELECTOR).await?);

    let mut furthest: Option<(u8, &'static str, &ElementInfo)> = None;
    for element in &sequence {
        let Some((rank, region)) = landmark_rank(element) else {
            continue;
        };

        if let Some((seen_rank, seen_region, seen)) = furthest {
            ensure(rank >= seen_rank, || {
                format!(
                    "Ordem de tabulação ilógica: {} em <{}> é alcançado depois de {} em <{}>",
                    element.describe(),
                    region,
                    seen.describe(),
                    seen_region
                )
            })?;
        }

        if furthest.map_or(true, |(seen_rank, _, _)| rank > seen_rank) {
            furthest = Some((rank, region, element));
        }
    }
    Ok(())
}

async fn viewports(ctx: &mut ScenarioContext<'_>) -> AuditResult<()> {
    let config = ctx.config;
    let mut failures = Vec::new();
    let mut found = Vec::new();

    for viewport in &config.viewports {
        ctx.page.set_viewport(viewport.viewport()).await?;
        let options = RuleOptions::new().with("name", json!(format!("{} viewport test", viewport.name)));

        match run_audit(ctx, None, Some(&options)).await {
            Ok(()) => {}
            Err(AuditError::ViolationsFound { message, results }) => {
                failures.push(format!(
                    "Viewport {} ({}x{}):\n{}",
                    viewport.name, viewport.width, viewport.height, message
                ));
                found.extend(results.violations);
            }
            Err(e) => return Err(e),
        }
    }

    if failures.is_empty() {
        return Ok(());
    }

    Err(AuditError::ViolationsFound {
        message: failures.join("\n"),
        results: Box::new(AuditResults {
            violations: found,
            ..Default::default()
        }),
    })
}

async fn load_time(ctx: &mut ScenarioContext<'_>) -> AuditResult<()> {
    let budget = ctx.config.performance.load_ms;

    let start = Instant::now();
    ctx.page.goto(&ctx.config.base_url).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    debug!("Page loaded in {} ms", elapsed);
    ensure(elapsed < budget, || {
        format!("A página levou {} ms para carregar (limite: {} ms)", elapsed, budget)
    })
}

async fn focus_latency(ctx: &mut ScenarioContext<'_>) -> AuditResult<()> {
    let budget = ctx.config.performance.focus_ms;
    let elements = ctx.page.query_all(FOCUSABLE_SELECTOR).await?;

    for (index, element) in elements.iter().enumerate() {
        let start = Instant::now();
        ctx.page.focus(FOCUSABLE_SELECTOR, index).await?;
        let elapsed = start.elapsed().as_millis() as u64;

        ensure(elapsed < budget, || {
            format!(
                "Focar {} levou {} ms (limite: {} ms)",
                element.describe(),
                elapsed,
                budget
            )
        })?;
    }
    Ok(())
}

async fn click_latency(ctx: &mut ScenarioContext<'_>) -> AuditResult<()> {
    let budget = ctx.config.performance.click_ms;
    let home = ctx.page.current_url().await?;
    let elements = ctx.page.query_all(INTERACTIVE_SELECTOR).await?;

    for (index, element) in elements.iter().enumerate() {
        let start = Instant::now();
        ctx.page.click(INTERACTIVE_SELECTOR, index).await?;
        let elapsed = start.elapsed().as_millis() as u64;

        ensure(elapsed < budget, || {
            format!(
                "Acionar {} levou {} ms (limite: {} ms)",
                element.describe(),
                elapsed,
                budget
            )
        })?;

        // a link may have navigated away; later indices refer to the start page
        if ctx.page.current_url().await? != home {
            ctx.page.goto(&home).await?;
        }
    }
    Ok(())
}

async fn first_contentful_paint(ctx: &mut ScenarioContext<'_>) -> AuditResult<()> {
    let budget = ctx.config.performance.first_contentful_paint_ms;
    let fcp = ctx.page.first_contentful_paint().await?.ok_or_else(|| {
        AuditError::AssertionFailed("Nenhuma entrada de first-contentful-paint foi registrada".to_string())
    })?;

    ensure(fcp < budget, || {
        format!("FCP de {:.0} ms excede o limite de {:.0} ms", fcp, budget)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use test_case::test_case;

    #[test]
    fn test_catalog_names_are_unique() {
        let catalog = Scenario::catalog();
        let names: HashSet<_> = catalog.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), catalog.len());
        assert_eq!(Scenario::accessibility().len(), 20);
        assert_eq!(Scenario::performance().len(), 4);
    }

    #[test_case("audit", 13)]
    #[test_case("structure", 5)]
    #[test_case("keyboard", 4)]
    #[test_case("performance", 4)]
    #[test_case("responsive", 1)]
    #[test_case("visual", 0)]
    fn test_tag_sizes(tag: &str, expected: usize) {
        assert_eq!(Scenario::filter_by_tag(Scenario::catalog(), tag).len(), expected);
    }

    #[test]
    fn test_filter_by_tag() {
        let structure = Scenario::filter_by_tag(Scenario::catalog(), "structure");
        assert!(structure.iter().all(|s| !matches!(s.check, Check::Audit { .. })));
        assert!(structure.iter().any(|s| s.name == "document-structure"));

        let perf = Scenario::filter_by_tag(Scenario::catalog(), "performance");
        assert_eq!(perf.len(), 4);
    }

    #[test]
    fn test_find_scoped_audit() {
        let forms = Scenario::find("forms").unwrap();
        assert_eq!(
            forms.check,
            Check::Audit {
                context: Some("form"),
                rules: &["label", "form-field-multiple-labels", "select-name"],
            }
        );
        assert!(Scenario::find("nope").is_none());
    }

    #[test]
    fn test_load_time_navigates_itself() {
        assert!(!Scenario::find("load-time").unwrap().needs_navigation());
        assert!(Scenario::find("landmarks").unwrap().needs_navigation());
    }

    #[test]
    fn test_browser_free_subset() {
        let offline: Vec<_> = Scenario::catalog()
            .into_iter()
            .filter(|s| !s.requires_browser())
            .map(|s| s.name)
            .collect();
        assert_eq!(
            offline,
            vec![
                "document-structure",
                "heading-hierarchy",
                "keyboard-navigation",
                "reading-order",
                "landmarks",
                "skip-link",
                "tab-order",
            ]
        );
    }
}
