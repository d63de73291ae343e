//! `a11y-audit` binary
//!
//! Exit codes: 0 when every scenario passed, 1 when any failed, 2 when the
//! suite could not run at all.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use a11y_audit::page::Browser;
use a11y_audit::playwright::{BrowserKind, PlaywrightBrowser};
use a11y_audit::target::wait_for_target;
use a11y_audit::{AuditError, AuditResult, AxeEngine, Scenario, StaticBrowser, SuiteConfig, SuiteRunner};

#[derive(Parser, Debug)]
#[command(name = "a11y-audit")]
#[command(about = "Accessibility test suite: axe-core audits, structure, keyboard and performance checks")]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "A11Y_CONFIG")]
    config: Option<PathBuf>,

    /// Page under test (overrides the config file)
    #[arg(short, long, env = "A11Y_BASE_URL")]
    base_url: Option<String>,

    /// Run only scenarios matching this tag
    #[arg(short, long)]
    tag: Option<String>,

    /// Run only a specific scenario by name
    #[arg(short, long)]
    name: Option<String>,

    /// Browser to use (chromium, firefox, webkit)
    #[arg(long)]
    browser: Option<BrowserKind>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Output directory for the report and results
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Check a saved HTML file offline instead of driving a browser
    #[arg(long)]
    html: Option<PathBuf>,

    /// Do not wait for the base URL to respond before starting
    #[arg(long)]
    skip_target_check: bool,

    /// List scenarios and exit
    #[arg(long)]
    list: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let result = tokio::runtime::Runtime::new()
        .map_err(AuditError::from)
        .and_then(|rt| rt.block_on(async_main(args)));

    match result {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

fn load_config(args: &Args) -> AuditResult<SuiteConfig> {
    let mut config = match &args.config {
        Some(path) => SuiteConfig::from_file(path)?,
        None => SuiteConfig::default(),
    };

    if let Some(url) = &args.base_url {
        config.base_url = url.clone();
    }
    if let Some(output) = &args.output {
        config.report_dir = output.clone();
    }
    if let Some(browser) = args.browser {
        config.playwright.browser = browser;
    }
    if args.headed {
        config.playwright.headless = false;
    }

    config.validate()?;
    Ok(config)
}

fn select_scenarios(args: &Args) -> AuditResult<Vec<Scenario>> {
    if let Some(name) = &args.name {
        let scenario = Scenario::find(name)
            .ok_or_else(|| AuditError::Config(format!("Scenario not found: {}", name)))?;
        return Ok(vec![scenario]);
    }

    let catalog = Scenario::catalog();
    Ok(match &args.tag {
        Some(tag) => Scenario::filter_by_tag(catalog, tag),
        None => catalog,
    })
}

async fn async_main(args: Args) -> AuditResult<bool> {
    let config = load_config(&args)?;
    let mut scenarios = select_scenarios(&args)?;

    if args.list {
        for scenario in &scenarios {
            println!("{:<28} [{}] {}", scenario.name, scenario.tags.join(","), scenario.title);
        }
        return Ok(true);
    }

    let browser: Arc<dyn Browser> = match &args.html {
        Some(path) => {
            let before = scenarios.len();
            scenarios.retain(|s| !s.requires_browser());
            if scenarios.len() < before {
                warn!(
                    "Offline mode: skipping {} scenario(s) that need a browser",
                    before - scenarios.len()
                );
            }
            info!("Checking {} offline", path.display());
            Arc::new(StaticBrowser::from_file(path)?)
        }
        None => {
            if !args.skip_target_check {
                wait_for_target(&config.base_url, Duration::from_secs(config.target_timeout_secs)).await?;
            }
            Arc::new(PlaywrightBrowser::launch(config.playwright.clone()).await?)
        }
    };

    let engine = Arc::new(AxeEngine::new(config.axe_source.clone()));
    let runner = SuiteRunner::new(config, browser, engine);

    let outcome = runner.run(&scenarios).await;
    if let Err(e) = runner.shutdown().await {
        warn!("Browser shutdown failed: {}", e);
    }
    let results = outcome?;

    info!("Report: {}", results.report_path.display());
    Ok(results.success())
}
