//! Playwright browser automation
//!
//! Playwright has no Rust bindings, so a small Node.js driver (`driver.js`)
//! is spawned once per suite and driven over stdin/stdout with one JSON
//! request and one JSON response per line.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as TokioCommand};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{AuditError, AuditResult};
use crate::page::{Browser, ElementInfo, Page, Viewport};

const DRIVER_SCRIPT: &str = include_str!("driver.js");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

impl FromStr for BrowserKind {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chromium" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" => Ok(BrowserKind::Webkit),
            other => Err(AuditError::Config(format!("unknown browser: {}", other))),
        }
    }
}

/// Configuration for Playwright
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaywrightConfig {
    pub browser: BrowserKind,
    pub headless: bool,

    /// `node_modules` directory providing `playwright`
    pub node_modules: PathBuf,

    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Default timeout for every Playwright action
    pub action_timeout_ms: u64,

    /// How long to wait for a paint entry before reporting none
    pub paint_wait_ms: u64,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            browser: BrowserKind::Chromium,
            headless: true,
            node_modules: PathBuf::from("node_modules"),
            viewport_width: 1280,
            viewport_height: 720,
            action_timeout_ms: 30_000,
            paint_wait_ms: 5_000,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DriverResponse {
    id: u64,
    ok: bool,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    error: Option<String>,
}

struct DriverIo {
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

/// The running Node.js driver process
struct Driver {
    child: std::sync::Mutex<Child>,
    io: Mutex<DriverIo>,
    next_id: AtomicU64,
    // keeps driver.js on disk for the lifetime of the process
    _script_dir: tempfile::TempDir,
}

impl Driver {
    async fn spawn(config: &PlaywrightConfig) -> AuditResult<Self> {
        check_node_installed()?;

        let script_dir = tempfile::tempdir()?;
        let script_path = script_dir.path().join("driver.js");
        std::fs::write(&script_path, DRIVER_SCRIPT)?;

        let node_path = std::fs::canonicalize(&config.node_modules)
            .unwrap_or_else(|_| config.node_modules.clone());

        debug!("Spawning Playwright driver: {}", script_path.display());

        let mut child = TokioCommand::new("node")
            .arg(&script_path)
            .env("NODE_PATH", &node_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AuditError::Playwright(format!("failed to spawn node: {}", e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| AuditError::Playwright("driver stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AuditError::Playwright("driver stdout unavailable".to_string()))?;

        Ok(Self {
            child: std::sync::Mutex::new(child),
            io: Mutex::new(DriverIo {
                stdin,
                stdout: BufReader::new(stdout).lines(),
            }),
            next_id: AtomicU64::new(1),
            _script_dir: script_dir,
        })
    }

    /// Send one request and wait for its response
    async fn request(&self, op: &str, mut params: Value) -> AuditResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Value::Object(map) = &mut params {
            map.insert("id".to_string(), json!(id));
            map.insert("op".to_string(), json!(op));
        }

        let mut io = self.io.lock().await;
        let mut line = params.to_string();
        line.push('\n');
        io.stdin.write_all(line.as_bytes()).await?;
        io.stdin.flush().await?;

        loop {
            let Some(line) = io.stdout.next_line().await? else {
                return Err(AuditError::Playwright(format!("driver exited during '{}'", op)));
            };

            let response: DriverResponse = match serde_json::from_str(&line) {
                Ok(r) => r,
                Err(_) => {
                    // stray output from a page script or library
                    debug!("driver: {}", line);
                    continue;
                }
            };

            if response.id != id {
                warn!("Discarding response {} while waiting for {}", response.id, id);
                continue;
            }

            return if response.ok {
                Ok(response.value)
            } else {
                Err(AuditError::Playwright(
                    response.error.unwrap_or_else(|| format!("'{}' failed", op)),
                ))
            };
        }
    }

    fn terminate(&self) {
        let Ok(mut child) = self.child.lock() else {
            return;
        };

        // SIGTERM first, then kill
        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            if let Some(raw) = child.id() {
                let _ = kill(Pid::from_raw(raw as i32), Signal::SIGTERM);
            }
        }

        let _ = child.start_kill();
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// Check that Node.js is available
fn check_node_installed() -> AuditResult<()> {
    let status = Command::new("node")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) if status.success() => Ok(()),
        _ => Err(AuditError::PlaywrightNotFound),
    }
}

/// A launched browser; every [`Browser::new_page`] gets a fresh context
pub struct PlaywrightBrowser {
    driver: Arc<Driver>,
    config: PlaywrightConfig,
}

impl PlaywrightBrowser {
    pub async fn launch(config: PlaywrightConfig) -> AuditResult<Self> {
        let driver = Driver::spawn(&config).await?;

        driver
            .request(
                "launch",
                json!({ "browser": config.browser.as_str(), "headless": config.headless }),
            )
            .await
            .map_err(|e| match e {
                // driver.js dies at require('playwright') when the package is missing
                AuditError::Io(_) => AuditError::PlaywrightNotFound,
                AuditError::Playwright(msg) if msg.starts_with("driver exited") => {
                    AuditError::PlaywrightNotFound
                }
                other => other,
            })?;

        info!("Launched {} (headless: {})", config.browser.as_str(), config.headless);

        Ok(Self {
            driver: Arc::new(driver),
            config,
        })
    }
}

#[async_trait]
impl Browser for PlaywrightBrowser {
    async fn new_page(&self) -> AuditResult<Box<dyn Page>> {
        let value = self
            .driver
            .request(
                "new_page",
                json!({
                    "viewport": {
                        "width": self.config.viewport_width,
                        "height": self.config.viewport_height,
                    },
                    "timeout_ms": self.config.action_timeout_ms,
                }),
            )
            .await?;

        let page_id = value
            .as_u64()
            .ok_or_else(|| AuditError::Playwright(format!("unexpected page id: {}", value)))?;

        Ok(Box::new(PlaywrightPage {
            driver: Arc::clone(&self.driver),
            page_id,
            paint_wait_ms: self.config.paint_wait_ms,
        }))
    }

    async fn shutdown(&self) -> AuditResult<()> {
        self.driver.request("shutdown", json!({})).await?;
        info!("Browser closed");
        Ok(())
    }
}

/// One page in its own browser context
pub struct PlaywrightPage {
    driver: Arc<Driver>,
    page_id: u64,
    paint_wait_ms: u64,
}

impl PlaywrightPage {
    async fn call(&self, op: &str, mut params: Value) -> AuditResult<Value> {
        if let Value::Object(map) = &mut params {
            map.insert("page".to_string(), json!(self.page_id));
        }
        self.driver.request(op, params).await
    }
}

#[async_trait]
impl Page for PlaywrightPage {
    async fn goto(&mut self, url: &str) -> AuditResult<()> {
        self.call("goto", json!({ "url": url })).await?;
        Ok(())
    }

    async fn current_url(&mut self) -> AuditResult<String> {
        Ok(serde_json::from_value(self.call("url", json!({})).await?)?)
    }

    async fn title(&mut self) -> AuditResult<String> {
        Ok(serde_json::from_value(self.call("title", json!({})).await?)?)
    }

    async fn attribute(&mut self, selector: &str, name: &str) -> AuditResult<Option<String>> {
        let value = self
            .call("attribute", json!({ "selector": selector, "name": name }))
            .await
            .map_err(|e| match e {
                AuditError::Playwright(msg) if msg.contains("No element matches selector") => {
                    AuditError::ElementNotFound(selector.to_string())
                }
                other => other,
            })?;
        Ok(serde_json::from_value(value)?)
    }

    async fn query_all(&mut self, selector: &str) -> AuditResult<Vec<ElementInfo>> {
        Ok(serde_json::from_value(
            self.call("query_all", json!({ "selector": selector })).await?,
        )?)
    }

    async fn press(&mut self, key: &str) -> AuditResult<()> {
        self.call("press", json!({ "key": key })).await?;
        Ok(())
    }

    async fn active_element(&mut self) -> AuditResult<Option<ElementInfo>> {
        Ok(serde_json::from_value(self.call("active_element", json!({})).await?)?)
    }

    async fn focus(&mut self, selector: &str, index: usize) -> AuditResult<()> {
        self.call("focus", json!({ "selector": selector, "index": index })).await?;
        Ok(())
    }

    async fn click(&mut self, selector: &str, index: usize) -> AuditResult<()> {
        self.call("click", json!({ "selector": selector, "index": index })).await?;
        Ok(())
    }

    async fn set_viewport(&mut self, viewport: Viewport) -> AuditResult<()> {
        self.call(
            "set_viewport",
            json!({ "width": viewport.width, "height": viewport.height }),
        )
        .await?;
        Ok(())
    }

    async fn first_contentful_paint(&mut self) -> AuditResult<Option<f64>> {
        let value = self
            .call("first_contentful_paint", json!({ "wait_ms": self.paint_wait_ms }))
            .await?;
        Ok(value.as_f64())
    }

    async fn evaluate(&mut self, expression: &str) -> AuditResult<Value> {
        self.call("evaluate", json!({ "expression": expression })).await
    }

    async fn add_script(&mut self, source: &str) -> AuditResult<()> {
        self.call("add_script", json!({ "source": source })).await?;
        Ok(())
    }

    async fn close(&mut self) -> AuditResult<()> {
        self.call("close_page", json!({})).await?;
        Ok(())
    }
}
