//! Readiness probe for the page under test

use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{AuditError, AuditResult};

/// Poll `url` until it answers with a success or redirect status
pub async fn wait_for_target(url: &str, timeout_duration: Duration) -> AuditResult<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()?;

    let start = Instant::now();
    let mut attempts = 0;

    while start.elapsed() < timeout_duration {
        attempts += 1;

        match client.get(url).send().await {
            Ok(resp) if resp.status().is_success() || resp.status().is_redirection() => {
                info!("Target is up at {}", url);
                return Ok(());
            }
            Ok(resp) => {
                warn!("Target returned {}", resp.status());
            }
            Err(e) => {
                if attempts == 1 {
                    info!("Waiting for {} to respond...", url);
                }
                // refused connections are expected while the app boots
                if !e.is_connect() {
                    warn!("Target check error: {}", e);
                }
            }
        }

        sleep(Duration::from_millis(250)).await;
    }

    Err(AuditError::TargetUnreachable {
        url: url.to_string(),
        attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_target_times_out() {
        // port 9 (discard) on localhost is closed on any sane test machine
        let err = wait_for_target("http://127.0.0.1:9/", Duration::from_millis(300))
            .await
            .unwrap_err();
        match err {
            AuditError::TargetUnreachable { url, attempts } => {
                assert_eq!(url, "http://127.0.0.1:9/");
                assert!(attempts >= 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
