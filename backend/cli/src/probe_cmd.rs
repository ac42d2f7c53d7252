//! CLI Probe Command
//!
//! Smoke-tests a running server the way the platform would talk to it:
//! `/health`, the subscription handshake with the configured verify token,
//! and a sample inbound "hello" text event. The sample event makes the server
//! queue a reply to a test number, so run it against dry-run servers or accept
//! one failed send in the delivery log.

use std::time::Duration;

use anyhow::{bail, Result};
use serde_json::{json, Value};
use uuid::Uuid;
use wabot_config::WabotConfig;

use crate::terminal_output::{check_line, note_info, supports_color};

/// Sender of the sample event.
pub const PROBE_FROM: &str = "15551234567";
pub const PROBE_PHONE_NUMBER_ID: &str = "631189900086971";

#[derive(Debug)]
pub struct CheckResult {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            detail: detail.into(),
        }
    }
}

pub async fn run(base_url: &str, config: &WabotConfig) -> Result<()> {
    note_info(&format!("Probing {base_url}"));
    let results = run_checks(
        base_url,
        config.webhook_path(),
        config.verify_token().filter(|t| !t.is_empty()),
    )
    .await?;

    let color = supports_color();
    for r in &results {
        println!("{}", check_line(r.name, r.passed, &r.detail, color));
    }

    let failed = results.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        bail!("{failed} of {} checks failed", results.len());
    }
    println!("\nAll {} checks passed.", results.len());
    Ok(())
}

pub async fn run_checks(
    base_url: &str,
    webhook_path: &str,
    verify_token: Option<&str>,
) -> Result<Vec<CheckResult>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;
    let base = base_url.trim_end_matches('/');
    let webhook_url = format!("{base}{webhook_path}");

    Ok(vec![
        check_health(&client, base).await,
        check_verification(&client, &webhook_url, verify_token).await,
        check_sample_event(&client, &webhook_url).await,
    ])
}

async fn check_health(client: &reqwest::Client, base: &str) -> CheckResult {
    const NAME: &str = "health";
    let resp = match client.get(format!("{base}/health")).send().await {
        Ok(r) => r,
        Err(e) => return CheckResult::fail(NAME, format!("unreachable: {e}")),
    };
    let status = resp.status();
    match resp.json::<Value>().await {
        Ok(body) if status.is_success() && body["status"] == "OK" => {
            CheckResult::pass(NAME, format!("{status}"))
        }
        Ok(body) => CheckResult::fail(NAME, format!("{status} {body}")),
        Err(e) => CheckResult::fail(NAME, format!("{status}, unreadable body: {e}")),
    }
}

async fn check_verification(
    client: &reqwest::Client,
    webhook_url: &str,
    verify_token: Option<&str>,
) -> CheckResult {
    const NAME: &str = "verification";
    let Some(token) = verify_token else {
        return CheckResult::fail(NAME, "VERIFY_TOKEN is not set locally; cannot run handshake");
    };
    let challenge = format!("probe-{}", Uuid::new_v4().simple());
    let resp = client
        .get(webhook_url)
        .query(&[
            ("hub.mode", "subscribe"),
            ("hub.verify_token", token),
            ("hub.challenge", challenge.as_str()),
        ])
        .send()
        .await;
    let resp = match resp {
        Ok(r) => r,
        Err(e) => return CheckResult::fail(NAME, format!("unreachable: {e}")),
    };
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    if status.is_success() && body == challenge {
        CheckResult::pass(NAME, "challenge echoed")
    } else {
        CheckResult::fail(NAME, format!("{status} {body}"))
    }
}

async fn check_sample_event(client: &reqwest::Client, webhook_url: &str) -> CheckResult {
    const NAME: &str = "sample event";
    let resp = match client.post(webhook_url).json(&sample_event()).send().await {
        Ok(r) => r,
        Err(e) => return CheckResult::fail(NAME, format!("unreachable: {e}")),
    };
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    if status.is_success() && body == "EVENT_RECEIVED" {
        CheckResult::pass(NAME, "acknowledged")
    } else {
        CheckResult::fail(NAME, format!("{status} {body}"))
    }
}

/// A text "hello" from [`PROBE_FROM`], shaped like a real Cloud API callback.
pub fn sample_event() -> Value {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "1124406299724354",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "metadata": {
                        "display_phone_number": "15550000000",
                        "phone_number_id": PROBE_PHONE_NUMBER_ID
                    },
                    "messages": [{
                        "from": PROBE_FROM,
                        "id": format!("wamid.probe{}", Uuid::new_v4().simple()),
                        "timestamp": chrono::Utc::now().timestamp().to_string(),
                        "type": "text",
                        "text": { "body": "hello" }
                    }]
                }
            }]
        }]
    })
}
