//! CLI Status Command
//!
//! Prints the `/health` report of a running server.

use std::time::Duration;

use anyhow::Result;

use crate::terminal_output::{note_error, note_success};

pub async fn run(base_url: &str) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;
    let url = format!("{}/health", base_url.trim_end_matches('/'));

    match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            let body: serde_json::Value = resp.json().await?;
            note_success(&format!("wabot is running at {base_url}"));
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Ok(resp) => {
            note_error(&format!("{url} answered HTTP {}", resp.status()));
        }
        Err(_) => {
            note_error(&format!("wabot is not running at {base_url}"));
        }
    }
    Ok(())
}
