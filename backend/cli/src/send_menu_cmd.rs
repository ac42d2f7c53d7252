//! CLI Send-Menu Command
//!
//! Sends the three-button quick-reply menu through the Graph API.

use anyhow::{bail, Context, Result};
use logging::mask_phone_number;
use wabot_channels::{GraphApiConfig, GraphApiSender};
use wabot_config::WabotConfig;

use crate::terminal_output::note_success;

pub async fn run(config: &WabotConfig, to: &str) -> Result<()> {
    let to = normalize_recipient(to)?;
    let (Some(token), Some(phone_number_id)) = (
        config.access_token().filter(|t| !t.is_empty()),
        config.phone_number_id().filter(|p| !p.is_empty()),
    ) else {
        bail!("WHATSAPP_TOKEN and PHONE_NUMBER_ID must be set to send the menu");
    };

    let sender = GraphApiSender::new(GraphApiConfig {
        api_base: config.api_base().to_string(),
        api_version: config.api_version().to_string(),
        access_token: token.to_string(),
        timeout: config.send_timeout(),
    })?;

    let receipt = sender
        .send_button_menu(&to, phone_number_id)
        .await
        .context("Failed to send the button menu")?;

    note_success(&format!(
        "Menu sent to {} (message id: {})",
        mask_phone_number(&to),
        receipt.message_id.as_deref().unwrap_or("unknown")
    ));
    Ok(())
}

/// WhatsApp ids are the digits of the E.164 number; accept `+`, spaces and dashes.
fn normalize_recipient(raw: &str) -> Result<String> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, '+' | ' ' | '-' | '(' | ')'))
        .collect();
    if digits.len() < 8 || !digits.chars().all(|c| c.is_ascii_digit()) {
        bail!("'{raw}' is not a phone number");
    }
    Ok(digits)
}
