//! Slack announcement of deployment actions.
//!
//! Notification is observability, not control flow: the caller logs a
//! send failure and moves on. The only configuration error surfaced as a
//! value is an empty token, which distinguishes a misconfigured notifier
//! from the fatal startup-credential case.

use crate::error::{RelayError, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

const SLACK_API_BASE: &str = "https://slack.com/api";
const BOT_NAME: &str = "jenkins";

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Notifier {
    client: reqwest::Client,
    token: String,
    channel: String,
    api_base: String,
}

impl Notifier {
    pub fn new(client: reqwest::Client, token: &str, channel: &str) -> Self {
        Self::with_api_base(client, token, channel, SLACK_API_BASE)
    }

    /// Test seam; production uses [`Notifier::new`].
    pub fn with_api_base(
        client: reqwest::Client,
        token: &str,
        channel: &str,
        api_base: &str,
    ) -> Self {
        Self {
            client,
            token: token.to_string(),
            channel: channel.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Posts a one-line message to the configured channel under the bot
    /// identity. Requires a non-empty token.
    pub async fn send(&self, message: &str) -> Result<()> {
        if self.token.is_empty() {
            return Err(RelayError::MissingSlackToken);
        }

        let response = self
            .client
            .post(format!("{}/chat.postMessage", self.api_base))
            .bearer_auth(&self.token)
            .json(&json!({
                "channel": self.channel,
                "text": message,
                "username": BOT_NAME,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::NotifyFailed(format!(
                "chat.postMessage returned status {}",
                status
            )));
        }

        // Slack reports API-level failure in-band with a 200.
        let body: PostMessageResponse = response.json().await?;
        if !body.ok {
            let reason = body.error.unwrap_or_else(|| "unknown error".to_string());
            error!("Slack rejected message: {}", reason);
            return Err(RelayError::NotifyFailed(reason));
        }

        Ok(())
    }
}

/// The one-line announcement for a triggered deployment.
pub fn deployment_message(repository_name: &str, tag: &str) -> String {
    format!(
        ":lambda::jenkins: deployment {}:v{} triggered.",
        repository_name, tag
    )
}
