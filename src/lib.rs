pub mod dispatch;
pub mod error;
pub mod event;
pub mod handlers;
pub mod notify;
pub mod policy;
pub mod routes;
pub mod secrets;
pub mod signature;

use crate::notify::Notifier;
use crate::policy::AuthorizationRoster;
use crate::routes::JobRouter;
use crate::secrets::Credentials;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    /// The single branch a release must target to be deployable.
    pub production_branch: String,
    /// Actor logins allowed to trigger production deployments.
    pub authorized_users: Vec<String>,
    /// Optional shared secret for webhook signature verification.
    pub webhook_secret: Option<String>,
    #[serde(default)]
    pub job: Vec<JobConfig>,
}

/// One repository → build-job mapping. Repositories without an entry
/// never trigger anything.
#[derive(Debug, Deserialize, Clone)]
pub struct JobConfig {
    pub repo: String,
    pub template: String,
}

impl RelayConfig {
    /// Returns true if webhook signature validation should be enforced.
    pub fn needs_webhook_secret(&self) -> bool {
        self.webhook_secret
            .as_ref()
            .map(|s| !s.is_empty())
            .unwrap_or(false)
    }
}

pub struct AppState {
    pub config: RelayConfig,
    pub roster: AuthorizationRoster,
    pub router: JobRouter,
    pub credentials: Credentials,
    pub notifier: Notifier,
    pub http: reqwest::Client,
}

pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_relay_config_toml() {
        let config: RelayConfig = toml::from_str(
            r#"
            production_branch = "master"
            authorized_users = ["user1", "user2"]

            [[job]]
            repo = "tgithub-repo"
            template = "/job/git-tag/buildWithParameters?token=yesme&release_tag="
            "#,
        )
        .unwrap();

        assert_eq!(config.production_branch, "master");
        assert_eq!(config.authorized_users, vec!["user1", "user2"]);
        assert!(!config.needs_webhook_secret());
        assert_eq!(config.job.len(), 1);
        assert_eq!(config.job[0].repo, "tgithub-repo");
    }

    #[test]
    fn webhook_secret_must_be_non_empty_to_count() {
        let config: RelayConfig = toml::from_str(
            r#"
            production_branch = "master"
            authorized_users = []
            webhook_secret = ""
            "#,
        )
        .unwrap();
        assert!(!config.needs_webhook_secret());
    }
}
