//! Release event classification.
//!
//! Turns the raw event-type header plus body bytes into a typed
//! [`ReleaseNotification`], or decides the event is not actionable. A
//! malformed payload is never a hard error here: the webhook sender must
//! always get its acknowledgment, so parse failures are logged and mapped
//! to `None`.

use serde::Deserialize;
use tracing::{info, warn};

/// Lifecycle action carried by a release event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseAction {
    Created,
    Deleted,
    Edited,
    Prereleased,
    Published,
    Released,
    Unpublished,
    #[serde(other)]
    Other,
}

/// Data extracted from a release webhook payload.
/// Immutable once parsed; lives for a single request.
#[derive(Debug, Clone)]
pub struct ReleaseNotification {
    pub action: ReleaseAction,
    pub tag: String,
    pub target_branch: String,
    pub actor_login: String,
    pub repository_name: String,
}

#[derive(Debug, Deserialize)]
struct ReleaseEventPayload {
    action: ReleaseAction,
    release: ReleasePayload,
    repository: RepositoryPayload,
}

#[derive(Debug, Deserialize)]
struct ReleasePayload {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    target_commitish: Option<String>,
    #[serde(default)]
    author: Option<AuthorPayload>,
}

#[derive(Debug, Deserialize)]
struct AuthorPayload {
    #[serde(default)]
    login: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    #[serde(default)]
    name: Option<String>,
}

/// Classifies an inbound event. Only `release` events produce a
/// notification; every other event type, and any unparseable body, yields
/// `None` with no side effects beyond a log line.
pub fn classify(event_type: Option<&str>, body: &[u8]) -> Option<ReleaseNotification> {
    if event_type != Some("release") {
        info!("Nothing to do for event type {:?}", event_type);
        return None;
    }

    let payload: ReleaseEventPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => {
            warn!("Could not parse release event payload: {}", e);
            return None;
        }
    };

    Some(ReleaseNotification {
        action: payload.action,
        tag: payload.release.tag_name.unwrap_or_default(),
        target_branch: payload.release.target_commitish.unwrap_or_default(),
        actor_login: payload
            .release
            .author
            .and_then(|a| a.login)
            .unwrap_or_default(),
        repository_name: payload.repository.name.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn release_body(action: &str) -> Vec<u8> {
        json!({
            "action": action,
            "release": {
                "tag_name": "1.2.3",
                "target_commitish": "master",
                "author": { "login": "user1" }
            },
            "repository": { "name": "tgithub-repo" }
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn classifies_release_created_event() {
        let n = classify(Some("release"), &release_body("created")).unwrap();
        assert_eq!(n.action, ReleaseAction::Created);
        assert_eq!(n.tag, "1.2.3");
        assert_eq!(n.target_branch, "master");
        assert_eq!(n.actor_login, "user1");
        assert_eq!(n.repository_name, "tgithub-repo");
    }

    #[test]
    fn non_release_event_types_are_not_actionable() {
        assert!(classify(Some("push"), &release_body("created")).is_none());
        assert!(classify(Some("ping"), b"{}").is_none());
        assert!(classify(None, &release_body("created")).is_none());
    }

    #[test]
    fn malformed_body_is_not_actionable() {
        assert!(classify(Some("release"), b"not json at all").is_none());
        assert!(classify(Some("release"), b"{}").is_none());
    }

    #[test]
    fn unknown_action_maps_to_other() {
        let n = classify(Some("release"), &release_body("frobnicated")).unwrap();
        assert_eq!(n.action, ReleaseAction::Other);
    }

    #[test]
    fn missing_optional_fields_default_to_empty() {
        let body = json!({
            "action": "created",
            "release": {},
            "repository": {}
        })
        .to_string();
        let n = classify(Some("release"), body.as_bytes()).unwrap();
        assert_eq!(n.tag, "");
        assert_eq!(n.actor_login, "");
        assert_eq!(n.repository_name, "");
    }
}
