//! GO/NO-GO evaluation for release deployments.
//!
//! The evaluator is pure: it looks at the notification, the roster and the
//! configured production branch, and returns a decision. Logging of the
//! inputs and the outcome happens in the caller, not here.

use crate::event::{ReleaseAction, ReleaseNotification};
use std::collections::HashSet;
use std::fmt;

/// The set of actor logins permitted to trigger a deployment.
///
/// Membership is an exact string match over parsed, trimmed identifiers.
/// A containment check over a joined roster string would accept "user1"
/// as authorizing "user10"; a set lookup cannot.
#[derive(Debug, Clone)]
pub struct AuthorizationRoster {
    members: HashSet<String>,
}

impl AuthorizationRoster {
    /// Builds the roster from configured entries. Entries are trimmed, and
    /// an entry that is itself a comma-joined list is split up.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let members = entries
            .into_iter()
            .flat_map(|e| {
                e.as_ref()
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect::<Vec<_>>()
            })
            .filter(|s| !s.is_empty())
            .collect();
        Self { members }
    }

    pub fn is_authorized(&self, actor_login: &str) -> bool {
        self.members.contains(actor_login)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Outcome of the condition evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Go,
    NoGo(NoGoReason),
}

impl Decision {
    pub fn is_go(&self) -> bool {
        matches!(self, Decision::Go)
    }
}

/// The first condition that failed. Tag deletions never trigger a
/// rollback or redeploy, so anything but `created` is an immediate NO-GO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoGoReason {
    ActionNotCreated,
    EmptyTag,
    NotProductionBranch,
    ActorNotAuthorized,
}

impl fmt::Display for NoGoReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            NoGoReason::ActionNotCreated => "release action is not 'created'",
            NoGoReason::EmptyTag => "release tag is empty",
            NoGoReason::NotProductionBranch => "release does not target the production branch",
            NoGoReason::ActorNotAuthorized => "actor is not authorized to deploy",
        };
        f.write_str(msg)
    }
}

/// Applies the deployment conditions. GO requires all of: the release was
/// created, the tag is non-empty, it targets the production branch, and
/// the actor is on the roster.
pub fn evaluate(
    notification: &ReleaseNotification,
    roster: &AuthorizationRoster,
    production_branch: &str,
) -> Decision {
    if notification.action != ReleaseAction::Created {
        return Decision::NoGo(NoGoReason::ActionNotCreated);
    }
    if notification.tag.is_empty() {
        return Decision::NoGo(NoGoReason::EmptyTag);
    }
    if notification.target_branch != production_branch {
        return Decision::NoGo(NoGoReason::NotProductionBranch);
    }
    if !roster.is_authorized(&notification.actor_login) {
        return Decision::NoGo(NoGoReason::ActorNotAuthorized);
    }
    Decision::Go
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ReleaseAction;

    fn notification() -> ReleaseNotification {
        ReleaseNotification {
            action: ReleaseAction::Created,
            tag: "1.2.3".to_string(),
            target_branch: "master".to_string(),
            actor_login: "user1".to_string(),
            repository_name: "tgithub-repo".to_string(),
        }
    }

    fn roster() -> AuthorizationRoster {
        AuthorizationRoster::from_entries(["user1", "user2"])
    }

    #[test]
    fn valid_created_release_is_go() {
        assert_eq!(evaluate(&notification(), &roster(), "master"), Decision::Go);
    }

    #[test]
    fn non_created_actions_are_no_go() {
        for action in [
            ReleaseAction::Deleted,
            ReleaseAction::Edited,
            ReleaseAction::Prereleased,
            ReleaseAction::Published,
            ReleaseAction::Other,
        ] {
            let mut n = notification();
            n.action = action;
            assert_eq!(
                evaluate(&n, &roster(), "master"),
                Decision::NoGo(NoGoReason::ActionNotCreated)
            );
        }
    }

    #[test]
    fn empty_tag_is_no_go() {
        let mut n = notification();
        n.tag = String::new();
        assert_eq!(
            evaluate(&n, &roster(), "master"),
            Decision::NoGo(NoGoReason::EmptyTag)
        );
    }

    #[test]
    fn non_production_branch_is_no_go() {
        let mut n = notification();
        n.target_branch = "develop".to_string();
        assert_eq!(
            evaluate(&n, &roster(), "master"),
            Decision::NoGo(NoGoReason::NotProductionBranch)
        );
    }

    #[test]
    fn unknown_actor_is_no_go() {
        let mut n = notification();
        n.actor_login = "user99".to_string();
        assert_eq!(
            evaluate(&n, &roster(), "master"),
            Decision::NoGo(NoGoReason::ActorNotAuthorized)
        );
    }

    #[test]
    fn superstring_of_authorized_actor_is_not_authorized() {
        // "user1" is on the roster; "user10" must not ride along.
        let mut n = notification();
        n.actor_login = "user10".to_string();
        assert_eq!(
            evaluate(&n, &roster(), "master"),
            Decision::NoGo(NoGoReason::ActorNotAuthorized)
        );
    }

    #[test]
    fn roster_splits_comma_joined_entries_and_trims() {
        let roster = AuthorizationRoster::from_entries(["user1, user2", " user3 "]);
        assert!(roster.is_authorized("user1"));
        assert!(roster.is_authorized("user2"));
        assert!(roster.is_authorized("user3"));
        assert!(!roster.is_authorized("user"));
        assert_eq!(roster.len(), 3);
    }
}
