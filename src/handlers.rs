//! Entry Controller.
//!
//! Two branches per request: GET is a liveness probe and answers
//! immediately; anything else is webhook processing. Whatever happens
//! inside — GO, NO-GO, unparseable payload, unrecognized event type,
//! dispatch failure — the transport-level answer is the same fixed 200
//! "OK" acknowledgment. The upstream sender only learns that the event
//! was received; deployment outcome is visible in logs and on the
//! messaging channel. This keeps the webhook source from retrying a
//! deployment trigger on its own schedule.

use crate::SharedState;
use crate::dispatch::{DispatchTarget, dispatch};
use crate::event::classify;
use crate::notify::deployment_message;
use crate::policy::{Decision, evaluate};
use crate::signature::verify_signature;
use axum::{
    Router,
    body::Bytes,
    extract::State as AxumState,
    http::{HeaderMap, HeaderName, Method, StatusCode, header},
    routing,
};
use tracing::{error, info, warn};

/// The fixed response every inbound call receives.
pub type Acknowledgment = (StatusCode, [(HeaderName, &'static str); 1], &'static str);

fn acknowledge() -> Acknowledgment {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        "OK",
    )
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", routing::any(handle_event))
        .route("/webhook", routing::any(handle_event))
        .with_state(state)
}

/// Handles every inbound request: liveness probes and webhooks alike.
pub async fn handle_event(
    AxumState(state): AxumState<SharedState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Acknowledgment {
    info!("This request is a {} request", method);
    if method == Method::GET {
        info!("Status: 200 OK");
        return acknowledge();
    }

    if state.config.needs_webhook_secret() {
        let signature = headers
            .get("X-Hub-Signature-256")
            .and_then(|v| v.to_str().ok());
        let secret = state.config.webhook_secret.as_deref().unwrap_or_default();
        match signature {
            Some(signature) if verify_signature(secret, &body, signature) => {}
            Some(_) => {
                warn!("Webhook signature verification failed; dropping event");
                return acknowledge();
            }
            None => {
                warn!("Webhook secret configured but no signature header supplied");
                return acknowledge();
            }
        }
    }

    let event_type = headers.get("X-GitHub-Event").and_then(|v| v.to_str().ok());
    let Some(notification) = classify(event_type, &body) else {
        return acknowledge();
    };

    info!(
        "Release is {:?}, tag is '{}', created by '{}' on '{}' targeting '{}'",
        notification.action,
        notification.tag,
        notification.actor_login,
        notification.repository_name,
        notification.target_branch,
    );

    let decision = evaluate(
        &notification,
        &state.roster,
        &state.config.production_branch,
    );
    if let Decision::NoGo(reason) = decision {
        info!("Not deploying: {}", reason);
        return acknowledge();
    }

    let Some(template) = state.router.lookup(&notification.repository_name) else {
        warn!(
            "No job route for repository '{}', skipping deployment",
            notification.repository_name
        );
        return acknowledge();
    };

    info!(
        "{}:v{} deployment triggered by {}",
        notification.repository_name, notification.tag, notification.actor_login
    );

    let target = DispatchTarget::new(&state.credentials.build, template, &notification.tag);
    info!("Dispatching to {}", target);

    let message = match dispatch(&state.http, &target).await {
        Ok(status) => {
            info!("Successfully triggered build job (status {})", status);
            deployment_message(&notification.repository_name, &notification.tag)
        }
        Err(e) => {
            error!("Build trigger failed: {}", e);
            format!(
                ":lambda::jenkins: deployment {}:v{} FAILED: {}",
                notification.repository_name, notification.tag, e
            )
        }
    };

    // Best effort; a lost notification never fails the request.
    if let Err(e) = state.notifier.send(&message).await {
        error!("Could not send notification: {}", e);
    }

    info!("Completed.");
    acknowledge()
}
