//! Event Relay: one best-effort notification attempt per git lifecycle event.
//!
//! The relay never retries, never queues, and never deduplicates. A failed
//! delivery is lost on purpose: the notification is advisory, and the tracker
//! endpoint is expected to support manual reconciliation for anything missed.
//! What the relay does guarantee is that it decides eligibility before
//! touching the network, performs at most one bounded HTTP attempt, and
//! reports the outcome as a value instead of an exit status.

use serde::Serialize;

use crate::branch::{BranchContext, Ineligibility};
use crate::config::RelayConfig;
use crate::errors::DeliveryError;
use crate::extract::find_issue_key;

/// Which git lifecycle point invoked the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitAction {
    Commit,
    Push,
}

impl GitAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            GitAction::Commit => "commit",
            GitAction::Push => "push",
        }
    }
}

impl std::fmt::Display for GitAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification for one git action on one branch. Constructed per
/// invocation and consumed exactly once by the delivery step.
#[derive(Debug, Clone)]
pub struct LifecycleEvent {
    pub branch_name: String,
    pub action: GitAction,
    pub issue_key: String,
}

/// Wire shape of the notification body.
#[derive(Serialize)]
struct EventPayload<'a> {
    branch_name: &'a str,
    git_action: &'a str,
}

/// Terminal state of one relay invocation. Every variant maps to a successful
/// process exit; only the reported message differs.
#[derive(Debug)]
pub enum RelayOutcome {
    /// Detached HEAD, merge, or rebase: "current branch" is not meaningful.
    SkippedIneligible(Ineligibility),
    /// The branch name carries no issue key. Normal, silent outcome.
    SkippedNoKey { branch_name: String },
    /// The tracker acknowledged the notification with HTTP 200.
    Delivered { event: LifecycleEvent },
    /// The single delivery attempt failed; the notification is lost.
    DeliveryFailed {
        event: LifecycleEvent,
        error: DeliveryError,
    },
}

impl RelayOutcome {
    /// Whether a network attempt was made at all.
    pub fn attempted_delivery(&self) -> bool {
        matches!(
            self,
            RelayOutcome::Delivered { .. } | RelayOutcome::DeliveryFailed { .. }
        )
    }
}

/// Run one relay invocation: eligibility check, key extraction, then at most
/// one delivery attempt. Infallible by design; every failure mode is folded
/// into the returned outcome.
pub async fn run(config: &RelayConfig, action: GitAction, context: &BranchContext) -> RelayOutcome {
    if let Some(reason) = context.ineligibility() {
        tracing::debug!(branch = %context.branch_name, %reason, "skipping notification");
        return RelayOutcome::SkippedIneligible(reason);
    }

    let Some(found) = find_issue_key(&context.branch_name, config.extraction_prefix()) else {
        tracing::debug!(branch = %context.branch_name, "no issue key in branch");
        return RelayOutcome::SkippedNoKey {
            branch_name: context.branch_name.clone(),
        };
    };
    tracing::debug!(branch = %context.branch_name, key = %found.key, "extracted issue key");

    let event = LifecycleEvent {
        branch_name: context.branch_name.clone(),
        action,
        issue_key: found.key,
    };

    match deliver(config, &event).await {
        Ok(_body) => RelayOutcome::Delivered { event },
        Err(error) => RelayOutcome::DeliveryFailed { event, error },
    }
}

/// Perform the single HTTP delivery attempt. Exactly HTTP 200 counts as
/// success; any other status or a transport failure is a `DeliveryError`.
async fn deliver(config: &RelayConfig, event: &LifecycleEvent) -> Result<String, DeliveryError> {
    let mut builder = reqwest::Client::builder();
    if config.enforce_timeout {
        builder = builder
            .connect_timeout(config.connect_timeout)
            .timeout(config.total_timeout);
    }
    let client = builder.build()?;

    let url = format!("{}/git-hooks/update-from-branch", config.api_base_url);
    let response = client
        .post(&url)
        .json(&EventPayload {
            branch_name: &event.branch_name,
            git_action: event.action.as_str(),
        })
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if status == reqwest::StatusCode::OK {
        Ok(body)
    } else {
        Err(DeliveryError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
