use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Simulated gateway message id recorded for dry-run attempts.
pub const DRY_RUN_MESSAGE_ID: &str = "dry-run-id";

/// A validated recipient ready for dispatch.
///
/// Produced by the recipient source with the phone already normalized to
/// E.164; immutable from that point on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: i64,
    pub phone: String,
}

/// Status recorded in the audit store for a message attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum MessageStatus {
    Success,
    Error,
    Pending,
    DryRun,
}

impl std::fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageStatus::Success => write!(f, "success"),
            MessageStatus::Error => write!(f, "error"),
            MessageStatus::Pending => write!(f, "pending"),
            MessageStatus::DryRun => write!(f, "dry-run"),
        }
    }
}

/// Terminal result of attempting delivery to one recipient within one run.
///
/// Exactly one outcome is produced per recipient per run; no further retry
/// will occur once an outcome exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendOutcome {
    /// The gateway accepted the message (delivery group id 1).
    Sent { message_id: Option<String> },
    /// The gateway refused the message; not retryable.
    Rejected { reason: String },
    /// Rate limited and the backoff budget is exhausted.
    RateLimited,
    /// Network-level failure after all retries.
    TransportFailure { detail: String },
    /// Simulated send; no network call was made.
    DryRun,
}

impl SendOutcome {
    /// Audit-store status tag for this outcome.
    pub fn status(&self) -> MessageStatus {
        match self {
            SendOutcome::Sent { .. } => MessageStatus::Success,
            SendOutcome::DryRun => MessageStatus::DryRun,
            SendOutcome::Rejected { .. }
            | SendOutcome::RateLimited
            | SendOutcome::TransportFailure { .. } => MessageStatus::Error,
        }
    }

    /// Whether this outcome counts toward the run's success tally.
    pub fn is_success(&self) -> bool {
        matches!(self, SendOutcome::Sent { .. } | SendOutcome::DryRun)
    }

    /// Gateway message id to record, if any.
    pub fn message_id(&self) -> Option<&str> {
        match self {
            SendOutcome::Sent { message_id } => message_id.as_deref(),
            SendOutcome::DryRun => Some(DRY_RUN_MESSAGE_ID),
            _ => None,
        }
    }
}

impl std::fmt::Display for SendOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendOutcome::Sent { .. } => write!(f, "sent"),
            SendOutcome::Rejected { reason } => write!(f, "rejected: {}", reason),
            SendOutcome::RateLimited => write!(f, "rate limit exceeded"),
            SendOutcome::TransportFailure { detail } => write!(f, "transport failure: {}", detail),
            SendOutcome::DryRun => write!(f, "dry run"),
        }
    }
}

/// A terminal outcome together with the raw gateway response for auditing.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub outcome: SendOutcome,
    /// Raw gateway response body (or error detail) as received; `None` when
    /// the gateway was never reached.
    pub raw_response: Option<String>,
}

/// A persisted audit row for one send attempt.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRecord {
    pub id: i64,
    pub recipient_id: i64,
    pub phone: String,
    pub body: String,
    pub status: MessageStatus,
    pub response: Option<String>,
    pub gateway_message_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Counters for one dispatch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchTally {
    pub success: u32,
    pub failure: u32,
}

impl DispatchTally {
    pub fn record(&mut self, outcome: &SendOutcome) {
        if outcome.is_success() {
            self.success += 1;
        } else {
            self.failure += 1;
        }
    }

    pub fn total(&self) -> u32 {
        self.success + self.failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_status_mapping() {
        let sent = SendOutcome::Sent {
            message_id: Some("abc".to_string()),
        };
        assert_eq!(sent.status(), MessageStatus::Success);
        assert_eq!(
            SendOutcome::Rejected {
                reason: "no".to_string()
            }
            .status(),
            MessageStatus::Error
        );
        assert_eq!(SendOutcome::RateLimited.status(), MessageStatus::Error);
        assert_eq!(
            SendOutcome::TransportFailure {
                detail: "timeout".to_string()
            }
            .status(),
            MessageStatus::Error
        );
        assert_eq!(SendOutcome::DryRun.status(), MessageStatus::DryRun);
    }

    #[test]
    fn test_status_display_matches_schema_tags() {
        assert_eq!(MessageStatus::Success.to_string(), "success");
        assert_eq!(MessageStatus::Error.to_string(), "error");
        assert_eq!(MessageStatus::Pending.to_string(), "pending");
        assert_eq!(MessageStatus::DryRun.to_string(), "dry-run");
    }

    #[test]
    fn test_dry_run_message_id() {
        assert_eq!(SendOutcome::DryRun.message_id(), Some(DRY_RUN_MESSAGE_ID));
        assert_eq!(SendOutcome::RateLimited.message_id(), None);
    }

    #[test]
    fn test_tally_record() {
        let mut tally = DispatchTally::default();
        tally.record(&SendOutcome::Sent { message_id: None });
        tally.record(&SendOutcome::DryRun);
        tally.record(&SendOutcome::RateLimited);
        assert_eq!(tally.success, 2);
        assert_eq!(tally.failure, 1);
        assert_eq!(tally.total(), 3);
    }
}
