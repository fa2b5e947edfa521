//! Retry/backoff controller.
//!
//! Wraps a [`Transport`] and converts raw gateway responses into one terminal
//! [`SendOutcome`] per recipient:
//! - 200 with delivery group 1 → `Sent`; any other group → `Rejected` (no retry)
//! - 429 with `Retry-After` → bounded wait and retry; otherwise `RateLimited`
//! - other HTTP statuses → `Rejected` via the static reason table (no retry)
//! - transport failures → exponential backoff, then `TransportFailure`

use std::time::Duration;

use courier_common::types::{Delivery, Recipient, SendOutcome};
use courier_gateway::client::{RawResponse, Transport};
use courier_gateway::status::reason_for_status;
use courier_gateway::wire::SendResponse;

/// Ceiling on a single rate-limit wait, in seconds, regardless of what the
/// gateway's `Retry-After` requests.
pub const MAX_RETRY_WAIT: u64 = 60;

/// Raw response recorded for simulated sends.
const SIMULATED_RESPONSE: &str = "Simulated dry run response";

/// Bounded-retry policy for one recipient.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt budget, including the first attempt.
    pub max_retries: u32,
    /// Backoff unit for transport failures; attempt n waits `base_delay * 2^n`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Delivers one message per call, retrying only retryable failure classes.
pub struct MessageSender<T: Transport> {
    transport: T,
    policy: RetryPolicy,
    dry_run: bool,
}

impl<T: Transport> MessageSender<T> {
    pub fn new(transport: T, policy: RetryPolicy, dry_run: bool) -> Self {
        Self {
            transport,
            policy,
            dry_run,
        }
    }

    /// Attempt delivery to one recipient and return the terminal outcome.
    ///
    /// Blocks (asynchronously) for backoff waits. Performs no I/O beyond the
    /// transport calls; in dry-run mode the transport is never touched.
    pub async fn send(&self, recipient: &Recipient, body: &str) -> Delivery {
        if self.dry_run {
            tracing::info!(
                recipient_id = recipient.id,
                phone = %recipient.phone,
                "Dry run, skipping gateway call"
            );
            return Delivery {
                outcome: SendOutcome::DryRun,
                raw_response: Some(SIMULATED_RESPONSE.to_string()),
            };
        }

        for attempt in 0..self.policy.max_retries {
            let final_attempt = attempt + 1 == self.policy.max_retries;

            match self.transport.send(&recipient.phone, body).await {
                Ok(response) => match response.status {
                    200 => return interpret_accepted(response),
                    429 => {
                        if let Some(retry_after) = response.retry_after {
                            if !final_attempt {
                                let wait = retry_after.min(MAX_RETRY_WAIT);
                                tracing::warn!(
                                    wait,
                                    attempt = attempt + 1,
                                    max = self.policy.max_retries,
                                    phone = %recipient.phone,
                                    "Rate limited, backing off"
                                );
                                tokio::time::sleep(Duration::from_secs(wait)).await;
                                continue;
                            }
                        }
                        return Delivery {
                            outcome: SendOutcome::RateLimited,
                            raw_response: Some(response.body),
                        };
                    }
                    code => {
                        return Delivery {
                            outcome: SendOutcome::Rejected {
                                reason: reason_for_status(code),
                            },
                            raw_response: Some(response.body),
                        };
                    }
                },
                Err(err) => {
                    tracing::error!(
                        attempt = attempt + 1,
                        max = self.policy.max_retries,
                        error = %err,
                        "Gateway attempt failed"
                    );
                    if final_attempt {
                        return Delivery {
                            outcome: SendOutcome::TransportFailure {
                                detail: err.to_string(),
                            },
                            raw_response: Some(err.to_string()),
                        };
                    }
                    // No wait after the final attempt; only between retries.
                    let delay = self.policy.base_delay * 2u32.pow(attempt);
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Delivery {
            outcome: SendOutcome::TransportFailure {
                detail: "max retries exceeded".to_string(),
            },
            raw_response: None,
        }
    }
}

/// Interpret an HTTP 200 body: delivery group 1 is the only "accepted" value.
/// An unparseable body or empty message list counts as a rejection.
fn interpret_accepted(response: RawResponse) -> Delivery {
    let first = serde_json::from_str::<SendResponse>(&response.body)
        .ok()
        .and_then(SendResponse::into_first);

    let outcome = match first {
        Some(result) if result.accepted() => SendOutcome::Sent {
            message_id: result.message_id,
        },
        Some(result) => SendOutcome::Rejected {
            reason: result
                .status
                .description
                .unwrap_or_else(|| "Rejected".to_string()),
        },
        None => SendOutcome::Rejected {
            reason: "Rejected".to_string(),
        },
    };

    Delivery {
        outcome,
        raw_response: Some(response.body),
    }
}
