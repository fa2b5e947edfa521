//! Dispatch orchestrator: sequential per-recipient delivery with pacing.

use std::time::Duration;

use courier_common::types::{DispatchTally, Recipient};
use courier_gateway::Transport;

use crate::audit::AuditSink;
use crate::sender::MessageSender;

/// Iterates the recipient sequence one at a time: send, audit, tally, pace.
///
/// Strictly sequential by design; one message in flight bounds load on the
/// gateway.
pub struct Dispatcher<T: Transport, A: AuditSink> {
    sender: MessageSender<T>,
    audit: A,
    pacing: Duration,
}

impl<T: Transport, A: AuditSink> Dispatcher<T, A> {
    pub fn new(sender: MessageSender<T>, audit: A, pacing: Duration) -> Self {
        Self {
            sender,
            audit,
            pacing,
        }
    }

    /// Dispatch `body` to every recipient in order and return the run tally.
    ///
    /// Every recipient yields exactly one audit record, dry-run included.
    /// The pacing delay applies between recipients, not after the last one.
    /// An empty sequence dispatches nothing and reports zero/zero.
    pub async fn run(&self, recipients: &[Recipient], body: &str) -> DispatchTally {
        let mut tally = DispatchTally::default();
        let total = recipients.len();

        for (i, recipient) in recipients.iter().enumerate() {
            tracing::info!(
                index = i + 1,
                total,
                recipient_id = recipient.id,
                phone = %recipient.phone,
                "Dispatching message"
            );

            let delivery = self.sender.send(recipient, body).await;
            self.audit.record(recipient, body, &delivery).await;

            if delivery.outcome.is_success() {
                tracing::info!(phone = %recipient.phone, "Delivered");
            } else {
                tracing::error!(
                    phone = %recipient.phone,
                    outcome = %delivery.outcome,
                    "Delivery failed"
                );
            }
            tally.record(&delivery.outcome);

            if i + 1 < total {
                tokio::time::sleep(self.pacing).await;
            }
        }

        tracing::info!(
            success = tally.success,
            failure = tally.failure,
            total,
            "Dispatch run finished"
        );
        tally
    }
}
