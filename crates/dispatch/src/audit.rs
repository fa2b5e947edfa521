//! Audit logging: one append-only row per terminal outcome.

use sqlx::PgPool;

use courier_common::error::AppError;
use courier_common::types::{Delivery, Recipient};

/// Sink for terminal delivery outcomes.
///
/// Injected into the orchestrator so tests can substitute an in-memory store
/// for the Postgres-backed logger.
#[allow(async_fn_in_trait)]
pub trait AuditSink {
    /// Record one terminal outcome for one recipient.
    ///
    /// Must never propagate a failure: losing an audit row must not stop
    /// delivery to remaining recipients.
    async fn record(&self, recipient: &Recipient, body: &str, delivery: &Delivery);
}

impl<A: AuditSink> AuditSink for &A {
    async fn record(&self, recipient: &Recipient, body: &str, delivery: &Delivery) {
        (**self).record(recipient, body, delivery).await;
    }
}

/// Postgres-backed audit logger writing to the `messages` table.
pub struct PgAuditLogger {
    pool: PgPool,
}

impl PgAuditLogger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(
        &self,
        recipient: &Recipient,
        body: &str,
        delivery: &Delivery,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO messages (recipient_id, phone, body, status, response, gateway_message_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(recipient.id)
        .bind(&recipient.phone)
        .bind(body)
        .bind(delivery.outcome.status().to_string())
        .bind(delivery.raw_response.as_deref())
        .bind(delivery.outcome.message_id())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl AuditSink for PgAuditLogger {
    async fn record(&self, recipient: &Recipient, body: &str, delivery: &Delivery) {
        if let Err(err) = self.insert(recipient, body, delivery).await {
            tracing::error!(
                recipient_id = recipient.id,
                phone = %recipient.phone,
                error = %err,
                "Failed to record audit row"
            );
        }
    }
}
