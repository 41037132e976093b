//! Revenue-share domain — recurring invoice payouts to staff and operators,
//! executed through an external payment processor.

pub mod client;

use crate::error::TransferError;
use crate::shared::{Credits, InvoiceId, TransferId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// External payment execution (card capture, bank transfer). A collaborator,
/// not part of this core: consumed as a single opaque operation.
#[allow(async_fn_in_trait)]
pub trait PaymentProcessor: Send + Sync {
    /// Execute a transfer. `idempotency_key` is stable across retries of the
    /// same `(invoice, recipient)` pair so the processor can dedupe.
    async fn transfer(
        &self,
        amount: Credits,
        destination: &UserId,
        idempotency_key: &str,
    ) -> Result<TransferId, TransferError>;
}

/// Persisted proof that a recipient has been paid for an invoice — the
/// at-most-once guard keyed by `(invoice_id, recipient_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub invoice_id: InvoiceId,
    pub recipient_id: UserId,
    pub transfer_id: TransferId,
    pub amount: Credits,
    pub created_at: DateTime<Utc>,
}

/// One executed (or previously recorded) transfer in a distribution batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub recipient_id: UserId,
    pub transfer_id: TransferId,
    pub amount: Credits,
    /// `true` when this invocation found an existing record and skipped the
    /// external call.
    pub already_recorded: bool,
}

/// Retry behavior for the external transfer call, retried one recipient at a
/// time so a single failure doesn't block the batch.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retry attempts beyond the initial call.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Cap on the delay between retries.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
    /// Whether to add jitter to the delay.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Delay for a given attempt (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base =
            self.initial_delay.as_millis() as f64 * self.backoff_factor.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);

        let final_ms = if self.jitter {
            let jitter_range = capped * 0.25;
            let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;
            (capped + jitter).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(final_ms as u64)
    }
}

/// Idempotency key for one `(invoice, recipient)` transfer.
pub fn idempotency_key(invoice: &InvoiceId, recipient: &UserId) -> String {
    format!("{invoice}:{recipient}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_backs_off_without_jitter() {
        let config = RetryConfig {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
            jitter: false,
        };
        assert_eq!(config.delay_for_attempt(0).as_millis(), 100);
        assert_eq!(config.delay_for_attempt(1).as_millis(), 200);
        assert_eq!(config.delay_for_attempt(2).as_millis(), 400);
    }

    #[test]
    fn test_delay_caps_at_max() {
        let config = RetryConfig {
            max_retries: 5,
            initial_delay: Duration::from_millis(1_000),
            max_delay: Duration::from_millis(2_000),
            backoff_factor: 10.0,
            jitter: false,
        };
        assert_eq!(config.delay_for_attempt(3).as_millis(), 2_000);
    }

    #[test]
    fn test_idempotency_key_is_stable() {
        let invoice = InvoiceId::from("inv-7");
        let recipient = UserId::from("staff-1");
        assert_eq!(idempotency_key(&invoice, &recipient), "inv-7:staff-1");
        assert_eq!(
            idempotency_key(&invoice, &recipient),
            idempotency_key(&invoice, &recipient)
        );
    }
}
