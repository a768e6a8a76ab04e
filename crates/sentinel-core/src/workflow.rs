use crate::error::SentinelError;
use crate::store::ViolationQueue;
use crate::types::{ReviewStatus, ScanResult, Violation};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Account sentinel stored when a freeze request names no account.
pub const UNKNOWN_ACCOUNT: &str = "UNKNOWN";

/// Result of queuing a violation for human review.
#[derive(Debug, Clone, Serialize)]
pub struct EscalationOutcome {
    pub id: String,
    pub review_status: ReviewStatus,
}

/// Result of freezing the account behind a violation.
#[derive(Debug, Clone, Serialize)]
pub struct FreezeOutcome {
    pub id: String,
    pub account_id: String,
}

/// Operator workflow over the shared review queue.
///
/// Every operation holds the queue's write lock across its whole
/// find-or-create-then-mutate sequence, so two concurrent actions on the
/// same identifier cannot interleave into duplicate or half-updated records.
///
/// Unknown identifiers are never rejected: an operator may act on a
/// violation straight from the live scan stream before it lands in the
/// queue, and the workflow materializes a minimal record instead of racing
/// the feed. Any caller can therefore fabricate a record; that trade-off is
/// part of the contract.
#[derive(Debug, Clone, Default)]
pub struct ReviewWorkflow {
    queue: Arc<RwLock<ViolationQueue>>,
}

impl ReviewWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_queue(queue: Arc<RwLock<ViolationQueue>>) -> Self {
        Self { queue }
    }

    /// All active violations in arrival order.
    pub async fn list_active(&self) -> Vec<Violation> {
        self.queue.read().await.list_active()
    }

    pub async fn active_count(&self) -> usize {
        self.queue.read().await.len()
    }

    /// Record a flagged detector result as it streams by. Compliant results
    /// and transactions already in the queue are skipped.
    pub async fn admit_scan_result(&self, result: &ScanResult) -> Result<bool, SentinelError> {
        if !result.is_flagged() {
            return Ok(false);
        }
        let record = Violation::from_scan(result)?;
        let mut queue = self.queue.write().await;
        if queue.find(&record.id).is_some() {
            return Ok(false);
        }
        tracing::info!(violation_id = %record.id, "flagged transaction queued");
        queue.upsert(record);
        Ok(true)
    }

    /// Clear a violation from the review queue.
    ///
    /// Unknown identifiers succeed without touching the queue: resolution is
    /// idempotent, and resolving a record twice is not an error.
    pub async fn resolve(&self, id: &str) -> Result<(), SentinelError> {
        let id = require_id(id)?;
        let mut queue = self.queue.write().await;
        if queue.remove(id) {
            tracing::info!(violation_id = %id, "violation resolved");
        }
        Ok(())
    }

    /// Queue a violation for human review, materializing the record if the
    /// feed has not delivered it yet.
    pub async fn escalate_to_human(
        &self,
        id: &str,
        extra: &Map<String, Value>,
    ) -> Result<EscalationOutcome, SentinelError> {
        let id = require_id(id)?;
        let now = Utc::now();
        let mut queue = self.queue.write().await;
        let review_status = match queue.find_mut(id) {
            Some(record) => {
                record.escalate(now);
                record.review_status
            }
            None => {
                let mut record = Violation::materialize(id, extra);
                record.escalate(now);
                let review_status = record.review_status;
                queue.upsert(record);
                review_status
            }
        };
        tracing::info!(violation_id = %id, "violation queued for human review");
        Ok(EscalationOutcome {
            id: id.to_string(),
            review_status,
        })
    }

    /// Freeze the account behind a violation. With no `account_id` the
    /// sentinel value [`UNKNOWN_ACCOUNT`] is stored, never an absent field.
    pub async fn freeze_account(
        &self,
        id: &str,
        account_id: Option<&str>,
        extra: &Map<String, Value>,
    ) -> Result<FreezeOutcome, SentinelError> {
        let id = require_id(id)?;
        let account_id = account_id.unwrap_or(UNKNOWN_ACCOUNT);
        let now = Utc::now();
        let mut queue = self.queue.write().await;
        match queue.find_mut(id) {
            Some(record) => record.freeze(account_id, now),
            None => {
                let mut record = Violation::materialize(id, extra);
                record.freeze(account_id, now);
                queue.upsert(record);
            }
        }
        tracing::info!(violation_id = %id, account_id = %account_id, "account frozen");
        Ok(FreezeOutcome {
            id: id.to_string(),
            account_id: account_id.to_string(),
        })
    }
}

fn require_id(id: &str) -> Result<&str, SentinelError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(SentinelError::missing_id());
    }
    Ok(id)
}
