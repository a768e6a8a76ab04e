use crate::error::SentinelError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Detector verdict attached to a scanned transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    #[default]
    Flagged,
    Compliant,
}

/// Review lifecycle state of a flagged transaction.
///
/// States only move forward: `Pending -> HumanReview -> AccountFrozen`.
/// Resolution is terminal and modeled as removal from the queue, not a state.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    #[default]
    Pending,
    HumanReview,
    AccountFrozen,
}

impl ReviewStatus {
    /// Wire-format name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::HumanReview => "HUMAN_REVIEW",
            Self::AccountFrozen => "ACCOUNT_FROZEN",
        }
    }
}

/// Detection severity reported by the anomaly detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

/// A single rule hit from the detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub rule_id: String,
    pub rule_label: String,
    pub severity: Severity,
}

/// One scored result from the scanning feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub transaction_id: String,
    pub verdict: Verdict,
    /// 0..100 composite risk score.
    pub risk_score: u8,
    pub detections: Vec<Detection>,
    pub evidence_summary: String,
    pub timestamp: DateTime<Utc>,
}

impl ScanResult {
    pub fn is_flagged(&self) -> bool {
        self.verdict == Verdict::Flagged
    }
}

/// Field names owned by the violation record itself. Detector-supplied
/// evidence under these keys is dropped on merge so the flattened wire
/// representation never carries duplicate keys.
const RESERVED_KEYS: &[&str] = &[
    "id",
    "transaction_id",
    "verdict",
    "review_status",
    "reviewed_at",
    "frozen_at",
    "frozen_account",
];

/// A flagged transaction under review.
///
/// Known lifecycle fields are typed; everything else the detector supplied
/// (amounts, counterparties, rule hits) rides in `evidence` and is flattened
/// on the wire so it round-trips through the workflow untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub verdict: Verdict,
    #[serde(default)]
    pub review_status: ReviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frozen_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frozen_account: Option<String>,
    #[serde(flatten)]
    pub evidence: Map<String, Value>,
}

impl Violation {
    /// Fresh flagged record with no evidence; `transaction_id` mirrors `id`.
    pub fn flagged(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            transaction_id: id.clone(),
            id,
            verdict: Verdict::Flagged,
            review_status: ReviewStatus::Pending,
            reviewed_at: None,
            frozen_at: None,
            frozen_account: None,
            evidence: Map::new(),
        }
    }

    /// Minimal record for an identifier the feed has not materialized yet.
    ///
    /// The caller-supplied fields are merged as evidence; a `transaction_id`
    /// among them becomes the record's alternate lookup key.
    pub fn materialize(id: &str, extra: &Map<String, Value>) -> Self {
        let mut record = Self::flagged(id);
        if let Some(transaction_id) = extra.get("transaction_id").and_then(Value::as_str) {
            record.transaction_id = transaction_id.to_string();
        }
        record.merge_evidence(extra);
        record
    }

    /// Queue record for a flagged detector result.
    pub fn from_scan(result: &ScanResult) -> Result<Self, SentinelError> {
        let mut record = Self::flagged(result.transaction_id.clone());
        record.evidence.insert(
            "risk_score".to_string(),
            Value::from(result.risk_score),
        );
        record.evidence.insert(
            "evidence_summary".to_string(),
            Value::from(result.evidence_summary.clone()),
        );
        record.evidence.insert(
            "detections".to_string(),
            serde_json::to_value(&result.detections)
                .map_err(|e| SentinelError::Serialization(e.to_string()))?,
        );
        record.evidence.insert(
            "flagged_at".to_string(),
            Value::from(result.timestamp.to_rfc3339()),
        );
        Ok(record)
    }

    /// Copy caller-supplied fields into the evidence map, skipping the
    /// identifier and the record's own field names.
    pub fn merge_evidence(&mut self, extra: &Map<String, Value>) {
        for (key, value) in extra {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            self.evidence.insert(key.clone(), value.clone());
        }
    }

    /// Advance to human review. Later states are never rolled back, and the
    /// review timestamp is stamped exactly once.
    pub fn escalate(&mut self, at: DateTime<Utc>) {
        if self.review_status < ReviewStatus::HumanReview {
            self.review_status = ReviewStatus::HumanReview;
        }
        if self.reviewed_at.is_none() {
            self.reviewed_at = Some(at);
        }
    }

    /// Advance to account-frozen and record the targeted account. The freeze
    /// timestamp is stamped exactly once; earlier review fields survive.
    pub fn freeze(&mut self, account_id: &str, at: DateTime<Utc>) {
        if self.review_status < ReviewStatus::AccountFrozen {
            self.review_status = ReviewStatus::AccountFrozen;
        }
        self.frozen_account = Some(account_id.to_string());
        if self.frozen_at.is_none() {
            self.frozen_at = Some(at);
        }
    }

    /// True when `identifier` names this record by either key.
    pub fn matches(&self, identifier: &str) -> bool {
        self.id == identifier || self.transaction_id == identifier
    }
}
