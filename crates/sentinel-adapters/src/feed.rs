//! Scan feed adapters.

use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use sentinel_core::{
    Detection, ScanFeed, ScanResult, ScanResultStream, SentinelError, Severity, Verdict,
};
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;

/// Replays a fixed batch of detector results as a paced scan stream.
///
/// Each poll yields one result after the configured interval, so the stream
/// never runs ahead of its consumer. A zero interval replays as fast as the
/// subscriber reads.
#[derive(Debug, Clone)]
pub struct ReplayScanFeed {
    results: Vec<ScanResult>,
    interval: Duration,
}

impl ReplayScanFeed {
    pub fn new(results: Vec<ScanResult>, interval: Duration) -> Self {
        Self { results, interval }
    }

    /// Load detector results from a JSONL file, one result per line.
    pub fn from_jsonl(path: impl AsRef<Path>, interval: Duration) -> Result<Self, SentinelError> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SentinelError::Feed(format!("feed file unreadable: {e}")))?;
        let mut results = Vec::new();
        for (number, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let result: ScanResult = serde_json::from_str(line).map_err(|e| {
                SentinelError::Feed(format!("bad feed record on line {}: {e}", number + 1))
            })?;
            results.push(result);
        }
        Ok(Self::new(results, interval))
    }

    /// Bundled synthetic batch covering the three detector rules plus
    /// compliant traffic, for development and demos.
    pub fn sample(interval: Duration) -> Self {
        let now = Utc::now();
        let flagged = |txn: &str, score: u8, rule: (&str, &str, Severity), summary: &str| {
            ScanResult {
                transaction_id: txn.to_string(),
                verdict: Verdict::Flagged,
                risk_score: score,
                detections: vec![Detection {
                    rule_id: rule.0.to_string(),
                    rule_label: rule.1.to_string(),
                    severity: rule.2,
                }],
                evidence_summary: summary.to_string(),
                timestamp: now,
            }
        };
        let compliant = |txn: &str, summary: &str| ScanResult {
            transaction_id: txn.to_string(),
            verdict: Verdict::Compliant,
            risk_score: 8,
            detections: Vec::new(),
            evidence_summary: summary.to_string(),
            timestamp: now,
        };

        Self::new(
            vec![
                flagged(
                    "TXN-8821",
                    91,
                    ("AML-R01", "High-Value Threshold", Severity::Critical),
                    "Orig: ACC-1040, Dest: ACC-2207, $14,500 wire",
                ),
                compliant("TXN-4432", "Orig: ACC-1102, Dest: ACC-3310, $240 card"),
                flagged(
                    "TXN-2210",
                    64,
                    ("AML-R03", "Cross-Border Flag", Severity::High),
                    "Orig: ACC-5521 (KY), Dest: ACC-0097, $5,800 transfer",
                ),
                compliant("TXN-5518", "Orig: ACC-9024, Dest: ACC-1411, $67 card"),
                flagged(
                    "TXN-7734",
                    72,
                    ("AML-R02", "Velocity Smurfing", Severity::High),
                    "Orig: ACC-6601, Dest: ACC-7008, 3 transfers under $2,000 in 24h",
                ),
                flagged(
                    "TXN-8833",
                    97,
                    ("AML-R01", "High-Value Threshold", Severity::Critical),
                    "Orig: ACC-3345 (tax haven), Dest: ACC-8181, $199,500 wire",
                ),
                compliant("TXN-9102", "Orig: ACC-2301, Dest: ACC-6644, $1,150 transfer"),
            ],
            interval,
        )
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl ScanFeed for ReplayScanFeed {
    fn stream(&self) -> ScanResultStream {
        let interval = self.interval;
        stream::iter(self.results.clone())
            .then(move |result| async move {
                if !interval.is_zero() {
                    sleep(interval).await;
                }
                Ok(result)
            })
            .boxed()
    }
}
