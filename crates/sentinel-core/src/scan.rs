use crate::error::SentinelError;
use crate::types::ScanResult;
use futures_util::stream::BoxStream;

/// Stream of scored detector results, one item per poll.
pub type ScanResultStream = BoxStream<'static, Result<ScanResult, SentinelError>>;

/// Asynchronous producer of scored transaction results.
///
/// The consumer drives the pace: each item is pulled only after the previous
/// one has been forwarded, so backpressure is implicit. Dropping the stream
/// stops production; no queued work outlives the subscriber.
pub trait ScanFeed: Send + Sync {
    fn stream(&self) -> ScanResultStream;
}
