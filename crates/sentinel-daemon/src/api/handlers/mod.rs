//! API request handlers.

mod health;
mod review;
mod sar;
mod scan;
mod violations;

pub use health::{daemon_status, health_check};
pub use review::{freeze_account, send_to_review};
pub use sar::generate_sar;
pub use scan::scan_stream;
pub use violations::{list_violations, resolve_violation};
