//! Domain model.
//!
//! Records are built from flattened remote data, enriched in place by the
//! batch adapters, and finally ordered and linked by the hierarchy builder.

pub mod key_result;
pub mod objective;
pub mod progress;
pub mod report;
pub mod session;
pub mod status;
pub mod summary;
pub mod task;
pub mod user;

pub use key_result::KeyResult;
pub use objective::Objective;
pub use progress::ProgressSample;
pub use report::{AggregationReport, RunPath, RunStats};
pub use session::Session;
pub use status::StatusCategory;
pub use summary::{AggregateSummary, HierarchyStats};
pub use task::Task;
pub use user::{UNASSIGNED_OWNER, UserRecord, synthetic_user_label};

/// Placeholder rendered for a record without progress history.
pub const EMPTY_SPARKLINE: &str = "—";
