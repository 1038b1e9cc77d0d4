//! Application layer for OKRA.
//!
//! Coordinates the remote service and the domain computations: session
//! resolution, batched fetching, owner-name lookup, progress history and
//! the two-path aggregation pipeline.

pub mod batch;
pub mod pipeline;
pub mod progress_history;
pub mod session_resolver;
pub mod user_directory;

pub use batch::{BatchOrchestrator, FetchStrategy};
pub use pipeline::AggregationPipeline;
pub use progress_history::ProgressHistoryService;
pub use session_resolver::SessionResolver;
pub use user_directory::{UserDirectory, UserNameCache};
