//! Domain layer for OKRA.
//!
//! Holds the OKR model, the error taxonomy, run configuration, the
//! [`api::RemoteApi`] seam and every pure computation over the model
//! (hierarchy, analytics, sparklines, payload normalization). Nothing in
//! this crate performs I/O.

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod history;
pub mod model;
pub mod payload;
pub mod sparkline;

pub use analytics::AnalyticsEngine;
pub use api::{ApiResponse, RemoteApi};
pub use config::RunConfig;
pub use error::{OkraError, Result};
pub use hierarchy::HierarchyBuilder;
