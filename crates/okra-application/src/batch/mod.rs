//! Request batching.
//!
//! [`BatchOrchestrator`] runs chunked parallel batches; [`FetchStrategy`]
//! selects between that and plain sequential requests so the adapters in
//! [`adapters`] are written once for both pipeline paths.

pub mod adapters;
mod orchestrator;
mod strategy;

pub use orchestrator::BatchOrchestrator;
pub use strategy::FetchStrategy;
