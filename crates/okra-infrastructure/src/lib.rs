//! Infrastructure layer for OKRA.
//!
//! The reqwest-backed [`RemoteClient`], wire DTOs with their conversion into
//! domain models, and configuration loading.

pub mod config_service;
pub mod dto;
pub mod paths;
pub mod remote_client;

pub use config_service::ConfigService;
pub use paths::OkraPaths;
pub use remote_client::RemoteClient;
