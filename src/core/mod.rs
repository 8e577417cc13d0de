// src/core/mod.rs
//! Core services shared by the library and the command line

pub mod config_manager;
pub mod fs_ops;
pub mod service_client;

pub use config_manager::{ConfigManager, ServiceConfig};
pub use fs_ops::FsOps;
pub use service_client::{AnalysisApi, ServiceClient};
