// src/lib.rs
pub mod auth;
pub mod cli;
pub mod controller;
pub mod core;
pub mod display;
pub mod error;
pub mod pipeline;
pub mod store;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use auth::{FileSessionStore, MemorySessionStore, Session, SessionManager, SessionStore};
pub use controller::{DeleteOutcome, FetchOutcome, ViewController, ViewState};
pub use core::{AnalysisApi, ConfigManager, ServiceClient, ServiceConfig};
pub use error::ClientError;
pub use pipeline::{view, FilterCategory, PageResult, SortKey, ViewQuery, ITEMS_PER_PAGE};
pub use store::RecordStore;
pub use types::{AnalysisRecord, AnalysisResult, StatsResponse, UserProfile};
