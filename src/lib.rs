pub mod analyzer;
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod models;
pub mod ranking;
pub mod storage;

pub use api::{create_router, AppState};
pub use config::ServerConfig;
pub use engine::SearchEngine;
pub use error::{CuttleError, Result};
pub use index::{IndexStats, InvertedIndex};
pub use models::*;
pub use storage::Storage;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
