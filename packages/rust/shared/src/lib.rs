//! Shared types, error model, and configuration for advisorboard.
//!
//! This crate is the foundation depended on by the other advisorboard crates.
//! It provides:
//! - [`AdvisorBoardError`]: the unified error type
//! - Domain types ([`AdvisorRecord`], [`BoardTotals`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, ColumnsConfig, PathsConfig, RenderConfig, config_dir,
    init_config, load_config, load_config_from, resolve_config_path,
};
pub use error::{AdvisorBoardError, Result};
pub use types::{AdvisorRecord, BoardTotals};
