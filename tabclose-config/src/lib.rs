//! Configuration system for tabclose.
//!
//! This crate provides configuration loading, saving, and default values
//! for the pending tab closure ledger and the removal-flow coordinator. It
//! includes:
//!
//! - Undo settings (whether closures stay pending, off-the-record behaviour)
//! - Dialog settings (confirmation prompts before destroying tab groups)
//! - Debug log level

pub mod config;
pub mod defaults;
pub mod error;
mod types;

pub use config::{Config, DialogConfig, UndoConfig};
pub use error::ConfigError;
pub use types::LogLevel;
