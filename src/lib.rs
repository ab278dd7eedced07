#![allow(missing_docs)]

pub mod cli;
pub mod config;
pub mod json_equality;
pub mod json_remove;
pub mod target_paths;
pub mod uninstall;

pub use config::{SkillConfig, TargetConfig};
pub use json_equality::values_equal;
pub use json_remove::remove_json_value;
pub use uninstall::{uninstall_skill, UninstallOptions, UninstallReport};

#[derive(Debug, thiserror::Error)]
pub enum UninstallError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
