//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories across platforms.

use std::path::PathBuf;

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the CCV Research directory (~/.ccv-research/)
pub fn ccv_research_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".ccv-research"))
}

/// Get the database file path (~/.ccv-research/research.db)
pub fn database_path() -> AppResult<PathBuf> {
    Ok(ccv_research_dir()?.join("research.db"))
}
