//! Report Export
//!
//! Renders a finished research result into downloadable byte streams:
//! a multi-sheet spreadsheet and a paginated letter-size document.

pub mod excel;
pub mod pdf;

use chrono::Local;

pub use excel::to_spreadsheet;
pub use pdf::to_document;

/// Build the download filename for an export: `apc_research_{code}_{YYYYMMDD}.{ext}`
pub fn export_filename(code: &str, extension: &str) -> String {
    format!(
        "apc_research_{}_{}.{}",
        code,
        Local::now().format("%Y%m%d"),
        extension
    )
}
