//! Research Pipeline
//!
//! Prompt construction and model-output parsing for APC research.

pub mod parser;
pub mod prompts;

pub use parser::{parse_candidate_codes, parse_structured_sections};
pub use prompts::{audit_window, audit_window_today, build_code_discovery_prompt, build_research_prompt, SECTION_TITLES};
