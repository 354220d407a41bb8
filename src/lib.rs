//! CCV Research
//!
//! An APC (Ambulatory Payment Classification) research assistant for medical
//! coding audits. Suggests candidate CPT codes for a topic, runs a structured
//! six-section research analysis through hosted language models, persists
//! sessions and feedback to SQLite, and exports finished reports as
//! spreadsheets or PDF documents.

pub mod controller;
pub mod export;
pub mod models;
pub mod research;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export main types
pub use controller::{ResearchWorkflow, WorkflowStep};
pub use models::{
    AccuracyRating, CandidateCode, ResearchResult, ResearchSection, StructuredResearch,
};
pub use services::{ChatService, DiscoveryOutcome, ResearchService};
pub use storage::Database;
pub use utils::{AppError, AppResult};
