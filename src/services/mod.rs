//! Service Layer
//!
//! Gateway-backed services driving the research and chat workflows.

pub mod chat;
pub mod research;

pub use chat::ChatService;
pub use research::{DiscoveryOutcome, ResearchService};
