//! Storage Layer
//!
//! SQLite-backed persistence for sessions, notes, section chat, and feedback.

pub mod database;

pub use database::{Database, DbPool};
