//! Integration Tests Module
//!
//! End-to-end tests for CCV Research. Tests cover prompt construction,
//! model-output parsing, the session/notes/feedback stores, the research
//! workflow state machine, and report export.

// Audit window and prompt construction tests
mod prompts_test;

// Candidate-code and section parsing tests
mod parser_test;

// SQLite store tests
mod storage_test;

// Workflow state machine tests
mod workflow_test;

// Spreadsheet and document export tests
mod export_test;
