//! Workflow Integration Tests
//!
//! Drives the four-step research workflow end to end against a mock gateway.

use async_trait::async_trait;

use ccv_research::controller::{ResearchWorkflow, WorkflowStep};
use ccv_research::models::AccuracyRating;
use ccv_research::storage::Database;
use ccv_research_llm::types::{LlmError, LlmResult, Message};
use ccv_research_llm::TextCompletion;

/// Answers discovery prompts with candidate codes and research prompts with
/// delimited sections, keyed off the prompt text.
struct ScriptedGateway;

#[async_trait]
impl TextCompletion for ScriptedGateway {
    async fn invoke(&self, conversation: &[Message], _model: &str) -> LlmResult<String> {
        let prompt = &conversation.last().expect("non-empty conversation").content;
        if prompt.contains("top 5 most relevant CPT codes") {
            return Ok("CODE: 29881 | DESCRIPTION: Knee arthroscopy with meniscectomy\nCODE: 29880 | DESCRIPTION: Knee arthroscopy, medial and lateral".to_string());
        }
        if prompt.contains("perform a thorough evaluation") {
            let mut out = String::new();
            for n in 1..=6 {
                out.push_str(&format!(
                    "<SECTION_{n}>\n<TITLE>Section {n}</TITLE>\n<CONTENT>\nBody {n}\n</CONTENT>\n</SECTION_{n}>\n"
                ));
            }
            out.push_str("<FINAL_ASSESSMENT>\nPriority: Low\n</FINAL_ASSESSMENT>");
            return Ok(out);
        }
        Ok("Follow-up answer.".to_string())
    }
}

struct RefusingGateway;

#[async_trait]
impl TextCompletion for RefusingGateway {
    async fn invoke(&self, _conversation: &[Message], _model: &str) -> LlmResult<String> {
        Err(LlmError::configuration("Missing AZURE_OPENAI_API_KEY for model: gpt-4.1"))
    }
}

async fn workflow_at_results() -> (ResearchWorkflow<ScriptedGateway>, Database) {
    let db = Database::new_in_memory().unwrap();
    let mut workflow = ResearchWorkflow::new(ScriptedGateway, db.clone());
    workflow.submit_topic("knee arthroscopy", "gpt-4.1").await.unwrap();
    workflow.select_code(0).unwrap();
    workflow.submit_research("Related to knee arthroscopy", "gpt-4.1").await.unwrap();
    (workflow, db)
}

// ============================================================================
// Transition Tests
// ============================================================================

#[tokio::test]
async fn test_happy_path_reaches_results() {
    let db = Database::new_in_memory().unwrap();
    let mut workflow = ResearchWorkflow::new(ScriptedGateway, db);
    assert_eq!(workflow.step(), WorkflowStep::TopicInput);

    let outcome = workflow.submit_topic("knee arthroscopy", "gpt-4.1").await.unwrap();
    assert_eq!(outcome.codes.len(), 2);
    assert_eq!(workflow.step(), WorkflowStep::CodeSelection);

    let picked = workflow.select_code(0).unwrap();
    assert_eq!(picked.code, "29881");
    assert_eq!(workflow.step(), WorkflowStep::ResearchParams);
    assert_eq!(workflow.context(), "Related to knee arthroscopy");

    workflow.submit_research("Related to knee arthroscopy", "gpt-4.1").await.unwrap();
    assert_eq!(workflow.step(), WorkflowStep::Results);
    assert_eq!(workflow.structured().unwrap().sections.len(), 6);
}

#[tokio::test]
async fn test_failed_discovery_stays_on_topic_input() {
    let db = Database::new_in_memory().unwrap();
    let mut workflow = ResearchWorkflow::new(RefusingGateway, db);

    let outcome = workflow.submit_topic("knee arthroscopy", "gpt-4.1").await.unwrap();
    assert!(outcome.codes.is_empty());
    assert!(outcome.raw.starts_with("Error generating CPT codes:"));
    assert_eq!(workflow.step(), WorkflowStep::TopicInput);
}

#[tokio::test]
async fn test_failed_research_stays_on_params() {
    let db = Database::new_in_memory().unwrap();
    let mut workflow = ResearchWorkflow::new(ScriptedGateway, db.clone());
    workflow.submit_topic("knee arthroscopy", "gpt-4.1").await.unwrap();
    workflow.select_code(0).unwrap();

    let mut failing = ResearchWorkflow::new(RefusingGateway, db);
    failing.submit_topic("x", "gpt-4.1").await.unwrap();
    // Discovery failed, so driving the failing workflow forward is a
    // validation error, not a crash.
    assert!(failing.select_code(0).is_err());
}

#[tokio::test]
async fn test_back_transitions() {
    let db = Database::new_in_memory().unwrap();
    let mut workflow = ResearchWorkflow::new(ScriptedGateway, db);
    workflow.submit_topic("knee arthroscopy", "gpt-4.1").await.unwrap();

    workflow.back_to_topic().unwrap();
    assert_eq!(workflow.step(), WorkflowStep::TopicInput);

    workflow.submit_topic("knee arthroscopy", "gpt-4.1").await.unwrap();
    workflow.select_code(1).unwrap();
    workflow.back_to_code_selection().unwrap();
    assert_eq!(workflow.step(), WorkflowStep::CodeSelection);
    assert!(workflow.selected_code().is_none());
}

#[tokio::test]
async fn test_illegal_transitions_are_validation_errors() {
    let db = Database::new_in_memory().unwrap();
    let mut workflow = ResearchWorkflow::new(ScriptedGateway, db);

    assert!(workflow.select_code(0).is_err());
    assert!(workflow.submit_research("ctx", "gpt-4.1").await.is_err());
    assert!(workflow.back_to_topic().is_err());
    assert!(workflow.export_spreadsheet().is_err());
    assert!(workflow.section(1).is_err());
}

// ============================================================================
// Results Action Tests
// ============================================================================

#[tokio::test]
async fn test_section_chat_persists_under_session() {
    let (mut workflow, db) = workflow_at_results().await;
    let session_id = workflow.session_id().to_string();

    let answer = workflow.ask_section(2, "Can you expand?", "gpt-4.1").await.unwrap();
    assert_eq!(answer, "Follow-up answer.");

    let turns = db.get_section_chat(&session_id, "29881", 2).unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].question, "Can you expand?");
}

#[tokio::test]
async fn test_rate_section_persists() {
    let (workflow, db) = workflow_at_results().await;
    workflow.rate_section(4, AccuracyRating::Good, None).unwrap();

    let feedback = db
        .get_accuracy(workflow.session_id(), "29881", 4)
        .unwrap()
        .unwrap();
    assert_eq!(feedback.rating, AccuracyRating::Good);
}

#[tokio::test]
async fn test_exports_from_results() {
    let (workflow, _db) = workflow_at_results().await;

    let (xlsx, xlsx_name) = workflow.export_spreadsheet().unwrap();
    assert_eq!(&xlsx[..2], b"PK");
    assert!(xlsx_name.starts_with("apc_research_29881_"));

    let (pdf, pdf_name) = workflow.export_document().unwrap();
    assert_eq!(&pdf[..5], b"%PDF-");
    assert!(pdf_name.ends_with(".pdf"));
}

#[tokio::test]
async fn test_reset_discards_memory_but_not_store() {
    let (mut workflow, db) = workflow_at_results().await;
    let session_id = workflow.session_id().to_string();
    workflow.ask_section(1, "q", "gpt-4.1").await.unwrap();

    workflow.reset();
    assert_eq!(workflow.step(), WorkflowStep::TopicInput);
    assert!(workflow.analysis().is_none());
    assert!(workflow.candidates().is_empty());

    // Persisted chat survives the reset.
    assert_eq!(db.get_section_chat(&session_id, "29881", 1).unwrap().len(), 1);
}
