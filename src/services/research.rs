//! Research Service
//!
//! Orchestrates the research workflow: code discovery, the main six-section
//! research run, and per-section follow-up chat. Generic over the text
//! completion gateway so tests can substitute a mock.

use chrono::Local;
use tracing::{error, info};

use ccv_research_llm::types::Message;
use ccv_research_llm::TextCompletion;

use crate::models::{CandidateCode, ResearchResult, ResearchSection};
use crate::research::parser::parse_candidate_codes;
use crate::research::prompts::{
    audit_window_today, build_code_discovery_prompt, build_research_prompt,
    CODE_DISCOVERY_SYSTEM_PROMPT, RESEARCH_SYSTEM_PROMPT,
};
use crate::storage::Database;
use crate::utils::error::AppResult;

/// Result of a code-discovery call: the raw model text plus whatever
/// candidates could be parsed from it.
#[derive(Debug, Clone)]
pub struct DiscoveryOutcome {
    pub raw: String,
    pub codes: Vec<CandidateCode>,
}

/// Service for the APC research workflow.
pub struct ResearchService<G> {
    gateway: G,
    db: Database,
}

impl<G: TextCompletion> ResearchService<G> {
    pub fn new(gateway: G, db: Database) -> Self {
        Self { gateway, db }
    }

    /// Suggest candidate CPT codes for a topic.
    ///
    /// Never fails: a gateway error becomes the raw payload text, which then
    /// parses to zero candidates.
    pub async fn discover_codes(&self, topic: &str, model: &str) -> DiscoveryOutcome {
        let conversation = [
            Message::system(CODE_DISCOVERY_SYSTEM_PROMPT),
            Message::user(build_code_discovery_prompt(topic)),
        ];

        let raw = match self.gateway.invoke(&conversation, model).await {
            Ok(text) => text,
            Err(e) => {
                error!("Code discovery failed: {}", e);
                format!("Error generating CPT codes: {}", e)
            }
        };

        let codes = parse_candidate_codes(&raw);
        info!("Discovered {} candidate codes for topic", codes.len());
        DiscoveryOutcome { raw, codes }
    }

    /// Run the full six-section research analysis for a CPT code.
    ///
    /// Gateway errors propagate to the caller; there is no retry.
    pub async fn run_research(
        &self,
        code: &str,
        context: &str,
        model: &str,
        topic: &str,
    ) -> AppResult<ResearchResult> {
        let (window_start, window_end) = audit_window_today();
        let prompt = build_research_prompt(code, context, window_start, window_end);
        let conversation = [
            Message::system(RESEARCH_SYSTEM_PROMPT),
            Message::user(prompt),
        ];

        info!("Running research for CPT code {} with model {}", code, model);
        let raw_text = self.gateway.invoke(&conversation, model).await?;

        Ok(ResearchResult {
            cpt_code: code.to_string(),
            context: context.to_string(),
            model: model.to_string(),
            raw_text,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            topic: topic.to_string(),
        })
    }

    /// Answer a follow-up question about one research section.
    ///
    /// The section's content is the system context, prior persisted turns for
    /// the same (session, code, section) key are replayed, and the new turn
    /// is persisted. Gateway errors become the answer text rather than
    /// failing the workflow.
    pub async fn section_chat(
        &self,
        session_id: &str,
        code: &str,
        section: &ResearchSection,
        question: &str,
        model: &str,
    ) -> AppResult<String> {
        let system = format!(
            "You are a medical coding expert answering follow-up questions about one section of an APC research report for CPT code {}.\n\nSection: {}\n\n{}",
            code, section.title, section.content
        );

        let mut conversation = vec![Message::system(system)];
        for turn in self.db.get_section_chat(session_id, code, section.number)? {
            conversation.push(Message::user(turn.question));
            conversation.push(Message::assistant(turn.answer));
        }
        conversation.push(Message::user(question));

        let answer = match self.gateway.invoke(&conversation, model).await {
            Ok(text) => text,
            Err(e) => {
                error!("Section chat failed: {}", e);
                format!("Error: {}", e)
            }
        };

        self.db
            .append_section_chat(session_id, code, section.number, question, &answer)?;
        Ok(answer)
    }
}
