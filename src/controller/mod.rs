//! Workflow Controller
//!
//! The four-step research workflow as an explicit state machine. All mutable
//! workflow state lives in one struct; every action validates the current
//! step before doing anything, so illegal transitions surface as validation
//! errors instead of silent corruption.

use std::fmt;
use std::str::FromStr;

use tracing::info;
use uuid::Uuid;

use ccv_research_llm::TextCompletion;

use crate::export;
use crate::models::{
    AccuracyRating, CandidateCode, ResearchResult, ResearchSection, StructuredResearch,
};
use crate::research::parser::parse_structured_sections;
use crate::services::{DiscoveryOutcome, ResearchService};
use crate::storage::Database;
use crate::utils::error::{AppError, AppResult};

/// The workflow steps, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    TopicInput,
    CodeSelection,
    ResearchParams,
    Results,
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WorkflowStep::TopicInput => "topic_input",
            WorkflowStep::CodeSelection => "code_selection",
            WorkflowStep::ResearchParams => "research_params",
            WorkflowStep::Results => "results",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for WorkflowStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "topic_input" => Ok(WorkflowStep::TopicInput),
            "code_selection" => Ok(WorkflowStep::CodeSelection),
            "research_params" => Ok(WorkflowStep::ResearchParams),
            "results" => Ok(WorkflowStep::Results),
            other => Err(format!("Unknown workflow step: {}", other)),
        }
    }
}

/// The research workflow: state plus the services that drive it.
pub struct ResearchWorkflow<G> {
    service: ResearchService<G>,
    db: Database,
    session_id: String,
    step: WorkflowStep,
    topic: String,
    candidates: Vec<CandidateCode>,
    selected_code: Option<CandidateCode>,
    context: String,
    analysis: Option<ResearchResult>,
    structured: Option<StructuredResearch>,
}

impl<G: TextCompletion> ResearchWorkflow<G> {
    pub fn new(gateway: G, db: Database) -> Self {
        Self {
            service: ResearchService::new(gateway, db.clone()),
            db,
            session_id: Uuid::new_v4().to_string(),
            step: WorkflowStep::TopicInput,
            topic: String::new(),
            candidates: Vec::new(),
            selected_code: None,
            context: String::new(),
            analysis: None,
            structured: None,
        }
    }

    pub fn step(&self) -> WorkflowStep {
        self.step
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn candidates(&self) -> &[CandidateCode] {
        &self.candidates
    }

    pub fn selected_code(&self) -> Option<&CandidateCode> {
        self.selected_code.as_ref()
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn analysis(&self) -> Option<&ResearchResult> {
        self.analysis.as_ref()
    }

    pub fn structured(&self) -> Option<&StructuredResearch> {
        self.structured.as_ref()
    }

    fn require_step(&self, expected: WorkflowStep, action: &str) -> AppResult<()> {
        if self.step != expected {
            return Err(AppError::validation(format!(
                "Cannot {} from step {}",
                action, self.step
            )));
        }
        Ok(())
    }

    /// Submit a topic and run code discovery.
    ///
    /// Advances to code selection only when at least one candidate parses;
    /// otherwise the workflow stays on topic input and the raw outcome is
    /// returned so the caller can show it.
    pub async fn submit_topic(&mut self, topic: &str, model: &str) -> AppResult<DiscoveryOutcome> {
        self.require_step(WorkflowStep::TopicInput, "submit a topic")?;
        if topic.trim().is_empty() {
            return Err(AppError::validation("Topic must not be empty"));
        }

        let outcome = self.service.discover_codes(topic, model).await;
        if !outcome.codes.is_empty() {
            self.topic = topic.trim().to_string();
            self.candidates = outcome.codes.clone();
            self.step = WorkflowStep::CodeSelection;
            info!("Workflow advanced to {}", self.step);
        }
        Ok(outcome)
    }

    /// Pick a candidate code by index and move to the parameter step.
    /// Prefills the research context from the topic.
    pub fn select_code(&mut self, index: usize) -> AppResult<CandidateCode> {
        self.require_step(WorkflowStep::CodeSelection, "select a code")?;
        let candidate = self
            .candidates
            .get(index)
            .ok_or_else(|| AppError::validation(format!("No candidate at index {}", index)))?
            .clone();

        self.context = format!("Related to {}", self.topic);
        self.selected_code = Some(candidate.clone());
        self.step = WorkflowStep::ResearchParams;
        info!("Workflow advanced to {}", self.step);
        Ok(candidate)
    }

    /// Go back from code selection to topic input, clearing the candidates.
    pub fn back_to_topic(&mut self) -> AppResult<()> {
        self.require_step(WorkflowStep::CodeSelection, "go back to topic input")?;
        self.candidates.clear();
        self.step = WorkflowStep::TopicInput;
        Ok(())
    }

    /// Go back from the parameter step to code selection.
    pub fn back_to_code_selection(&mut self) -> AppResult<()> {
        self.require_step(WorkflowStep::ResearchParams, "go back to code selection")?;
        self.selected_code = None;
        self.step = WorkflowStep::CodeSelection;
        Ok(())
    }

    /// Run the research analysis and move to results.
    ///
    /// Gateway errors propagate and the workflow stays on the parameter step
    /// for resubmission.
    pub async fn submit_research(&mut self, context: &str, model: &str) -> AppResult<&ResearchResult> {
        self.require_step(WorkflowStep::ResearchParams, "submit research")?;
        let code = self
            .selected_code
            .as_ref()
            .ok_or_else(|| AppError::validation("No code selected"))?
            .code
            .clone();

        let result = self
            .service
            .run_research(&code, context, model, &self.topic)
            .await?;

        self.context = context.to_string();
        self.structured = Some(parse_structured_sections(&result.raw_text));
        self.analysis = Some(result);
        self.step = WorkflowStep::Results;
        info!("Workflow advanced to {}", self.step);
        self.analysis
            .as_ref()
            .ok_or_else(|| AppError::internal("Results step without analysis"))
    }

    fn current_analysis(&self) -> AppResult<&ResearchResult> {
        self.require_step(WorkflowStep::Results, "use results")?;
        self.analysis
            .as_ref()
            .ok_or_else(|| AppError::internal("Results step without analysis"))
    }

    /// Get one parsed section by number (1..=6).
    pub fn section(&self, number: u8) -> AppResult<&ResearchSection> {
        self.require_step(WorkflowStep::Results, "read a section")?;
        self.structured
            .as_ref()
            .and_then(|s| s.sections.get((number as usize).checked_sub(1)?))
            .ok_or_else(|| AppError::validation(format!("No section {}", number)))
    }

    /// Ask a follow-up question about one section.
    pub async fn ask_section(&mut self, number: u8, question: &str, model: &str) -> AppResult<String> {
        let code = self.current_analysis()?.cpt_code.clone();
        let section = self.section(number)?.clone();
        self.service
            .section_chat(&self.session_id, &code, &section, question, model)
            .await
    }

    /// Record an accuracy rating for one section.
    pub fn rate_section(
        &self,
        number: u8,
        rating: AccuracyRating,
        reason: Option<&str>,
    ) -> AppResult<()> {
        let code = &self.current_analysis()?.cpt_code;
        self.section(number)?;
        self.db
            .upsert_accuracy(&self.session_id, code, number, rating, reason)
    }

    /// Export the current analysis as spreadsheet bytes plus filename.
    pub fn export_spreadsheet(&self) -> AppResult<(Vec<u8>, String)> {
        let analysis = self.current_analysis()?;
        let bytes = export::to_spreadsheet(&analysis.raw_text, &analysis.cpt_code)?;
        Ok((bytes, export::export_filename(&analysis.cpt_code, "xlsx")))
    }

    /// Export the current analysis as document bytes plus filename.
    pub fn export_document(&self) -> AppResult<(Vec<u8>, String)> {
        let analysis = self.current_analysis()?;
        let bytes = export::to_document(&analysis.raw_text, &analysis.cpt_code)?;
        Ok((bytes, export::export_filename(&analysis.cpt_code, "pdf")))
    }

    /// Reset to topic input, discarding in-memory research state. Persisted
    /// rows (section chat, ratings, notes) are untouched.
    pub fn reset(&mut self) {
        self.topic.clear();
        self.candidates.clear();
        self.selected_code = None;
        self.context.clear();
        self.analysis = None;
        self.structured = None;
        self.step = WorkflowStep::TopicInput;
        info!("Workflow reset to {}", self.step);
    }
}
