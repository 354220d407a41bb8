//! Data Models
//!
//! Core domain types: research results and their parsed sections, candidate
//! codes, persisted session rows, and accuracy feedback.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A candidate CPT code suggested during code discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateCode {
    pub code: String,
    pub description: String,
}

/// A finished research run. Kept in working memory only, unless exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchResult {
    pub cpt_code: String,
    pub context: String,
    pub model: String,
    pub raw_text: String,
    pub timestamp: String,
    pub topic: String,
}

/// One of the six analysis sections parsed from a research result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchSection {
    /// Section number, 1..=6.
    pub number: u8,
    pub title: String,
    pub content: String,
}

/// The fixed-shape parse of a research result: exactly six sections plus the
/// final assessment, regardless of model output quality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredResearch {
    pub sections: Vec<ResearchSection>,
    pub final_assessment: String,
}

/// A distinct persisted session, as listed in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub topic: String,
}

/// One persisted conversational turn. Append-only; one row per user turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub session_id: String,
    pub topic: String,
    pub persona: String,
    pub question: String,
    pub response: String,
    pub timestamp: Option<String>,
}

/// A free-text note keyed by (session_id, code); upsert-by-key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionNote {
    pub session_id: String,
    pub code: String,
    pub content: String,
    pub updated_at: Option<String>,
}

/// One follow-up chat turn for a section, keyed by (session_id, code,
/// section_id); append-only, ordered by timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionChatTurn {
    pub session_id: String,
    pub code: String,
    pub section_id: u8,
    pub question: String,
    pub answer: String,
    pub timestamp: Option<String>,
}

/// User judgement of a section's accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccuracyRating {
    Good,
    Medium,
    Bad,
}

impl fmt::Display for AccuracyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccuracyRating::Good => "good",
            AccuracyRating::Medium => "medium",
            AccuracyRating::Bad => "bad",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for AccuracyRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(AccuracyRating::Good),
            "medium" => Ok(AccuracyRating::Medium),
            "bad" => Ok(AccuracyRating::Bad),
            other => Err(format!("Unknown accuracy rating: {}", other)),
        }
    }
}

/// Accuracy feedback for a section, keyed by (session_id, code, section_id);
/// upsert-by-key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyFeedback {
    pub session_id: String,
    pub code: String,
    pub section_id: u8,
    pub rating: AccuracyRating,
    pub reason: Option<String>,
    pub updated_at: Option<String>,
}

/// Application-level feedback submitted from the feedback form. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppFeedback {
    pub model_used: String,
    pub research_type: String,
    pub topic: String,
    /// 0 = not rated, 1..=3 = bad/medium/good.
    pub ui_rating: i32,
    pub content_rating: i32,
    pub feedback_text: String,
}
