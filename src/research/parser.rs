//! Model Output Parsing
//!
//! Total parsers over model text. Both entry points accept arbitrary input
//! and never fail: candidate-code parsing drops malformed lines, and section
//! parsing substitutes placeholders for anything the model left out.

use crate::models::{CandidateCode, ResearchSection, StructuredResearch};
use crate::research::prompts::SECTION_TITLES;

/// Content substituted for a section the model did not emit.
pub const MISSING_SECTION_PLACEHOLDER: &str =
    "Warning: this section was not generated by the model. Please re-run the research or review the raw output.";

/// Content substituted for a missing final assessment.
pub const MISSING_ASSESSMENT_PLACEHOLDER: &str =
    "Warning: the final assessment was not generated by the model.";

/// Extract candidate codes from discovery output.
///
/// Keeps only lines containing both the `CODE:` and `DESCRIPTION:` markers,
/// splits on the first pipe, and trims. Malformed lines are dropped silently;
/// an empty result is a valid outcome.
pub fn parse_candidate_codes(text: &str) -> Vec<CandidateCode> {
    text.lines()
        .filter(|line| line.contains("CODE:") && line.contains("DESCRIPTION:"))
        .filter_map(|line| {
            let (code_part, desc_part) = line.split_once('|')?;
            let code = code_part.split_once("CODE:")?.1.trim();
            let description = desc_part.split_once("DESCRIPTION:")?.1.trim();
            if code.is_empty() {
                return None;
            }
            Some(CandidateCode {
                code: code.to_string(),
                description: description.to_string(),
            })
        })
        .collect()
}

/// Parse delimited research output into its fixed shape: always exactly six
/// sections plus one final assessment, with placeholders for absent pieces.
pub fn parse_structured_sections(text: &str) -> StructuredResearch {
    let sections = (1..=6u8)
        .map(|number| parse_section(text, number))
        .collect();

    let final_assessment = extract_block(text, "<FINAL_ASSESSMENT>", "</FINAL_ASSESSMENT>")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| MISSING_ASSESSMENT_PLACEHOLDER.to_string());

    StructuredResearch {
        sections,
        final_assessment,
    }
}

fn parse_section(text: &str, number: u8) -> ResearchSection {
    let canonical_title = SECTION_TITLES[(number - 1) as usize];
    let open = format!("<SECTION_{}>", number);
    let close = format!("</SECTION_{}>", number);

    let Some(block) = extract_block(text, &open, &close) else {
        return ResearchSection {
            number,
            title: canonical_title.to_string(),
            content: MISSING_SECTION_PLACEHOLDER.to_string(),
        };
    };

    let title = extract_block(block, "<TITLE>", "</TITLE>")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| canonical_title.to_string());

    // Missing content delimiter inside a present section is empty, not a
    // placeholder.
    let content = extract_block(block, "<CONTENT>", "</CONTENT>")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    ResearchSection {
        number,
        title,
        content,
    }
}

/// Return the text between the first `open` marker and the next `close`
/// marker after it, or None if either is absent.
fn extract_block<'a>(text: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = text.find(open)? + open.len();
    let rest = &text[start..];
    let end = rest.find(close)?;
    Some(&rest[..end])
}
