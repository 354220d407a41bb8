//! Parser Integration Tests
//!
//! Tests for candidate-code extraction and the total section parser.

use ccv_research::research::parser::{
    parse_candidate_codes, parse_structured_sections, MISSING_SECTION_PLACEHOLDER,
};
use ccv_research::research::prompts::SECTION_TITLES;

fn well_formed_output() -> String {
    let mut out = String::from("Preamble the model added on its own.\n");
    for (i, title) in SECTION_TITLES.iter().enumerate() {
        out.push_str(&format!(
            "<SECTION_{n}>\n<TITLE>{title}</TITLE>\n<CONTENT>\nAnalysis body {n}.\n</CONTENT>\n</SECTION_{n}>\n",
            n = i + 1,
            title = title,
        ));
    }
    out.push_str("<FINAL_ASSESSMENT>\nPriority: Moderate. Validate rates quarterly.\n</FINAL_ASSESSMENT>\n");
    out
}

// ============================================================================
// Candidate Code Tests
// ============================================================================

#[test]
fn test_candidate_codes_order_preserved() {
    let text = "CODE: 10021 | DESCRIPTION: Fine needle aspiration\nCODE: 10022 | DESCRIPTION: FNA, each additional";
    let codes = parse_candidate_codes(text);

    assert_eq!(codes.len(), 2);
    assert_eq!(codes[0].code, "10021");
    assert_eq!(codes[0].description, "Fine needle aspiration");
    assert_eq!(codes[1].code, "10022");
    assert_eq!(codes[1].description, "FNA, each additional");
}

#[test]
fn test_candidate_codes_no_markers_is_empty() {
    assert!(parse_candidate_codes("The model refused to answer.").is_empty());
    assert!(parse_candidate_codes("").is_empty());
}

#[test]
fn test_candidate_codes_surrounded_by_prose() {
    let text = "Sure! Here are relevant codes:\n\nCODE: 29881 | DESCRIPTION: Knee arthroscopy with meniscectomy\n\nLet me know if you need more.";
    let codes = parse_candidate_codes(text);
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].code, "29881");
}

// ============================================================================
// Section Parser Tests
// ============================================================================

#[test]
fn test_sections_parse_verbatim() {
    let parsed = parse_structured_sections(&well_formed_output());

    assert_eq!(parsed.sections.len(), 6);
    for (i, section) in parsed.sections.iter().enumerate() {
        assert_eq!(section.number as usize, i + 1);
        assert_eq!(section.title, SECTION_TITLES[i]);
        assert_eq!(section.content, format!("Analysis body {}.", i + 1));
    }
    assert_eq!(
        parsed.final_assessment,
        "Priority: Moderate. Validate rates quarterly."
    );
}

#[test]
fn test_missing_section_three_gets_placeholder() {
    let output = well_formed_output()
        .replace("<SECTION_3>", "")
        .replace("</SECTION_3>", "");
    let parsed = parse_structured_sections(&output);

    assert_eq!(parsed.sections.len(), 6);
    assert_eq!(parsed.sections[2].content, MISSING_SECTION_PLACEHOLDER);
    for i in [0usize, 1, 3, 4, 5] {
        assert_eq!(parsed.sections[i].content, format!("Analysis body {}.", i + 1));
    }
}

#[test]
fn test_parser_is_total() {
    let inputs = [
        "",
        "completely unstructured prose",
        "<SECTION_1>unterminated",
        "<SECTION_1></SECTION_1>",
        "<FINAL_ASSESSMENT>only an assessment</FINAL_ASSESSMENT>",
    ];
    for input in inputs {
        let parsed = parse_structured_sections(input);
        assert_eq!(parsed.sections.len(), 6, "input: {:?}", input);
        assert!(!parsed.final_assessment.is_empty(), "input: {:?}", input);
    }
}
