//! Prompt Construction Integration Tests
//!
//! Tests for the audit window arithmetic and both prompt builders.

use chrono::NaiveDate;

use ccv_research::research::prompts::{
    audit_window, audit_window_today, build_code_discovery_prompt, build_research_prompt,
    SECTION_TITLES,
};

// ============================================================================
// Audit Window Tests
// ============================================================================

#[test]
fn test_audit_window_fixed_date() {
    let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let (start, end) = audit_window(today);
    assert_eq!(end, today);
    assert_eq!((end - start).num_days(), 1095);
    assert_eq!(start, NaiveDate::from_ymd_opt(2021, 6, 16).unwrap());
}

#[test]
fn test_audit_window_today_span() {
    let (start, end) = audit_window_today();
    assert_eq!((end - start).num_days(), 1095);
}

// ============================================================================
// Research Prompt Tests
// ============================================================================

#[test]
fn test_research_prompt_contains_all_sections() {
    let (start, end) = audit_window(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    let prompt = build_research_prompt("27447", "Knee replacement claims", start, end);

    for (i, title) in SECTION_TITLES.iter().enumerate() {
        assert!(
            prompt.contains(&format!("SECTION {} - {}", i + 1, title)),
            "missing section heading for {}",
            title
        );
    }
    assert!(prompt.contains("FINAL ASSESSMENT"));
}

#[test]
fn test_research_prompt_embeds_parameters() {
    let (start, end) = audit_window(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    let prompt = build_research_prompt("27447", "Knee replacement claims", start, end);

    assert!(prompt.contains("CPT code: 27447"));
    assert!(prompt.contains("Audit Window: 2021-06-16 through 2024-06-15"));
    assert!(prompt.contains("Context Information: Knee replacement claims"));
}

#[test]
fn test_research_prompt_requests_machine_delimiters() {
    let (start, end) = audit_window(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    let prompt = build_research_prompt("27447", "", start, end);

    assert!(prompt.contains("<SECTION_N>"));
    assert!(prompt.contains("<TITLE>"));
    assert!(prompt.contains("<CONTENT>"));
    assert!(prompt.contains("<FINAL_ASSESSMENT>"));
}

// ============================================================================
// Discovery Prompt Tests
// ============================================================================

#[test]
fn test_discovery_prompt_asks_for_five_codes() {
    let prompt = build_code_discovery_prompt("knee arthroscopy");
    assert!(prompt.contains("Topic: knee arthroscopy"));
    assert!(prompt.contains("top 5 most relevant CPT codes"));
    assert!(prompt.contains("CODE: [5-digit code] | DESCRIPTION: [brief description]"));
}
