//! Prompt Construction
//!
//! Pure builders for the research and code-discovery prompts, plus the audit
//! window arithmetic they embed. Nothing here touches the network or the
//! store.

use chrono::{Duration, Local, NaiveDate};

/// Days in the trailing claims-review window (3 years).
const AUDIT_WINDOW_DAYS: i64 = 1095;

/// The six canonical analysis section titles, in order.
pub const SECTION_TITLES: [&str; 6] = [
    "Code Description Analysis",
    "Guideline Examination",
    "Payment Rate Comparison",
    "Device Code Analysis",
    "NCCI Compliance Check",
    "Reference Material Review",
];

/// System prompt for code-discovery calls.
pub const CODE_DISCOVERY_SYSTEM_PROMPT: &str =
    "You are an expert medical coding specialist with deep knowledge of CPT codes.";

/// System prompt for the main research call.
pub const RESEARCH_SYSTEM_PROMPT: &str =
    "You are an expert medical coding analyst specializing in APC research.";

/// System prompt for freeform session chat.
pub const CHAT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant with the persona of a CCV Researcher.";

/// Fixed system turn prepended when reconstructing a persisted session.
pub const HISTORY_SYSTEM_PROMPT: &str = "You are an APC research assistant.";

/// Map a persona label to its chat prompt prefix. Unknown labels get a
/// general-purpose fallback.
pub fn persona_prompt(persona: &str) -> &'static str {
    match persona {
        "Developer" => "You are a technical assistant helping with code, architecture, and debugging.",
        "Researcher" => "You are an APC research assistant helping with clinical and data insights.",
        "Manager" => "You are a strategic assistant helping with summaries, timelines, and decisions.",
        "Clinician" => "You are a clinical assistant helping with patient data and medical literature.",
        _ => "You are a helpful general-purpose assistant.",
    }
}

/// Compute the audit window ending on `today`: exactly 1095 days back.
pub fn audit_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today - Duration::days(AUDIT_WINDOW_DAYS);
    (start, today)
}

/// Audit window ending on the current local date. Recomputed on every call.
pub fn audit_window_today() -> (NaiveDate, NaiveDate) {
    audit_window(Local::now().date_naive())
}

/// Build the six-section APC research prompt for a target CPT code.
pub fn build_research_prompt(
    code: &str,
    context: &str,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> String {
    let context_text = if context.trim().is_empty() {
        "Not specified"
    } else {
        context
    };

    format!(
        r#"As a medical coding specialist focused on APC analysis, perform a thorough evaluation for CPT code: {code}

Audit Window: {start} through {end}

Context Information: {context_text}

Complete the following analysis sections:

SECTION 1 - Code Description Analysis
- Review detailed descriptions for {code} and neighboring codes
- List neighboring codes in ASCENDING ORDER (from lowest to highest code number)
- Detect re-coding possibilities considering:
  - Procedural approach variations (open, percutaneous, laparoscopic)
  - Anatomical location differences
  - Intervention technique specifics
  - Potential bundling scenarios

SECTION 2 - Guideline Examination
- Extract instructional notes specific to {code}
- Summarize applicable chapter-level guidelines
- Note parenthetical references and code relationships

SECTION 3 - Payment Rate Comparison
- Evaluate APC assignments and payment rates for {code} and related codes
- Present the comparison in a TABLE format with the following columns:
  | CPT Code | APC Code | Payment Rate | Status | Notes |
- Categorize findings:
  - Matching rates: no audit opportunity
  - Differing rates: investigate further
- Track rate consistency across quarters/years within audit window
- Flag potential underpayment or overpayment patterns
- Use markdown table format for clear presentation

SECTION 4 - Device Code Analysis
- Confirm if {code} involves medical devices
- List relevant HCPCS device codes
- Highlight common errors:
  - Procedure without device code
  - Device-procedure mismatch
  - Incorrect device type selection

SECTION 5 - NCCI Compliance Check
- Reference NCCI Edit Manual for {code}
- Examine PTP (Procedure-to-Procedure) edits
- Detect modifier abuse patterns:
  - Inappropriate modifier 59 usage
  - Modifier 25 misapplication
  - Other unbundling indicators

SECTION 6 - Reference Material Review
- Locate CPT Assistant guidance for {code}
- Find applicable HCPCS Coding Clinic articles
- Document special coding considerations

FINAL ASSESSMENT
- Consolidate findings and opportunities
- Assign priority level (Critical/Moderate/Low)
- Recommend validation steps

CRITICAL OUTPUT FORMAT REQUIREMENT:
Wrap each section in explicit delimiters so the output can be parsed mechanically. For every section N from 1 to 6, emit:

<SECTION_N>
<TITLE>section title here</TITLE>
<CONTENT>
section content here
</CONTENT>
</SECTION_N>

Then wrap the final assessment as:

<FINAL_ASSESSMENT>
final assessment content here
</FINAL_ASSESSMENT>

Use markdown tables where specified inside the content blocks."#,
        code = code,
        start = window_start.format("%Y-%m-%d"),
        end = window_end.format("%Y-%m-%d"),
        context_text = context_text,
    )
}

/// Build the code-discovery prompt asking for exactly 5 candidate codes.
pub fn build_code_discovery_prompt(topic: &str) -> String {
    format!(
        r#"You are a medical coding expert. Given the following medical procedure or condition topic, provide the top 5 most relevant CPT codes.

Topic: {topic}

For each CPT code, provide:
1. The CPT code number
2. A brief description (one line)

Format your response EXACTLY as follows (one code per line):
CODE: [5-digit code] | DESCRIPTION: [brief description]

Example format:
CODE: 99213 | DESCRIPTION: Office visit, established patient, moderate complexity
CODE: 99214 | DESCRIPTION: Office visit, established patient, high complexity

Provide exactly 5 CPT codes. If the topic is too vague or unclear, provide the most commonly associated codes."#,
        topic = topic,
    )
}
