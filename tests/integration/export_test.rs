//! Export Integration Tests
//!
//! Tests that both export formats produce well-formed byte streams for
//! realistic analysis text.

use ccv_research::export::{export_filename, to_document, to_spreadsheet};

fn sample_analysis() -> String {
    let mut out = String::new();
    for n in 1..=6 {
        out.push_str(&format!("SECTION {} - Analysis heading\n", n));
        for i in 0..12 {
            out.push_str(&format!("Finding {} for section {} with <markup> & symbols.\n", i, n));
        }
        out.push('\n');
    }
    out.push_str("FINAL ASSESSMENT\nPriority: Moderate\n");
    out
}

#[test]
fn test_spreadsheet_bytes_are_zip() {
    let bytes = to_spreadsheet(&sample_analysis(), "29881").unwrap();
    assert!(bytes.len() > 1000);
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_spreadsheet_empty_text() {
    // Even empty analysis text produces a valid workbook with the summary
    // and status sheets.
    let bytes = to_spreadsheet("", "29881").unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_document_bytes_are_pdf() {
    let bytes = to_document(&sample_analysis(), "29881").unwrap();
    assert!(bytes.len() > 500);
    assert_eq!(&bytes[..5], b"%PDF-");
}

#[test]
fn test_document_multi_page() {
    let long: String = (0..500).map(|i| format!("line {}\n", i)).collect();
    let one_page = to_document("short", "29881").unwrap();
    let many_pages = to_document(&long, "29881").unwrap();
    assert!(many_pages.len() > one_page.len());
}

#[test]
fn test_filenames() {
    let xlsx = export_filename("29881", "xlsx");
    let pdf = export_filename("29881", "pdf");
    assert!(xlsx.starts_with("apc_research_29881_") && xlsx.ends_with(".xlsx"));
    assert!(pdf.starts_with("apc_research_29881_") && pdf.ends_with(".pdf"));
}
