//! Spreadsheet Export
//!
//! Renders a research result into an xlsx workbook: a summary sheet, a fixed
//! section-status sheet, and the raw analysis text chunked across
//! `Analysis_PartN` sheets.

use chrono::Local;
use rust_xlsxwriter::Workbook;

use crate::research::prompts::{audit_window_today, SECTION_TITLES};
use crate::utils::error::{AppError, AppResult};

/// Max lines of analysis text per sheet.
const LINES_PER_SHEET: usize = 50;

/// Render the research text for `code` as xlsx bytes.
pub fn to_spreadsheet(result_text: &str, code: &str) -> AppResult<Vec<u8>> {
    let (window_start, window_end) = audit_window_today();
    let report_date = Local::now().format("%Y-%m-%d %H:%M").to_string();

    let mut workbook = Workbook::new();

    let summary = workbook.add_worksheet();
    summary
        .set_name("Summary")
        .map_err(|e| AppError::export(e.to_string()))?;
    let window_start = window_start.format("%Y-%m-%d").to_string();
    let window_end = window_end.format("%Y-%m-%d").to_string();
    let summary_rows = [
        ("Report Date", report_date.as_str()),
        ("CPT Code", code),
        ("Audit Window Start", window_start.as_str()),
        ("Audit Window End", window_end.as_str()),
    ];
    write_cell(summary, 0, 0, "Field")?;
    write_cell(summary, 0, 1, "Value")?;
    for (i, (field, value)) in summary_rows.iter().enumerate() {
        write_cell(summary, (i + 1) as u32, 0, field)?;
        write_cell(summary, (i + 1) as u32, 1, value)?;
    }

    let sections = workbook.add_worksheet();
    sections
        .set_name("Sections")
        .map_err(|e| AppError::export(e.to_string()))?;
    write_cell(sections, 0, 0, "Section")?;
    write_cell(sections, 0, 1, "Status")?;
    for (i, title) in SECTION_TITLES.iter().enumerate() {
        write_cell(sections, (i + 1) as u32, 0, title)?;
        write_cell(sections, (i + 1) as u32, 1, "Completed")?;
    }

    let lines: Vec<&str> = result_text.split('\n').collect();
    for (part, chunk) in lines.chunks(LINES_PER_SHEET).enumerate() {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(format!("Analysis_Part{}", part + 1))
            .map_err(|e| AppError::export(e.to_string()))?;
        write_cell(sheet, 0, 0, "Content")?;
        for (i, line) in chunk.iter().enumerate() {
            write_cell(sheet, (i + 1) as u32, 0, line)?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| AppError::export(e.to_string()))
}

fn write_cell(
    sheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    value: &str,
) -> AppResult<()> {
    sheet
        .write_string(row, col, value)
        .map_err(|e| AppError::export(e.to_string()))?;
    Ok(())
}
