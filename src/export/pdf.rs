//! Document Export
//!
//! Renders a research result into a paginated letter-size PDF: a title, a
//! metadata block, then the analysis text line by line with SECTION/FINAL
//! lines set as bold subheadings.

use chrono::Local;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::research::prompts::audit_window_today;
use crate::utils::error::{AppError, AppResult};

// Letter page with 0.75in side/bottom margins and a 1in top margin.
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 19.05;
const TOP_MARGIN_MM: f32 = 25.4;

const TITLE_SIZE: f32 = 24.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 10.0;

/// Escape markup-significant characters in a content line.
pub fn escape_markup(line: &str) -> String {
    line.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    cursor_mm: f32,
}

impl<'a> PageWriter<'a> {
    fn new(doc: &'a PdfDocumentReference, layer: PdfLayerReference) -> Self {
        Self {
            doc,
            layer,
            cursor_mm: PAGE_HEIGHT_MM - TOP_MARGIN_MM,
        }
    }

    fn write_line(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        let line_height = size * 0.55;
        if self.cursor_mm - line_height < MARGIN_MM {
            let (page, layer) = self.doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                "content",
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.cursor_mm = PAGE_HEIGHT_MM - TOP_MARGIN_MM;
        }
        self.cursor_mm -= line_height;
        self.layer
            .use_text(text, size, Mm(MARGIN_MM), Mm(self.cursor_mm), font);
    }

    fn space(&mut self, mm: f32) {
        self.cursor_mm -= mm;
    }
}

/// Render the research text for `code` as PDF bytes.
pub fn to_document(result_text: &str, code: &str) -> AppResult<Vec<u8>> {
    let (window_start, window_end) = audit_window_today();
    let report_date = Local::now().format("%Y-%m-%d %H:%M").to_string();

    let (doc, page, layer) = PdfDocument::new(
        "APC Target Code Research Report",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "content",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::export(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::export(e.to_string()))?;

    let first_layer = doc.get_page(page).get_layer(layer);
    let mut writer = PageWriter::new(&doc, first_layer);

    writer.write_line("APC Target Code Research Report", TITLE_SIZE, &bold);
    writer.space(8.0);

    writer.write_line("Report Details", HEADING_SIZE, &bold);
    writer.write_line(&format!("CPT Code: {}", code), BODY_SIZE, &regular);
    writer.write_line(&format!("Report Date: {}", report_date), BODY_SIZE, &regular);
    writer.write_line(
        &format!(
            "Audit Window: {} to {}",
            window_start.format("%Y-%m-%d"),
            window_end.format("%Y-%m-%d")
        ),
        BODY_SIZE,
        &regular,
    );
    writer.space(6.0);

    writer.write_line("Analysis Report", HEADING_SIZE, &bold);
    writer.space(2.0);

    for line in result_text.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            writer.space(1.5);
        } else if trimmed.starts_with("SECTION") || trimmed.starts_with("FINAL") {
            writer.space(3.0);
            writer.write_line(trimmed, HEADING_SIZE, &bold);
        } else {
            writer.write_line(&escape_markup(line), BODY_SIZE, &regular);
        }
    }

    doc.save_to_bytes()
        .map_err(|e| AppError::export(e.to_string()))
}
