use std::collections::BTreeMap;

use encoding_rs::UTF_16BE;
use lopdf::content::Content;
use lopdf::{Document, Object};
use tracing::warn;

use crate::tables::split_line_into_cells;
use crate::warning::{ExtractWarning, WarningCode};

/// Whole-document text from pdf-extract, pre-split per page when the
/// form-feed chunk count lines up with the real page count.
#[derive(Debug, Default)]
pub(crate) struct DocumentText {
    per_page: Option<Vec<String>>,
    whole: Option<String>,
}

impl DocumentText {
    pub(crate) fn new(raw_text: Option<&str>, page_count: usize) -> Self {
        let Some(raw_text) = raw_text else {
            return Self::default();
        };

        let pages = split_text_into_pages(raw_text);
        if pages.len() == page_count {
            Self {
                per_page: Some(pages),
                whole: None,
            }
        } else {
            Self {
                per_page: None,
                whole: Some(raw_text.to_string()),
            }
        }
    }
}

fn split_text_into_pages(raw_text: &str) -> Vec<String> {
    let mut pages = raw_text
        .split('\u{000C}')
        .map(str::to_string)
        .collect::<Vec<_>>();
    if pages.last().is_some_and(String::is_empty) {
        pages.pop();
    }
    pages
}

fn looks_decoding_broken(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }

    if text.contains("?Identity-H Unimplemented?") {
        return true;
    }

    let total = text.chars().count();
    let replacement = text.matches('\u{FFFD}').count();
    let control = text
        .chars()
        .filter(|ch| ch.is_control() && !matches!(ch, '\n' | '\r' | '\t'))
        .count();

    replacement * 8 > total || control * 5 > total
}

fn decode_pdf_bytes(encoding: Option<&str>, bytes: &[u8]) -> String {
    // Strings starting with the FE FF marker are UTF-16BE per the PDF spec.
    if let Some(tail) = bytes.strip_prefix(&[0xFE, 0xFF][..]) {
        let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(tail);
        if !had_errors && !utf16.is_empty() {
            return utf16.into_owned();
        }
    }

    let decoded = Document::decode_text(encoding, bytes);
    if !looks_decoding_broken(&decoded) {
        return decoded;
    }

    if let Some(name) = encoding {
        let lower = name.to_ascii_lowercase();
        if lower.contains("utf16")
            || lower.contains("ucs2")
            || lower.contains("identity-h")
            || lower.contains("unicode")
        {
            let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(bytes);
            if !had_errors && !utf16.is_empty() {
                return utf16.into_owned();
            }
        }
    }

    String::from_utf8_lossy(bytes).to_string()
}

/// Rough quality score; used to pick the best of several extraction
/// candidates for one page.
fn extraction_quality_score(text: &str) -> i64 {
    if text.trim().is_empty() {
        return i64::MIN / 4;
    }

    let mut non_empty_lines = 0_i64;
    let mut multi_cell_lines = 0_i64;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        non_empty_lines += 1;
        if split_line_into_cells(line).len() >= 2 {
            multi_cell_lines += 1;
        }
    }

    let broken_penalty = if looks_decoding_broken(text) { 800 } else { 0 };
    multi_cell_lines * 50 + non_empty_lines - broken_penalty
}

fn choose_best_text(candidates: &[String]) -> String {
    candidates
        .iter()
        .max_by_key(|text| extraction_quality_score(text))
        .cloned()
        .unwrap_or_default()
}

fn extract_text_from_ops(
    document: &Document,
    page_id: lopdf::ObjectId,
) -> Result<Option<String>, lopdf::Error> {
    fn collect_text(text: &mut String, encoding: Option<&str>, operands: &[Object]) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => {
                    text.push_str(&decode_pdf_bytes(encoding, bytes));
                }
                Object::Array(items) => {
                    collect_text(text, encoding, items);
                    text.push(' ');
                }
                Object::Integer(value) => {
                    if *value < -100 {
                        text.push(' ');
                    }
                }
                _ => {}
            }
        }
    }

    let raw_content = document.get_page_content(page_id)?;
    let content = Content::decode(&raw_content)?;
    let encodings = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect::<BTreeMap<Vec<u8>, &str>>();

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_encoding = None;
    for operation in content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                if let Some(font_name) = operation
                    .operands
                    .first()
                    .and_then(|operand| operand.as_name().ok())
                {
                    current_encoding = encodings.get(font_name).copied();
                }
            }
            "Tj" | "TJ" | "'" | "\"" => {
                collect_text(&mut current, current_encoding, &operation.operands);
            }
            "T*" | "Td" | "TD" | "ET" => {
                if !current.trim().is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
            }
            _ => {}
        }
    }

    if !current.trim().is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        Ok(None)
    } else {
        Ok(Some(lines.join("\n")))
    }
}

/// Best-effort text for one page. `page_index` is the page's position in the
/// document's full page map, which is what the pdf-extract split is keyed by.
/// Returns `None` when no candidate recovered non-empty text.
pub(crate) fn extract_page_text(
    document: &Document,
    page_no: u32,
    page_id: lopdf::ObjectId,
    page_index: usize,
    doc_text: &DocumentText,
    warnings: &mut Vec<ExtractWarning>,
) -> Option<String> {
    let mut candidates = Vec::new();

    if let Some(text) = doc_text
        .per_page
        .as_ref()
        .and_then(|pages| pages.get(page_index).cloned())
        .filter(|text| !text.trim().is_empty())
    {
        candidates.push(text);
    }

    match extract_text_from_ops(document, page_id) {
        Ok(Some(text)) => candidates.push(text),
        Ok(None) => {}
        Err(error) => {
            warn!(page = page_no, %error, "page content stream unreadable");
            warnings.push(
                ExtractWarning::new(
                    WarningCode::PageTextUnreadable,
                    format!("page content stream unreadable: {error}"),
                )
                .with_page(page_no),
            );
        }
    }

    if let Some(text) = document
        .extract_text(&[page_no])
        .ok()
        .filter(|text| !text.trim().is_empty())
    {
        candidates.push(text);
    }

    // A short first page with a document-level-only pdf-extract result often
    // means the per-page candidates missed most of the content.
    let local_best_score = candidates
        .iter()
        .map(|text| extraction_quality_score(text))
        .max()
        .unwrap_or(i64::MIN / 4);
    if page_index == 0
        && local_best_score < 80
        && let Some(text) = doc_text
            .whole
            .as_ref()
            .filter(|text| !text.trim().is_empty())
            .cloned()
    {
        candidates.push(text);
    }

    let text = choose_best_text(&candidates);
    if text.trim().is_empty() { None } else { Some(text) }
}
