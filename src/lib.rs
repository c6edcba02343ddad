mod error;
mod export;
mod images;
mod model;
mod options;
mod pdf_text;
mod recognize;
mod report;
mod tables;
mod warning;

use std::fs;
use std::path::Path;

use lopdf::Document;
use serde::Serialize;
use tracing::{debug, info};

use crate::pdf_text::DocumentText;

pub use error::ExtractError;
pub use export::{write_table_artifacts, write_text_artifact};
pub use model::{ExtractionResult, Numeric, PageImage, PageNumbers, PageTable, PageText, PageUrl};
pub use options::{ExtractOptions, ImageMode, PageSelection};
pub use report::render_summary;
pub use warning::{ExtractWarning, WarningCode};

/// Everything one extraction produced: the aggregated result plus the
/// warnings collected for items that had to be skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionOutcome {
    pub result: ExtractionResult,
    pub warnings: Vec<ExtractWarning>,
}

fn validate_options(options: &ExtractOptions) -> Result<(), ExtractError> {
    if options.min_cols < 2 {
        return Err(ExtractError::InvalidOption(
            "min_cols must be at least 2".to_string(),
        ));
    }
    Ok(())
}

/// Extract text, tables, images, URLs, and numeric tokens from the PDF at
/// `input_pdf`. A fresh result is built per call; failure to open the source
/// is the only fatal extraction error.
pub fn extract_pdf(
    input_pdf: &Path,
    options: &ExtractOptions,
) -> Result<ExtractionOutcome, ExtractError> {
    validate_options(options)?;
    let document = Document::load(input_pdf).map_err(|source| ExtractError::SourceOpen {
        path: input_pdf.to_path_buf(),
        source,
    })?;
    let raw_text = pdf_extract::extract_text(input_pdf).ok();
    extract_from_document(&document, raw_text.as_deref(), options)
}

pub fn extract_pdf_from_bytes(
    input_pdf: &[u8],
    options: &ExtractOptions,
) -> Result<ExtractionOutcome, ExtractError> {
    validate_options(options)?;
    let document = Document::load_mem(input_pdf).map_err(ExtractError::SourceParse)?;
    let raw_text = pdf_extract::extract_text_from_mem(input_pdf).ok();
    extract_from_document(&document, raw_text.as_deref(), options)
}

fn extract_from_document(
    document: &Document,
    raw_text: Option<&str>,
    options: &ExtractOptions,
) -> Result<ExtractionOutcome, ExtractError> {
    let pages_map = document.get_pages();

    if let Some(selection) = &options.pages
        && !pages_map.keys().any(|page| selection.contains(*page))
    {
        return Err(ExtractError::NoPagesSelected);
    }

    if options.save_images {
        fs::create_dir_all(&options.image_dir)?;
    }

    let doc_text = DocumentText::new(raw_text, pages_map.len());
    let mut warnings = Vec::new();
    let mut result = ExtractionResult::default();

    for (index, (page_no, page_id)) in pages_map.iter().enumerate() {
        if let Some(selection) = &options.pages
            && !selection.contains(*page_no)
        {
            continue;
        }

        debug!(page = *page_no, "processing page");

        if let Some(text) =
            pdf_text::extract_page_text(document, *page_no, *page_id, index, &doc_text, &mut warnings)
        {
            for url in recognize::find_urls(&text) {
                result.urls.push(PageUrl {
                    page: *page_no,
                    url,
                });
            }

            let values = recognize::find_numbers(&text);
            if !values.is_empty() {
                result.numbers.push(PageNumbers {
                    page: *page_no,
                    values,
                });
            }

            let detected = tables::detect_tables(&text, options.min_cols);
            for (table_index, rows) in detected.into_iter().enumerate() {
                result.tables.push(PageTable {
                    page: *page_no,
                    index: table_index + 1,
                    rows,
                });
            }

            result.pages_text.push(PageText {
                page: *page_no,
                content: text,
            });
        }

        let images = images::extract_page_images(document, *page_id, *page_no, options, &mut warnings);
        result.images.extend(images);
    }

    info!(
        pages_with_text = result.pages_text.len(),
        tables = result.tables.len(),
        images = result.images.len(),
        warnings = warnings.len(),
        "extraction completed"
    );

    Ok(ExtractionOutcome { result, warnings })
}
