use std::collections::HashSet;

use crate::model::ExtractionResult;

const SHOWN_URLS: usize = 5;

/// Human-readable summary of one extraction. Read-only; callers decide where
/// to print it.
#[must_use]
pub fn render_summary(result: &ExtractionResult) -> String {
    let rule = "=".repeat(60);
    let mut out = String::new();

    out.push_str(&format!("\n{rule}\nPDF EXTRACTION SUMMARY\n{rule}\n"));

    let total_chars: usize = result
        .pages_text
        .iter()
        .map(|page| page.content.chars().count())
        .sum();
    out.push_str(&format!(
        "\nTEXT:\n   Pages with text: {}\n   Total characters: {total_chars}\n",
        result.pages_text.len()
    ));

    out.push_str(&format!(
        "\nTABLES:\n   Total tables found: {}\n",
        result.tables.len()
    ));
    for table in &result.tables {
        let rows = table.rows.len();
        let cols = table.rows.first().map_or(0, Vec::len);
        out.push_str(&format!(
            "   - Page {}, Table {}: {rows}x{cols}\n",
            table.page, table.index
        ));
    }

    out.push_str(&format!(
        "\nIMAGES:\n   Total images extracted: {}\n",
        result.images.len()
    ));
    for image in &result.images {
        let size_kb = image.byte_size as f64 / 1024.0;
        let detail = format!("{}x{}, {size_kb:.2} KB", image.width, image.height);
        match &image.saved_path {
            Some(path) => out.push_str(&format!(
                "   - Page {}: {} ({detail})\n",
                image.page,
                path.display()
            )),
            None => out.push_str(&format!(
                "   - Page {}: Image {} ({detail})\n",
                image.page, image.index
            )),
        }
    }

    let mut seen = HashSet::new();
    let distinct_urls: Vec<&str> = result
        .urls
        .iter()
        .map(|entry| entry.url.as_str())
        .filter(|url| seen.insert(*url))
        .collect();
    out.push_str(&format!(
        "\nURLS:\n   Total URLs found: {}\n",
        distinct_urls.len()
    ));
    for url in distinct_urls.iter().take(SHOWN_URLS) {
        out.push_str(&format!("   - {url}\n"));
    }
    if distinct_urls.len() > SHOWN_URLS {
        out.push_str(&format!(
            "   ... and {} more\n",
            distinct_urls.len() - SHOWN_URLS
        ));
    }

    let total_numbers: usize = result.numbers.iter().map(|entry| entry.values.len()).sum();
    out.push_str(&format!(
        "\nNUMBERS:\n   Total numbers found: {total_numbers}\n"
    ));

    out.push_str(&format!("\n{rule}\n"));
    out
}
