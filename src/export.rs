use std::fs;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::ExtractError;
use crate::model::ExtractionResult;

const PAGE_BANNER_WIDTH: usize = 60;

/// Write all extracted page text to one UTF-8 file, each page preceded by a
/// `PAGE <n>` banner. Overwrites any previous artifact.
pub fn write_text_artifact(result: &ExtractionResult, path: &Path) -> Result<(), ExtractError> {
    let banner = "=".repeat(PAGE_BANNER_WIDTH);
    let mut out = String::new();
    for page in &result.pages_text {
        out.push('\n');
        out.push_str(&banner);
        out.push('\n');
        out.push_str(&format!("PAGE {}\n", page.page));
        out.push_str(&banner);
        out.push('\n');
        out.push_str(&page.content);
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}

/// Write one delimited file per table at `<dir>/page<N>_table<M>.csv`,
/// creating the directory if needed. Rows are written verbatim; ragged rows
/// are allowed. Overwrites previous artifacts.
pub fn write_table_artifacts(
    result: &ExtractionResult,
    dir: &Path,
    delimiter: u8,
) -> Result<(), ExtractError> {
    fs::create_dir_all(dir)?;

    for table in &result.tables {
        let path = dir.join(format!("page{}_table{}.csv", table.page, table.index));
        let mut writer = WriterBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_path(&path)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }

    Ok(())
}
