/// Split on tabs or runs of two-plus spaces; single spaces stay inside a cell.
pub(crate) fn split_line_into_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut whitespace_run = 0_usize;

    for ch in trimmed.chars() {
        if ch == '\t' {
            if !current.trim().is_empty() {
                cells.push(current.trim().to_string());
                current.clear();
            }
            whitespace_run = 0;
            continue;
        }

        if ch.is_whitespace() {
            whitespace_run += 1;
            if whitespace_run >= 2 {
                if !current.trim().is_empty() {
                    cells.push(current.trim().to_string());
                    current.clear();
                }
                continue;
            }
            current.push(' ');
            continue;
        }

        whitespace_run = 0;
        current.push(ch);
    }

    if !current.trim().is_empty() {
        cells.push(current.trim().to_string());
    }

    cells
}

pub(crate) fn soft_split_line_into_cells(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

fn line_cells(line: &str, min_cols: usize) -> Vec<String> {
    let cells = split_line_into_cells(line);
    if cells.len() >= min_cols {
        return cells;
    }

    // Columnar PDFs sometimes come back with single-space gaps. Accept the
    // soft split unless the line reads like prose.
    let soft_cells = soft_split_line_into_cells(line);
    let has_numeric = soft_cells
        .iter()
        .any(|cell| cell.chars().any(|ch| ch.is_ascii_digit()));
    let looks_like_sentence = ['.', '!', '?']
        .iter()
        .any(|punctuation| line.trim_end().ends_with(*punctuation));
    if soft_cells.len() >= min_cols
        && !looks_like_sentence
        && (has_numeric || soft_cells.len() <= 6)
    {
        return soft_cells;
    }

    cells
}

/// Runs of two-plus consecutive multi-cell lines become tables. Rows stay
/// ragged; no padding to a rectangle.
pub(crate) fn detect_tables(text: &str, min_cols: usize) -> Vec<Vec<Vec<String>>> {
    let min_cols = min_cols.max(2);
    let mut tables = Vec::new();
    let mut current_rows: Vec<Vec<String>> = Vec::new();

    let flush_current = |rows: &mut Vec<Vec<String>>, tables: &mut Vec<Vec<Vec<String>>>| {
        if rows.len() >= 2 {
            tables.push(std::mem::take(rows));
        } else {
            rows.clear();
        }
    };

    for line in text.lines() {
        let cells = line_cells(line, min_cols);
        if cells.len() >= min_cols {
            current_rows.push(cells);
        } else {
            flush_current(&mut current_rows, &mut tables);
        }
    }

    flush_current(&mut current_rows, &mut tables);
    tables
}
