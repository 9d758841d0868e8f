//! Plain-text grid for `list`.

use unicode_width::UnicodeWidthStr;

/// Titles per row.
pub const COLUMNS: usize = 4;

pub fn group_titles<S: AsRef<str>>(titles: &[S]) -> Vec<Vec<&str>> {
    titles
        .chunks(COLUMNS)
        .map(|row| row.iter().map(AsRef::as_ref).collect())
        .collect()
}

pub fn render_table<S: AsRef<str>>(titles: &[S]) -> String {
    let rows = group_titles(titles);
    let columns = rows.first().map_or(0, Vec::len);
    if columns == 0 {
        return String::new();
    }

    let mut widths = vec![0usize; columns];
    for row in &rows {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(cell.width());
        }
    }

    let mut border = String::from("+");
    for width in &widths {
        border.push_str(&"-".repeat(width + 2));
        border.push('+');
    }

    let mut out = format!("{border}\n");
    for row in &rows {
        out.push('|');
        for (col, &width) in widths.iter().enumerate() {
            let cell = row.get(col).copied().unwrap_or("");
            let pad = width - cell.width();
            out.push_str(&format!(" {cell}{} |", " ".repeat(pad)));
        }
        out.push('\n');
        out.push_str(&border);
        out.push('\n');
    }

    out
}
