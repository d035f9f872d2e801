//! Re-rendering of GFM tables with aligned columns.

use unicode_width::UnicodeWidthStr;

use super::tokenize::ColumnAlignment;

const MIN_COLUMN_WIDTH: usize = 3;

/// Normalize rendered cell content: one line, no surrounding whitespace and
/// no unescaped pipe at either edge.
pub fn clean_cell(text: &str) -> String {
    let mut cell = text.replace(['\r', '\n'], " ");
    loop {
        let trimmed = cell.trim();
        let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
        let trimmed = match trimmed.strip_suffix('|') {
            Some(rest) if !rest.ends_with('\\') => rest,
            _ => trimmed,
        };
        let trimmed = trimmed.trim();
        if trimmed.len() == cell.len() {
            return cell;
        }
        cell = trimmed.to_string();
    }
}

/// Render `rows` (header first) as a padded table. Every line after the
/// first is prefixed with `line_prefix`.
pub fn render_table(
    alignments: &[ColumnAlignment],
    rows: &[Vec<String>],
    line_prefix: &str,
    trailing_newline: bool,
) -> String {
    let columns = rows
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(alignments.len());
    let alignment = |c: usize| alignments.get(c).copied().unwrap_or(ColumnAlignment::None);

    let mut widths = vec![MIN_COLUMN_WIDTH; columns];
    for row in rows {
        for (c, cell) in row.iter().enumerate() {
            widths[c] = widths[c].max(cell.width());
        }
    }

    let render_row = |row: &[String]| {
        let cells: Vec<String> = (0..columns)
            .map(|c| {
                let cell = row.get(c).map_or("", String::as_str);
                pad(cell, widths[c], alignment(c))
            })
            .collect();
        format!("| {} |", cells.join(" | "))
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    if let Some((header, body)) = rows.split_first() {
        lines.push(render_row(header.as_slice()));
        let separator: Vec<String> = (0..columns)
            .map(|c| separator(widths[c], alignment(c)))
            .collect();
        lines.push(format!("| {} |", separator.join(" | ")));
        lines.extend(body.iter().map(|row| render_row(row.as_slice())));
    }

    let mut out = lines.join(&format!("\n{line_prefix}"));
    if trailing_newline {
        out.push('\n');
    }
    out
}

fn pad(cell: &str, width: usize, alignment: ColumnAlignment) -> String {
    let fill = width.saturating_sub(cell.width());
    match alignment {
        ColumnAlignment::Right => format!("{}{cell}", " ".repeat(fill)),
        ColumnAlignment::Center => {
            let left = fill / 2;
            format!("{}{cell}{}", " ".repeat(left), " ".repeat(fill - left))
        }
        ColumnAlignment::Left | ColumnAlignment::None => format!("{cell}{}", " ".repeat(fill)),
    }
}

fn separator(width: usize, alignment: ColumnAlignment) -> String {
    match alignment {
        ColumnAlignment::None => "-".repeat(width),
        ColumnAlignment::Left => format!(":{}", "-".repeat(width - 1)),
        ColumnAlignment::Right => format!("{}:", "-".repeat(width - 1)),
        ColumnAlignment::Center => format!(":{}:", "-".repeat(width - 2)),
    }
}
