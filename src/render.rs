//! Plain-text rendering of a document for `--print`.

use grider_core::Document;
use grider_engine::engine::CellRef;

/// The used area, one line per row, each column padded (or cut) to its width.
/// Columns are headed by their letters and rows by their 1-based numbers.
pub fn render_used_area(doc: &Document) -> String {
    let (rows, cols) = doc.used_extent();
    if rows == 0 {
        return String::new();
    }
    let gutter = rows.to_string().len();

    let mut out = format!("{:gutter$}", "");
    for col in 0..cols {
        out.push(' ');
        out.push_str(&fit(&CellRef::col_to_letters(col), doc.col_widths[col]));
    }
    out = out.trim_end().to_string();
    out.push('\n');

    for row in 0..rows {
        let mut line = format!("{:>gutter$}", row + 1);
        for col in 0..cols {
            line.push(' ');
            let text = doc.display_text(&CellRef::new(col, row));
            line.push_str(&fit(&text, doc.col_widths[col]));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn fit(text: &str, width: usize) -> String {
    let mut cut: String = text.chars().take(width).collect();
    let len = cut.chars().count();
    cut.extend(std::iter::repeat_n(' ', width - len));
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_renders_nothing() {
        assert_eq!(render_used_area(&Document::new()), "");
    }

    #[test]
    fn test_render_used_area() {
        let mut doc = Document::new();
        doc.set_all_column_widths(5).unwrap();
        doc.set_cell_by_name("A1", "width").unwrap();
        doc.set_cell_by_name("B2", "=2*21").unwrap();
        doc.set_cell_by_name("A2", "truncated").unwrap();
        assert_eq!(
            render_used_area(&doc),
            "  A     B\n1 width\n2 trunc 42\n"
        );
    }
}
