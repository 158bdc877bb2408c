//! Rendering of results for the terminal

use data_accessor::Cursor;

/// Render a cursor as a tab-separated header line followed by one line per row.
pub fn render_cursor(cursor: Cursor) -> String {
    let mut out = String::new();
    if cursor.field_count() > 0 {
        out.push_str(&cursor.columns().join("\t"));
        out.push('\n');
    }
    for row in cursor {
        out.push_str(&row.to_string());
        out.push('\n');
    }
    out
}
