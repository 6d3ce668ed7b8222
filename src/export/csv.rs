//! CSV rendering (RFC 4180)

use crate::export::table::Table;

/// Renders a table as CSV: one header record, then one record per row
///
/// Records end with CRLF. Fields containing separators, quotes, line breaks
/// or surrounding whitespace are quoted, with inner quotes doubled.
pub fn render_csv(table: &Table) -> String {
    let mut out = String::new();

    push_record(&mut out, table.headers());
    for row in table.rows() {
        push_record(&mut out, row);
    }

    out
}

fn push_record(out: &mut String, fields: &[String]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
    let needs_quotes = field.contains([',', '"', '\n', '\r'])
        || field.starts_with(char::is_whitespace)
        || field.ends_with(char::is_whitespace);

    if needs_quotes {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}
