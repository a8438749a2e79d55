//! Row Parser
//!
//! Turns the CSV text exported by the spreadsheet into an ordered sequence of
//! header-keyed records. The exporter is not strict about quoting, so the
//! scanner is lenient: quotes toggle quoted mode anywhere in a field, short
//! rows are padded and long rows truncated to the header width.

use indexmap::IndexMap;

/// Field delimiter used by the spreadsheet CSV export.
pub const DELIMITER: char = ',';
const QUOTE: char = '"';

/// One parsed row: header name to cell value, in header order.
pub type Record = IndexMap<String, String>;

/// Parse CSV text into records keyed by the first non-blank line.
///
/// Returns an empty vector for empty or header-only input.
pub fn parse_records(text: &str) -> Vec<Record> {
    let mut lines = text.split('\n').filter(|line| !line.trim().is_empty());

    let headers: Vec<String> = match lines.next() {
        Some(line) => split_fields(line)
            .into_iter()
            .map(|h| h.trim().trim_matches(QUOTE).trim().to_string())
            .collect(),
        None => return Vec::new(),
    };

    lines
        .map(|line| {
            let mut values = split_fields(line).into_iter();
            headers
                .iter()
                .map(|header| (header.clone(), values.next().unwrap_or_default()))
                .collect()
        })
        .collect()
}

/// Split a single line into fields with the quote-aware scanner.
///
/// Whitespace outside quotes at either end of a field is dropped (this also
/// swallows the `\r` of CRLF exports); whitespace inside quotes is kept.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    // (char, inside quotes)
    let mut current: Vec<(char, bool)> = Vec::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            QUOTE if in_quotes && chars.peek() == Some(&QUOTE) => {
                chars.next();
                current.push((QUOTE, true));
            }
            QUOTE => in_quotes = !in_quotes,
            DELIMITER if !in_quotes => fields.push(finish_field(&mut current)),
            _ => current.push((ch, in_quotes)),
        }
    }
    fields.push(finish_field(&mut current));
    fields
}

fn finish_field(current: &mut Vec<(char, bool)>) -> String {
    let loose = |&(c, quoted): &(char, bool)| !quoted && c.is_whitespace();
    let start = current.iter().position(|c| !loose(c)).unwrap_or(current.len());
    let end = current
        .iter()
        .rposition(|c| !loose(c))
        .map_or(start, |i| i + 1);
    let field = current[start..end].iter().map(|&(c, _)| c).collect();
    current.clear();
    field
}

/// Encode fields as one CSV line that [`split_fields`] reads back verbatim.
///
/// Every field is quoted so delimiters, quotes and edge whitespace survive.
/// Only tests build sheet text this way.
#[cfg(test)]
pub(crate) fn encode_record<S: AsRef<str>>(fields: &[S]) -> String {
    let mut writer = ::csv::WriterBuilder::new()
        .delimiter(DELIMITER as u8)
        .quote_style(::csv::QuoteStyle::Always)
        .from_writer(Vec::new());
    writer
        .write_record(fields.iter().map(|field| field.as_ref()))
        .expect("writing to memory cannot fail");
    let bytes = writer.into_inner().expect("flushing to memory cannot fail");
    let line = String::from_utf8(bytes).expect("fields are UTF-8");
    line.trim_end_matches(['\r', '\n']).to_string()
}
