//! Terminal rendering of rich-text document bodies.
//!
//! Bodies are HTML authored in the spreadsheet. html2text lays them out as
//! wrapped plain text; decorations like `**bold**` and link footnotes are
//! left off. Nothing here is a sanitizer for HTML output.

use html2text::render::text_renderer::TrivialDecorator;

/// Narrowest width handed to the renderer.
const MIN_WIDTH: usize = 20;

/// Plain-text lines of an HTML body wrapped to `width`, blank lines removed.
pub fn plain_lines(html: &str, width: usize) -> Vec<String> {
    let text = html2text::from_read_with_decorator(
        html.as_bytes(),
        width.max(MIN_WIDTH),
        TrivialDecorator::new(),
    );
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
