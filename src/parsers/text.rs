use serde::{Deserialize, Serialize};

/// Layout kept when normalizing extracted text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextLayout {
    /// Paragraphs separated by exactly one blank line
    #[default]
    Paragraphs,
    /// Everything on one line
    Flat,
}

/// Normalizes whitespace in `text` according to `layout`.
///
/// Lines are trimmed, runs of whitespace collapse to a single space and
/// blank lines mark paragraph boundaries.
pub fn normalize(text: &str, layout: TextLayout) -> String {
    let paragraphs = split_into_paragraphs(text)
        .iter()
        .map(|lines| collapse_whitespace(&lines.join(" ")))
        .collect::<Vec<_>>();

    match layout {
        TextLayout::Paragraphs => paragraphs.join("\n\n"),
        TextLayout::Flat => paragraphs.join(" "),
    }
}

/// Splits text into paragraphs of trimmed, non-empty lines
pub fn split_into_paragraphs(text: &str) -> Vec<Vec<&str>> {
    let mut paragraphs: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}

/// Collapses every whitespace run in `segment` into a single space
pub fn collapse_whitespace(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}
