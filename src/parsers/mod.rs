pub mod html;
pub mod text;

#[cfg(test)]
mod tests;

pub use text::TextLayout;

/// Converts an HTML document into plain visible text.
///
/// Link targets are discarded, block elements become paragraphs and
/// whitespace is normalized according to `layout`.
pub fn html_to_text(html: &str, layout: TextLayout) -> String {
    let blocks = html::visible_blocks(html);
    ::log::trace!("Extracted {} text blocks", blocks.len());
    text::normalize(&blocks.join("\n\n"), layout)
}
