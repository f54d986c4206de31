use ego_tree::iter::Edge;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

/// Elements whose content is never visible text
const SKIPPED_ELEMENTS: &[&str] = &[
    "head", "script", "style", "noscript", "template", "svg", "canvas", "iframe",
];

/// Elements that start a new block of text
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "dd", "details", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table",
    "td", "th", "tr", "ul",
];

/// Extracts the raw `href` of every anchor in the document, in document order
pub fn parse_links(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);

    let link_selector = Selector::parse("a[href]").unwrap();
    let links = doc
        .select(&link_selector)
        .filter_map(|e| e.value().attr("href"))
        .map(|s| s.to_string())
        .collect::<Vec<String>>();

    ::log::debug!("HTML parser found {} links", links.len());
    links
}

/// Extracts the visible text of the document as a list of blocks.
///
/// Anchor text is kept, link targets are not. Whitespace inside a block is
/// left as found in the markup. `pre` is an ordinary block, so its line
/// breaks are flattened later like any other text.
pub fn visible_blocks(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let mut collector = BlockCollector::default();
    collector.collect(doc.root_element());
    collector.finish()
}

#[derive(Default)]
struct BlockCollector {
    blocks: Vec<String>,
    current: String,
}

impl BlockCollector {
    /// Walks the tree without recursion; nesting depth is unbounded in real pages
    fn collect(&mut self, root: ElementRef<'_>) {
        // Open elements at or below the first skipped ancestor
        let mut skip_depth = 0usize;

        for edge in root.traverse() {
            match edge {
                Edge::Open(node) => match node.value() {
                    Node::Element(element) => {
                        let name = element.name();
                        if skip_depth > 0 || SKIPPED_ELEMENTS.contains(&name) {
                            skip_depth += 1;
                        } else if BLOCK_ELEMENTS.contains(&name) {
                            self.break_block();
                        }
                    }
                    Node::Text(text) if skip_depth == 0 => self.current.push_str(text),
                    _ => {}
                },
                Edge::Close(node) => {
                    if let Node::Element(element) = node.value() {
                        if skip_depth > 0 {
                            skip_depth -= 1;
                        } else if BLOCK_ELEMENTS.contains(&element.name()) {
                            self.break_block();
                        }
                    }
                }
            }
        }
    }

    fn break_block(&mut self) {
        let block = std::mem::take(&mut self.current);
        if !block.trim().is_empty() {
            self.blocks.push(block);
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.break_block();
        self.blocks
    }
}
