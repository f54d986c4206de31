use crate::parsers::{TextLayout, html, html_to_text};

#[test]
fn test_parse_links() {
    let page = r#"<html><body>
        <a href="https://example.com/a">A</a>
        <a href="/relative">Relative</a>
        <a>No href</a>
        <a href="">Empty</a>
    </body></html>"#;

    let links = html::parse_links(page);
    assert_eq!(links, vec!["https://example.com/a", "/relative", ""]);
}

#[test]
fn test_parse_links_malformed_markup() {
    // html5ever recovers from broken markup instead of failing
    let links = html::parse_links(r#"<p><a href="/x">x</a><p><a href=/y>unclosed"#);
    assert_eq!(links, vec!["/x", "/y"]);

    assert!(html::parse_links("not html at all").is_empty());
}

#[test]
fn test_simple_paragraph() {
    assert_eq!(
        html_to_text("<p>Hello</p>", TextLayout::Paragraphs),
        "Hello"
    );
}

#[test]
fn test_link_targets_are_discarded() {
    let page = r#"<p>Read <a href="https://example.com/docs">the docs</a> today.</p>"#;
    let text = html_to_text(page, TextLayout::Paragraphs);
    assert_eq!(text, "Read the docs today.");
    assert!(!text.contains("https://"));
}

#[test]
fn test_invisible_content_is_dropped() {
    let page = r#"<html>
        <head><title>Title</title><style>p { color: red; }</style></head>
        <body>
            <script>var x = 1;</script>
            <noscript>Enable JS</noscript>
            <p>Visible</p>
        </body>
    </html>"#;
    assert_eq!(html_to_text(page, TextLayout::Paragraphs), "Visible");
}

#[test]
fn test_blocks_become_paragraphs() {
    let page = r#"<body>
        <h1>Company</h1>
        <div>We build
            <b>things</b>.</div>
        <ul><li>One</li><li>Two</li></ul>
        Trailing text
    </body>"#;

    assert_eq!(
        html_to_text(page, TextLayout::Paragraphs),
        "Company\n\nWe build things.\n\nOne\n\nTwo\n\nTrailing text"
    );
    assert_eq!(
        html_to_text(page, TextLayout::Flat),
        "Company We build things. One Two Trailing text"
    );
}

#[test]
fn test_inline_elements_stay_in_block() {
    let page = "<p>Hello, <em>world</em>!<br>Next line</p>";
    assert_eq!(
        html_to_text(page, TextLayout::Paragraphs),
        "Hello, world!\n\nNext line"
    );
}

#[test]
fn test_preformatted_text_is_flattened() {
    let page = "<pre>line one\n    line two</pre><p>After</p>";
    assert_eq!(
        html_to_text(page, TextLayout::Paragraphs),
        "line one line two\n\nAfter"
    );
}

#[test]
fn test_skipped_element_nested_in_block() {
    let page = "<div>Before<script><p>hidden</p></script> after</div><p>Next</p>";
    assert_eq!(
        html_to_text(page, TextLayout::Paragraphs),
        "Before after\n\nNext"
    );
}

#[test]
fn test_deeply_nested_markup_on_small_stack() {
    let depth = 20_000;
    let page = format!("{}hi{}", "<span>".repeat(depth), "</span>".repeat(depth));

    // Same stack size as tokio's blocking pool threads
    let text = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(move || html_to_text(&page, TextLayout::Paragraphs))
        .unwrap()
        .join()
        .unwrap();
    assert_eq!(text, "hi");
}
