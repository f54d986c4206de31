use crate::filter::UrlFilter;
use crate::mirror::Fetcher;
use crate::parsers::html;
use crate::urls::{CanonicalUrl, resolve_and_clean};
use std::collections::{BTreeSet, HashSet};

/// Canonical URLs already handed out during one crawl
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<CanonicalUrl>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &CanonicalUrl) -> bool {
        self.urls.contains(url)
    }

    /// Records `url`; returns false if it was already present
    pub fn insert(&mut self, url: CanonicalUrl) -> bool {
        self.urls.insert(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Returns the in-scope links of a page that have not been seen yet.
///
/// Every returned link is recorded in `visited` immediately, so no later
/// call sharing the same set will return it again, fetched or not.
pub fn extract_links(
    page_url: &str,
    page_html: &str,
    filter: &UrlFilter,
    visited: &mut VisitedSet,
) -> BTreeSet<CanonicalUrl> {
    let mut links = BTreeSet::new();

    for href in html::parse_links(page_html) {
        if href.trim().is_empty() {
            continue;
        }

        let link = resolve_and_clean(&href, page_url);
        let Some(url) = link.to_url().filter(|_| link.is_valid()) else {
            ::log::trace!("Skipping invalid link {:?} on {}", href, page_url);
            continue;
        };

        if visited.contains(&link) {
            ::log::trace!("Skipping already visited link: {}", link);
            continue;
        }

        if !filter.should_crawl(&url) {
            ::log::debug!("URL filter rejected: {}", link);
            continue;
        }

        visited.insert(link.clone());
        links.insert(link);
    }

    ::log::info!("Found {} new links in {}", links.len(), page_url);
    links
}

/// Retrieves `page_url` and extracts its links.
///
/// A page that cannot be retrieved yields no links.
pub async fn discover_links(
    fetcher: &Fetcher,
    page_url: &str,
    filter: &UrlFilter,
    visited: &mut VisitedSet,
) -> BTreeSet<CanonicalUrl> {
    match fetcher.get_text(page_url).await {
        Ok(body) => extract_links(page_url, &body, filter, visited),
        Err(e) => {
            ::log::warn!("Failed to retrieve {} for link discovery: {}", page_url, e);
            BTreeSet::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MirrorConfig;
    use crate::filter::UrlFilterConfig;
    use mockito::Server;

    fn filter(domain: &str) -> UrlFilter {
        UrlFilter::new(UrlFilterConfig::for_domain(domain)).unwrap()
    }

    fn strings(links: &BTreeSet<CanonicalUrl>) -> Vec<&str> {
        links.iter().map(|l| l.as_str()).collect()
    }

    #[test]
    fn test_only_same_domain_links_retained() {
        let page = r#"<a href="https://example.com/a">A</a>
                      <a href="https://other.com/b">B</a>"#;
        let mut visited = VisitedSet::new();

        let links = extract_links("https://example.com/", page, &filter("example.com"), &mut visited);
        assert_eq!(strings(&links), vec!["https://example.com/a"]);
    }

    #[test]
    fn test_links_are_resolved_and_cleaned() {
        let page = r##"<a href="/about?tab=team#people">About</a>
                      <a href="contact">Contact</a>
                      <a href="#top">Top</a>
                      <a href="">Empty</a>
                      <a href="mailto:hello@example.com">Mail</a>
                      <a href="javascript:void(0)">JS</a>"##;
        let mut visited = VisitedSet::new();

        let links = extract_links(
            "https://example.com/company/",
            page,
            &filter("example.com"),
            &mut visited,
        );
        assert_eq!(
            strings(&links),
            vec![
                "https://example.com/about",
                "https://example.com/company/",
                "https://example.com/company/contact",
            ]
        );
    }

    #[test]
    fn test_links_marked_visited_when_returned() {
        let page = r#"<a href="/a">A</a><a href="/a?x=1">A again</a><a href="/b">B</a>"#;
        let mut visited = VisitedSet::new();
        let filter = filter("example.com");

        let first = extract_links("https://example.com/", page, &filter, &mut visited);
        assert_eq!(first.len(), 2);
        assert_eq!(visited.len(), 2);

        // Same page again, and another page sharing a link: nothing is returned twice
        let second = extract_links("https://example.com/", page, &filter, &mut visited);
        assert!(second.is_empty());

        let other = r#"<a href="/b">B</a><a href="/c">C</a>"#;
        let third = extract_links("https://example.com/x", other, &filter, &mut visited);
        assert_eq!(strings(&third), vec!["https://example.com/c"]);
    }

    #[test]
    fn test_rejected_links_are_not_marked_visited() {
        let page = r#"<a href="https://other.com/b">B</a>"#;
        let mut visited = VisitedSet::new();

        extract_links("https://example.com/", page, &filter("example.com"), &mut visited);
        assert!(visited.is_empty());
    }

    #[test]
    fn test_unparseable_page_yields_no_links() {
        let mut visited = VisitedSet::new();
        let links = extract_links(
            "https://example.com/",
            "\u{0}\u{1}<<<>>>",
            &filter("example.com"),
            &mut visited,
        );
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_discover_links_failure_is_empty() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(500)
            .create_async()
            .await;

        let fetcher = Fetcher::new(&MirrorConfig::default()).unwrap();
        let mut visited = VisitedSet::new();
        let links =
            discover_links(&fetcher, &server.url(), &filter("127.0.0.1"), &mut visited).await;
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_discover_links_from_server() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(r#"<a href="/team">Team</a><a href="https://other.com/">Out</a>"#)
            .create_async()
            .await;

        let fetcher = Fetcher::new(&MirrorConfig::default()).unwrap();
        let mut visited = VisitedSet::new();
        let links =
            discover_links(&fetcher, &server.url(), &filter("127.0.0.1"), &mut visited).await;

        assert_eq!(links.len(), 1);
        assert!(links.iter().all(|l| l.as_str().ends_with("/team")));
    }
}
