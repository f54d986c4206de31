//! Page retrieval and the on-disk mirror layout.
//!
//! A page at `scheme://host:port/a/b` is stored at
//! `{root}/host_port/a/b.html`; a path ending in `/` is stored as
//! `index.html` inside that directory. The characters `:`, `?`, `*` and `"`
//! never reach the filesystem.

use crate::config::MirrorConfig;
use crate::error::FetchError;
use crate::results::MirroredPage;
use crate::urls::CanonicalUrl;
use crate::utils::sanitize_path;
use reqwest::Client;
use std::path::{Path, PathBuf};
use url::Url;

/// HTTP client shared by every crawl of a batch
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build a client with the configured timeout and user agent
    pub fn new(config: &MirrorConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// GET `url` and return the body decoded as text.
    ///
    /// Transport errors, timeouts and non-success statuses are all errors.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        ::log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Computes where a page is stored under `root`
pub fn mirror_path(url: &Url, root: &Path) -> PathBuf {
    let authority = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };

    let mut path = url.path().to_string();
    if path.ends_with('/') {
        path.push_str("index.html");
    } else if !path.ends_with(".html") {
        path.push_str(".html");
    }

    root.join(sanitize_path(&authority))
        .join(sanitize_path(path.trim_start_matches('/')))
}

/// Retrieves `url` and writes its body into the mirror under `root`
pub async fn fetch_page(
    fetcher: &Fetcher,
    url: &CanonicalUrl,
    root: &Path,
) -> Result<MirroredPage, FetchError> {
    let parsed = url
        .to_url()
        .filter(|u| u.host_str().is_some())
        .ok_or_else(|| FetchError::InvalidUrl(url.to_string()))?;

    let body = fetcher.get_text(url.as_str()).await?;

    let path = mirror_path(&parsed, root);
    ::log::info!("Saving to: {}", path.display());
    write_page(&path, &body).await?;

    Ok(MirroredPage {
        url: url.clone(),
        path,
        body,
    })
}

/// Mirrors one page, logging instead of failing.
///
/// Returns `None` when the page could not be retrieved or written; the
/// caller carries on with the next page.
pub async fn fetch_and_store(
    fetcher: &Fetcher,
    url: &CanonicalUrl,
    root: &Path,
) -> Option<MirroredPage> {
    match fetch_page(fetcher, url, root).await {
        Ok(page) => Some(page),
        Err(e) => {
            ::log::error!("Error scraping {}: {}", url, e);
            None
        }
    }
}

async fn write_page(path: &Path, body: &str) -> Result<(), FetchError> {
    let write_error = |source: std::io::Error| FetchError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }
    tokio::fs::write(path, body).await.map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::urls::resolve_and_clean;
    use mockito::Server;
    use tempfile::TempDir;

    fn path_for(url: &str) -> PathBuf {
        let canonical = resolve_and_clean(url, url);
        mirror_path(&canonical.to_url().unwrap(), Path::new("root"))
    }

    fn fetcher() -> Fetcher {
        Fetcher::new(&MirrorConfig {
            timeout_secs: 5,
            ..MirrorConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_trailing_slash_maps_to_index() {
        assert_eq!(
            path_for("https://example.com/a/b/"),
            PathBuf::from("root/example.com/a/b/index.html")
        );
        assert_eq!(
            path_for("https://example.com"),
            PathBuf::from("root/example.com/index.html")
        );
    }

    #[test]
    fn test_query_stripped_and_html_appended() {
        assert_eq!(
            path_for("https://example.com/a?x=1"),
            PathBuf::from("root/example.com/a.html")
        );
        assert_eq!(
            path_for("https://example.com/page.html"),
            PathBuf::from("root/example.com/page.html")
        );
        assert_eq!(
            path_for("https://example.com/report.pdf"),
            PathBuf::from("root/example.com/report.pdf.html")
        );
    }

    #[test]
    fn test_disallowed_characters_replaced() {
        assert_eq!(
            path_for("https://example.com/a:b/c*d"),
            PathBuf::from("root/example.com/a_b/c_d.html")
        );
        assert_eq!(
            path_for("http://example.com:8080/x"),
            PathBuf::from("root/example.com_8080/x.html")
        );
    }

    #[test]
    fn test_mirror_path_is_deterministic() {
        let first = path_for("https://example.com/docs/intro");
        for _ in 0..3 {
            assert_eq!(path_for("https://example.com/docs/intro"), first);
        }
    }

    #[tokio::test]
    async fn test_fetch_and_store_writes_body() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/about")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<p>About us</p>")
            .expect(1)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let url = resolve_and_clean("/about?ref=nav", &server.url());
        let page = fetch_and_store(&fetcher(), &url, dir.path()).await.unwrap();

        let expected = dir
            .path()
            .join(server.host_with_port().replace(':', "_"))
            .join("about.html");
        assert_eq!(page.path, expected);
        assert_eq!(std::fs::read_to_string(&expected).unwrap(), "<p>About us</p>");
        assert_eq!(page.body, "<p>About us</p>");

        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_and_store_overwrites() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(200)
            .with_body("new")
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let url = resolve_and_clean("/", &server.url());
        let target = mirror_path(&url.to_url().unwrap(), dir.path());
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(&target, "old").unwrap();

        fetch_and_store(&fetcher(), &url, dir.path()).await.unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_http_error_status_is_skipped() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let url = resolve_and_clean("/missing", &server.url());

        let err = fetch_page(&fetcher(), &url, dir.path()).await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
        assert!(fetch_and_store(&fetcher(), &url, dir.path()).await.is_none());

        let written = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(written, 0);
    }

    #[tokio::test]
    async fn test_transport_error_is_skipped() {
        let dir = TempDir::new().unwrap();
        // Nothing listens on port 1
        let url = resolve_and_clean("http://127.0.0.1:1/page", "http://127.0.0.1:1/");
        assert!(fetch_and_store(&fetcher(), &url, dir.path()).await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        let dir = TempDir::new().unwrap();
        let url = resolve_and_clean("mailto:a@example.com", "https://example.com/");
        let err = fetch_page(&fetcher(), &url, dir.path()).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
