use crate::config::MirrorConfig;
use crate::crawlers::links::{VisitedSet, discover_links, extract_links};
use crate::error::BatchError;
use crate::filter::{UrlFilter, UrlFilterConfig};
use crate::mirror::{Fetcher, fetch_and_store};
use crate::results::CrawlOutcome;
use crate::urls::CanonicalUrl;
use std::collections::BTreeSet;
use std::path::Path;
use url::Url;

/// Crawls the site of `seed_url` and mirrors every discovered page under `root`.
///
/// The seed page is only read for links. With `max_depth == 1` the crawl
/// stops at the links found on the seed page; larger depths follow links
/// breadth-first from each mirrored page. At most `max_pages` pages are
/// fetched for mirroring. A page that fails to download is logged and
/// skipped.
pub async fn crawl(
    seed_url: &str,
    fetcher: &Fetcher,
    config: &MirrorConfig,
    root: &Path,
) -> Result<CrawlOutcome, BatchError> {
    ::log::info!("Starting crawl of {}", seed_url);

    let seed = Url::parse(seed_url).map_err(|e| BatchError::InvalidSeed {
        url: seed_url.to_string(),
        reason: e.to_string(),
    })?;
    let url_filter = create_url_filter(&seed, config)?;
    let max_depth = config.max_depth.max(1);

    let mut visited = VisitedSet::new();
    let mut outcome = CrawlOutcome::default();

    let mut frontier = discover_links(fetcher, seed.as_str(), &url_filter, &mut visited).await;
    let mut depth = 1;

    while !frontier.is_empty() {
        outcome.discovered.extend(frontier.iter().cloned());
        let mut next: BTreeSet<CanonicalUrl> = BTreeSet::new();

        for url in frontier {
            if outcome.stored.len() + outcome.failed.len() >= config.max_pages {
                ::log::info!(
                    "Reached page limit of {} for {}, stopping",
                    config.max_pages,
                    seed_url
                );
                return Ok(outcome);
            }

            match fetch_and_store(fetcher, &url, root).await {
                Some(page) => {
                    if depth < max_depth {
                        next.extend(extract_links(
                            page.url.as_str(),
                            &page.body,
                            &url_filter,
                            &mut visited,
                        ));
                    }
                    outcome.stored.push(page.path);
                }
                None => outcome.failed.push(url),
            }
        }

        frontier = next;
        depth += 1;
    }

    ::log::info!(
        "Crawl of {} complete - {} discovered, {} stored, {} failed",
        seed_url,
        outcome.discovered.len(),
        outcome.stored.len(),
        outcome.failed.len()
    );
    Ok(outcome)
}

/// Creates a URL filter scoped to the seed's host
fn create_url_filter(seed: &Url, config: &MirrorConfig) -> Result<UrlFilter, BatchError> {
    let domain = seed
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| BatchError::InvalidSeed {
            url: seed.to_string(),
            reason: "URL has no host".to_string(),
        })?;

    let filter_config = UrlFilterConfig {
        domain_match: config.domain_match,
        include_patterns: config.include_patterns.clone(),
        exclude_patterns: config.exclude_patterns.clone(),
        ..UrlFilterConfig::for_domain(domain)
    };

    Ok(UrlFilter::new(filter_config)?)
}
