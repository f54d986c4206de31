use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// How a link's host is compared to the crawl domain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainMatch {
    /// Exact host or any subdomain of it
    #[default]
    Host,
    /// Host contains the domain anywhere (admits `example.com.evil.com`)
    Substring,
}

/// Configuration for URL filtering in crawlers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlFilterConfig {
    /// Domain every crawled link must belong to
    pub domain: String,

    /// Comparison used for the domain restriction
    #[serde(default)]
    pub domain_match: DomainMatch,

    /// Regex patterns for URLs to include (if empty, all URLs are included unless excluded)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for URLs to exclude (these take precedence over include patterns)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl UrlFilterConfig {
    /// Domain-only filter with no URL patterns
    pub fn for_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            domain_match: DomainMatch::default(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

/// Decides which discovered links stay inside a crawl
#[derive(Debug)]
pub struct UrlFilter {
    config: UrlFilterConfig,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl UrlFilter {
    /// Create a new URL filter from configuration
    pub fn new(config: UrlFilterConfig) -> Result<Self, regex::Error> {
        let include_regexes = config
            .include_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        let exclude_regexes = config
            .exclude_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            include_regexes,
            exclude_regexes,
        })
    }

    /// The domain this filter scopes links to
    pub fn domain(&self) -> &str {
        &self.config.domain
    }

    /// Determine if a URL belongs to the crawl
    pub fn should_crawl(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        if !self.is_in_domain_scope(host) {
            return false;
        }

        // Exclusions take precedence
        let url_str = url.as_str();
        if self.exclude_regexes.iter().any(|r| r.is_match(url_str)) {
            return false;
        }

        self.include_regexes.is_empty() || self.include_regexes.iter().any(|r| r.is_match(url_str))
    }

    /// Check if a host is within the configured domain
    pub fn is_in_domain_scope(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        let domain = self.config.domain.to_ascii_lowercase();
        if domain.is_empty() {
            return false;
        }

        match self.config.domain_match {
            DomainMatch::Substring => host.contains(&domain),
            DomainMatch::Host => {
                host == domain
                    || host
                        .strip_suffix(&domain)
                        .is_some_and(|prefix| prefix.ends_with('.'))
            }
        }
    }
}
