//! URL canonicalization and validation.
//!
//! A canonical URL keeps the scheme, authority and path of an absolute URL
//! and drops the query string and fragment. It is the identity used for
//! deduplication and for computing the mirror path of a page.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// An absolute URL reduced to scheme, authority and path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    /// The canonical string form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this value is an absolute URL with a scheme and a host
    pub fn is_valid(&self) -> bool {
        is_valid(&self.0)
    }

    /// Parse back into a `Url`, if this value is valid
    pub fn to_url(&self) -> Option<Url> {
        Url::parse(&self.0).ok()
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True iff `url` parses with a non-empty scheme and a non-empty host
pub fn is_valid(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            !parsed.scheme().is_empty() && parsed.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

/// Resolve `href` against `base_url` and strip its query and fragment.
///
/// Input that cannot be parsed yields an empty value which fails
/// [`is_valid`]; this function never errors.
pub fn resolve_and_clean(href: &str, base_url: &str) -> CanonicalUrl {
    let resolved = Url::parse(base_url).and_then(|base| base.join(href.trim()));
    match resolved {
        Ok(url) => clean(url),
        Err(e) => {
            ::log::trace!("Cannot resolve {:?} against {}: {}", href, base_url, e);
            CanonicalUrl(String::new())
        }
    }
}

fn clean(mut url: Url) -> CanonicalUrl {
    url.set_query(None);
    url.set_fragment(None);
    CanonicalUrl(url.into())
}
