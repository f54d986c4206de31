use crate::urls::CanonicalUrl;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A page that was retrieved and written to the mirror tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirroredPage {
    /// Canonical URL of the page
    pub url: CanonicalUrl,

    /// File the body was written to
    pub path: PathBuf,

    /// Response body as text
    pub body: String,
}

/// What one crawl of a seed URL produced
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlOutcome {
    /// Every link accepted by the link extractor, in canonical order
    pub discovered: BTreeSet<CanonicalUrl>,

    /// Files written under the mirror root
    pub stored: Vec<PathBuf>,

    /// Links whose retrieval or write failed
    pub failed: Vec<CanonicalUrl>,
}

/// Summary of one batch record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordReport {
    /// Company the record belongs to
    pub company: String,

    /// Seed URL of the record
    pub seed_url: String,

    /// Number of links discovered
    pub discovered: usize,

    /// Number of pages mirrored to disk
    pub stored: usize,

    /// Pages that could not be mirrored
    pub failed: Vec<CanonicalUrl>,

    /// Number of text artifacts written, when text output was requested
    pub converted: Option<usize>,

    /// Fatal error for this record, if any
    pub error: Option<String>,
}

impl RecordReport {
    /// Create an empty report for a record
    pub fn new(company: impl Into<String>, seed_url: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            seed_url: seed_url.into(),
            discovered: 0,
            stored: 0,
            failed: Vec::new(),
            converted: None,
            error: None,
        }
    }

    /// Fold a crawl outcome into the report
    pub fn with_outcome(mut self, outcome: &CrawlOutcome) -> Self {
        self.discovered = outcome.discovered.len();
        self.stored = outcome.stored.len();
        self.failed = outcome.failed.clone();
        self
    }

    /// Mark the record as failed
    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }

    /// A record succeeds unless it hit a fatal error; skipped pages don't count
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
