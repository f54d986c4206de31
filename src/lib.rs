//! Mirrors company websites to disk and turns the captured HTML into
//! plain-text documents.
//!
//! Each record of a batch names a company, the seed URL of its website and
//! a category. The seed page is scanned for same-site links, every linked
//! page is stored under `{mirror_root}/html/{company}/{host}/{path}` and,
//! for text output, converted into `{mirror_root}/txt/{company}/...txt`
//! with a `"{company}, {category}"` first line.

pub mod batch;
pub mod config;
pub mod convert;
pub mod crawlers;
pub mod error;
pub mod filter;
pub mod mirror;
pub mod parsers;
pub mod results;
pub mod urls;
pub mod utils;

pub use batch::{CrawlRecord, OutputFormat};
pub use config::MirrorConfig;
pub use results::RecordReport;
pub use urls::{CanonicalUrl, is_valid, resolve_and_clean};

use error::BatchError;
use filter::DomainMatch;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Main builder for a mirroring run
pub struct Mirror {
    config: MirrorConfig,
}

impl Mirror {
    /// Create a new builder with the given configuration
    pub fn new(config: MirrorConfig) -> Self {
        Self { config }
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::new(MirrorConfig::from_file(path)?))
    }

    /// Set the directory holding the `html/` and `txt/` trees
    pub fn with_mirror_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.mirror_root = root.into();
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.timeout_secs = timeout_seconds;
        self
    }

    /// Set how many link hops are followed from each seed page
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Set the maximum number of pages mirrored per record
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Set the number of records processed at the same time
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.max_concurrency = max_concurrency;
        self
    }

    /// Set how link hosts are compared to the seed host
    pub fn with_domain_match(mut self, domain_match: DomainMatch) -> Self {
        self.config.domain_match = domain_match;
        self
    }

    /// The configuration the run will use
    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// Start the batch and get a receiver for per-record reports
    pub async fn run(
        self,
        records: Vec<CrawlRecord>,
        format: OutputFormat,
    ) -> Result<mpsc::Receiver<RecordReport>, BatchError> {
        batch::run_batch(records, format, Arc::new(self.config)).await
    }
}
