use crate::filter::DomainMatch;
use crate::parsers::TextLayout;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for a mirroring run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Directory holding the `html/` and `txt/` trees
    #[serde(default = "default_mirror_root")]
    pub mirror_root: PathBuf,

    /// Timeout for every HTTP request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Link hops followed from the seed page (1 = links on the seed page only)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum number of pages mirrored per record
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// How link hosts are compared to the seed host
    #[serde(default)]
    pub domain_match: DomainMatch,

    /// Regex patterns for URLs to include
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for URLs to exclude
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Number of records processed at the same time
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Layout of converted text artifacts
    #[serde(default)]
    pub text_layout: TextLayout,
}

impl MirrorConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Root of the HTML mirror for a company
    pub fn html_dir(&self, company: &str) -> PathBuf {
        self.mirror_root.join("html").join(company)
    }

    /// Root of the text artifacts for a company
    pub fn txt_dir(&self, company: &str) -> PathBuf {
        self.mirror_root.join("txt").join(company)
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            mirror_root: default_mirror_root(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            max_depth: default_max_depth(),
            max_pages: default_max_pages(),
            domain_match: DomainMatch::default(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            max_concurrency: default_max_concurrency(),
            text_layout: TextLayout::default(),
        }
    }
}

fn default_mirror_root() -> PathBuf {
    PathBuf::from("data")
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("mirror-page/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_depth() -> usize {
    1
}

fn default_max_pages() -> usize {
    500
}

fn default_max_concurrency() -> usize {
    1
}
