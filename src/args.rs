use clap::{Parser, ValueEnum};
use mirror_page::OutputFormat;
use mirror_page::filter::DomainMatch;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mirror-page")]
#[command(about = "Mirrors company websites to disk and converts them to plain text")]
#[command(version)]
pub struct Args {
    /// Output format (html, txt)
    #[arg(short, long, value_enum)]
    pub format: FormatArg,

    /// Headerless CSV of company,website,category records
    #[arg(short, long, default_value = "companies.csv")]
    pub records: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Mirror root directory (overrides the configuration)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Link hops followed from each seed page
    #[arg(long)]
    pub depth: Option<usize>,

    /// Maximum pages mirrored per company
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Number of companies crawled at the same time
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// How link hosts are matched against the seed host
    #[arg(long, value_enum)]
    pub domain_match: Option<DomainMatchArg>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Html,
    Txt,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DomainMatchArg {
    Host,
    Substring,
}

/// Convert from CLI argument format to internal output format
pub fn convert_format(arg: FormatArg) -> OutputFormat {
    match arg {
        FormatArg::Html => OutputFormat::Html,
        FormatArg::Txt => OutputFormat::Txt,
    }
}

/// Convert from CLI argument domain match to the filter's domain match
pub fn convert_domain_match(arg: DomainMatchArg) -> DomainMatch {
    match arg {
        DomainMatchArg::Host => DomainMatch::Host,
        DomainMatchArg::Substring => DomainMatch::Substring,
    }
}
