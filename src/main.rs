use clap::Parser;
use mirror_page::batch::load_records;
use mirror_page::{Mirror, MirrorConfig, RecordReport};
use std::process::ExitCode;

mod args;
use args::{Args, convert_domain_match, convert_format};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // An unsupported --format exits here, before anything is read or fetched
    let args = Args::parse();

    let mirror = match build_mirror(&args) {
        Ok(mirror) => mirror,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let records = match load_records(&args.records) {
        Ok(records) => records,
        Err(e) => {
            ::log::error!("Failed to read {}: {}", args.records.display(), e);
            eprintln!("Failed to read {}: {}", args.records.display(), e);
            return ExitCode::FAILURE;
        }
    };
    ::log::info!(
        "Mirroring {} companies into {}",
        records.len(),
        mirror.config().mirror_root.display()
    );

    let start_time = std::time::Instant::now();
    let mut rx = match mirror.run(records, convert_format(args.format)).await {
        Ok(rx) => rx,
        Err(e) => {
            ::log::error!("Failed to start batch: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut totals = Totals::default();
    while let Some(report) = rx.recv().await {
        log_report(&report);
        totals.add(&report);
    }

    ::log::info!(
        "Batch complete - {} records ({} failed), {} pages stored, {} pages failed in {:.2} seconds",
        totals.records,
        totals.failed_records,
        totals.stored,
        totals.failed_pages,
        start_time.elapsed().as_secs_f64()
    );

    if totals.failed_records > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn build_mirror(args: &Args) -> Result<Mirror, Box<dyn std::error::Error>> {
    let mut mirror = match &args.config {
        Some(path) => Mirror::with_config_file(path)?,
        None => Mirror::new(MirrorConfig::default()),
    };

    if let Some(root) = &args.output {
        mirror = mirror.with_mirror_root(root);
    }
    if let Some(timeout) = args.timeout {
        mirror = mirror.with_timeout(timeout);
    }
    if let Some(depth) = args.depth {
        mirror = mirror.with_max_depth(depth);
    }
    if let Some(max_pages) = args.max_pages {
        mirror = mirror.with_max_pages(max_pages);
    }
    if let Some(concurrency) = args.concurrency {
        mirror = mirror.with_max_concurrency(concurrency);
    }
    if let Some(domain_match) = args.domain_match {
        mirror = mirror.with_domain_match(convert_domain_match(domain_match));
    }
    Ok(mirror)
}

fn log_report(report: &RecordReport) {
    match &report.error {
        Some(error) => ::log::error!("{} ({}) failed: {}", report.company, report.seed_url, error),
        None => ::log::info!(
            "{}: {} discovered, {} stored, {} failed{}",
            report.company,
            report.discovered,
            report.stored,
            report.failed.len(),
            report
                .converted
                .map(|n| format!(", {} converted", n))
                .unwrap_or_default()
        ),
    }
    for url in &report.failed {
        ::log::debug!("{}: could not mirror {}", report.company, url);
    }
}

#[derive(Default)]
struct Totals {
    records: usize,
    failed_records: usize,
    stored: usize,
    failed_pages: usize,
}

impl Totals {
    fn add(&mut self, report: &RecordReport) {
        self.records += 1;
        if !report.is_success() {
            self.failed_records += 1;
        }
        self.stored += report.stored;
        self.failed_pages += report.failed.len();
    }
}
