//! Runs the crawl and conversion pipeline over a list of company records.

use crate::config::MirrorConfig;
use crate::convert::convert_tree;
use crate::crawlers::web::crawl;
use crate::error::BatchError;
use crate::mirror::Fetcher;
use crate::results::RecordReport;
use crate::utils::sanitize_component;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinHandle;

/// One company whose website is mirrored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlRecord {
    pub company_name: String,
    pub seed_url: String,
    pub category: String,
}

impl CrawlRecord {
    pub fn new(
        company_name: impl Into<String>,
        seed_url: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            seed_url: seed_url.into(),
            category: category.into(),
        }
    }
}

/// Artifacts produced for each record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Mirror HTML only
    Html,
    /// Mirror HTML, then convert it to text
    Txt,
}

/// Loads records from a headerless `company,website,category` CSV file
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<CrawlRecord>, BatchError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)?;
    read_records(reader)
}

/// Loads records from any CSV source
pub fn load_records_from_reader<R: Read>(source: R) -> Result<Vec<CrawlRecord>, BatchError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(source);
    read_records(reader)
}

fn read_records<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<CrawlRecord>, BatchError> {
    let mut records = Vec::new();
    for result in reader.deserialize::<CrawlRecord>() {
        records.push(result?);
    }
    ::log::debug!("Loaded {} records", records.len());
    Ok(records)
}

/// Processes every record and streams one report per record, in input order.
///
/// Records run as independent tasks, at most `max_concurrency` at a time.
/// Each report is sent as soon as its record and every record before it
/// have finished.
/// A record that fails is reported and never stops the records after it.
pub async fn run_batch(
    records: Vec<CrawlRecord>,
    format: OutputFormat,
    config: Arc<MirrorConfig>,
) -> Result<mpsc::Receiver<RecordReport>, BatchError> {
    let fetcher = Arc::new(Fetcher::new(&config)?);
    let (report_tx, report_rx) = mpsc::channel::<RecordReport>(records.len().max(1));
    let semaphore = Arc::new(Semaphore::new(config.max_concurrency.max(1)));

    tokio::spawn(async move {
        let mut pending: VecDeque<PendingReport> = VecDeque::with_capacity(records.len());

        for record in records {
            // Report finished records before waiting for a free slot
            while pending
                .front()
                .is_some_and(|(_, handle)| handle.is_finished())
                || (semaphore.available_permits() == 0 && !pending.is_empty())
            {
                if let Some(entry) = pending.pop_front() {
                    if !send_report(&report_tx, entry).await {
                        return;
                    }
                }
            }

            // Acquire before spawning so records start in input order
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    ::log::error!("Record semaphore closed: {}", e);
                    break;
                }
            };

            let fallback = RecordReport::new(&record.company_name, &record.seed_url);
            let fetcher = Arc::clone(&fetcher);
            let config = Arc::clone(&config);
            let handle = tokio::spawn(async move {
                let report = process_record(record, format, &fetcher, &config).await;
                drop(permit);
                report
            });
            pending.push_back((fallback, handle));
        }

        while let Some(entry) = pending.pop_front() {
            if !send_report(&report_tx, entry).await {
                return;
            }
        }
        ::log::debug!("All records processed");
    });

    Ok(report_rx)
}

/// A spawned record and the report used if its task dies
type PendingReport = (RecordReport, JoinHandle<RecordReport>);

/// Waits for one record and forwards its report; false once the receiver is gone
async fn send_report(
    report_tx: &mpsc::Sender<RecordReport>,
    (fallback, handle): PendingReport,
) -> bool {
    let report = match handle.await {
        Ok(report) => report,
        Err(e) => fallback.with_error(BatchError::Join(e)),
    };
    match report_tx.send(report).await {
        Ok(()) => true,
        Err(e) => {
            ::log::error!("Failed to send record report: {}", e);
            false
        }
    }
}

/// Crawls one record and, for text output, converts its mirror
pub async fn process_record(
    record: CrawlRecord,
    format: OutputFormat,
    fetcher: &Fetcher,
    config: &MirrorConfig,
) -> RecordReport {
    ::log::info!("Scraping {} website...", record.company_name);

    let report = RecordReport::new(&record.company_name, &record.seed_url);
    let company_dir = sanitize_component(&record.company_name);
    let html_dir = config.html_dir(&company_dir);

    let outcome = match crawl(&record.seed_url, fetcher, config, &html_dir).await {
        Ok(outcome) => outcome,
        Err(e) => {
            ::log::error!("Failed to crawl {}: {}", record.company_name, e);
            return report.with_error(e);
        }
    };
    let mut report = report.with_outcome(&outcome);

    if format == OutputFormat::Html {
        return report;
    }

    let txt_dir = config.txt_dir(&company_dir);
    let layout = config.text_layout;
    let converted = tokio::task::spawn_blocking(move || {
        convert_tree(
            &html_dir,
            &txt_dir,
            &record.company_name,
            &record.category,
            layout,
        )
    })
    .await;

    match converted {
        Ok(Ok(count)) => report.converted = Some(count),
        Ok(Err(e)) => {
            ::log::error!("Failed to convert {}: {}", report.company, e);
            report = report.with_error(BatchError::Convert(e));
        }
        Err(e) => {
            ::log::error!("Conversion task for {} failed: {}", report.company, e);
            report = report.with_error(BatchError::Join(e));
        }
    }
    report
}
