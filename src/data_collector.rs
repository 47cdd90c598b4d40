use std::collections::BTreeMap;

use anyhow::Context;
use itertools::Itertools;
use log::{error, info, warn};
use scraper::Html;
use strum::IntoEnumIterator;

use crate::{
    api::{fetch_with_retry, PageSource},
    category::{is_recurring, FestivalCategory},
    chrono_util::parse_long_date,
    config::ScrapeConfig,
    csv_export::{write_csv, WriteReport},
    parser,
    schema::{FestivalRecord, Month},
};

#[derive(Debug)]
pub enum MonthOutcome {
    Scraped(Vec<FestivalRecord>),
    Failed(anyhow::Error),
}

#[derive(Debug)]
pub struct MonthReport {
    pub month: Month,
    pub outcome: MonthOutcome,
}

impl MonthReport {
    pub fn records(&self) -> &[FestivalRecord] {
        match &self.outcome {
            MonthOutcome::Scraped(records) => records,
            MonthOutcome::Failed(_) => &[],
        }
    }
}

/// Fetches and parses the page of a single month.
/// A page without a festival table is not an error and yields no records.
pub async fn scrape_month<S: PageSource>(
    source: &S,
    config: &ScrapeConfig,
    month: Month,
) -> anyhow::Result<Vec<FestivalRecord>> {
    let url = config.month_url(month);
    let html = fetch_with_retry(source, &url, &config.retry)
        .await
        .with_context(|| {
            format!(
                "Failed to fetch {url} after {} attempt(s)",
                config.retry.max_attempts.max(1)
            )
        })?;
    let document = Html::parse_document(&html);
    Ok(match parser::parse(&document, month, url.as_str()) {
        Some(records) => records,
        None => {
            warn!("No festival table found for month '{month}'");
            vec![]
        }
    })
}

/// Scrapes every configured month in order.  A failing month never stops the others.
pub async fn collect_festivals<S: PageSource>(
    source: &S,
    config: &ScrapeConfig,
) -> Vec<MonthReport> {
    let mut reports = vec![];
    for &month in &config.months {
        let outcome = match scrape_month(source, config, month).await {
            Ok(records) => {
                info!("Found {} festivals for {month}", records.len());
                MonthOutcome::Scraped(records)
            }
            Err(e) => {
                error!("Failed to scrape month '{month}': {e:#}");
                MonthOutcome::Failed(e)
            }
        };
        reports.push(MonthReport { month, outcome });
    }
    reports
}

#[derive(Debug)]
pub struct RunSummary {
    pub attempted: Vec<Month>,
    pub succeeded: Vec<Month>,
    pub failed: Vec<(Month, String)>,
    pub total_records: usize,
    pub dated_records: usize,
    /// Records with a normalized date, or whose label is a written-out English date.
    pub importable_records: usize,
    /// Breakdown of the importable records.
    pub categories: BTreeMap<FestivalCategory, usize>,
    pub recurring: usize,
    pub written: Option<WriteReport>,
}

impl RunSummary {
    pub fn new(reports: &[MonthReport], written: Option<WriteReport>) -> Self {
        let mut succeeded = vec![];
        let mut failed = vec![];
        for report in reports {
            match &report.outcome {
                MonthOutcome::Scraped(_) => succeeded.push(report.month),
                MonthOutcome::Failed(e) => failed.push((report.month, format!("{e:#}"))),
            }
        }
        let records = reports.iter().flat_map(MonthReport::records).collect_vec();
        let dated_records = records.iter().filter(|r| r.date().is_some()).count();
        let importable = records
            .iter()
            .filter(|r| r.date().or_else(|| parse_long_date(r.date_label())).is_some())
            .collect_vec();
        let mut categories: BTreeMap<_, _> = FestivalCategory::iter().map(|c| (c, 0)).collect();
        for record in &importable {
            *categories
                .entry(FestivalCategory::of(record.festival()))
                .or_default() += 1;
        }
        Self {
            attempted: reports.iter().map(|r| r.month).collect(),
            succeeded,
            failed,
            total_records: records.len(),
            dated_records,
            importable_records: importable.len(),
            recurring: importable.iter().filter(|r| is_recurring(r.festival())).count(),
            categories,
            written,
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn log(&self) {
        info!("{}", "=".repeat(60));
        info!("Scraping completed!");
        info!(
            "Successfully scraped: {} of {} months",
            self.succeeded.len(),
            self.attempted.len()
        );
        if self.has_failures() {
            warn!(
                "Failed months: {}",
                self.failed.iter().map(|(month, _)| month).join(", ")
            );
        }
        info!("Total festivals collected: {}", self.total_records);
        info!(
            "Festivals with a date: {}, without: {}",
            self.dated_records,
            self.total_records - self.dated_records
        );
        info!(
            "Categories of {} importable festivals: {}",
            self.importable_records,
            self.categories
                .iter()
                .map(|(category, count)| format!("{category}={count}"))
                .join(", ")
        );
        info!(
            "Recurring (changes yearly): {}, fixed: {}",
            self.recurring,
            self.importable_records - self.recurring
        );
        info!("{}", "=".repeat(60));
    }
}

/// Scrapes all months, writes the collected records once and summarizes the run.
pub async fn run<S: PageSource>(source: &S, config: &ScrapeConfig) -> anyhow::Result<RunSummary> {
    info!("Starting festival scraping from {}", config.base_url);
    let reports = collect_festivals(source, config).await;
    let records = reports
        .iter()
        .flat_map(MonthReport::records)
        .cloned()
        .collect_vec();
    let written = write_csv(&config.output_path, &records)?;
    let summary = RunSummary::new(&reports, written);
    summary.log();
    Ok(summary)
}
