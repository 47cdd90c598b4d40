use std::collections::{BTreeSet, HashMap};

use festival_scraping::{
    api::{FetchError, PageSource},
    config::{RetryPolicy, ScrapeConfig},
    data_collector::run,
    schema::{FestivalRecord, Month},
};
use reqwest::StatusCode;
use strum::IntoEnumIterator;
use tempfile::TempDir;
use url::Url;

const HEADER: &str = "date_iso,date_label,day,festival,month,source_url";

struct StaticSite {
    pages: HashMap<String, String>,
}
impl PageSource for StaticSite {
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError> {
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.clone(),
                status: StatusCode::SERVICE_UNAVAILABLE,
            })
    }
}

fn month_page(month: Month) -> String {
    let m = month as u32 + 1;
    format!(
        r#"<html><body>
        <table class="sidebar"><tr><td>Shubh Muhurat</td></tr></table>
        <table>
          <tr><th>Date</th><th>Day</th><th>Festival</th></tr>
          <tr><td>05.{m:02}.2025</td><td>Sunday</td><td>Sankashti Chaturthi</td></tr>
          <tr><td>6:03 AM 11th to 4:20 AM 12th, 12.{m:02}.2025</td><td>Saturday</td><td>Purnima, {month}</td></tr>
          <tr><td>20.{m:02}.2025</td><td>Thursday</td><td> </td></tr>
          <tr><td>As per tithi</td><td>-</td><td>Pradosh Vrat</td></tr>
        </table></body></html>"#
    )
}

fn site(config: &ScrapeConfig, except: &[Month]) -> StaticSite {
    StaticSite {
        pages: Month::iter()
            .filter(|month| !except.contains(month))
            .map(|month| (config.month_url(month).to_string(), month_page(month)))
            .collect(),
    }
}

fn config(dir: &TempDir, file_name: &str) -> ScrapeConfig {
    ScrapeConfig::builder()
        .base_url(Url::parse("http://mock.kalnirnay.test/").unwrap())
        .output_path(dir.path().join(file_name))
        .retry(RetryPolicy::immediate(3))
        .build()
}

fn read_records(config: &ScrapeConfig) -> Vec<FestivalRecord> {
    csv::Reader::from_path(&config.output_path)
        .unwrap()
        .deserialize()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[tokio::test]
async fn test_full_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir, "festivals.csv");
    let summary = run(&site(&config, &[]), &config).await.unwrap();

    assert!(!summary.has_failures());
    assert_eq!(summary.succeeded.len(), 12);
    assert_eq!(summary.total_records, 36);
    assert_eq!(summary.dated_records, 24);
    let written = summary.written.unwrap();
    assert_eq!((written.written, written.dated), (36, 24));

    let contents = fs_err::read_to_string(&config.output_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some(HEADER));
    assert_eq!(
        lines.next(),
        Some("2025-01-05,05.01.2025,Sunday,Sankashti Chaturthi,january,http://mock.kalnirnay.test/january/")
    );
    assert_eq!(
        lines.next(),
        Some("2025-01-12,\"6:03 AM 11th to 4:20 AM 12th, 12.01.2025\",Saturday,\"Purnima, january\",january,http://mock.kalnirnay.test/january/")
    );
    assert_eq!(
        lines.next(),
        Some(",As per tithi,-,Pradosh Vrat,january,http://mock.kalnirnay.test/january/")
    );

    let records = read_records(&config);
    assert_eq!(records.len(), 36);
    assert!(records.iter().all(|r| !r.festival().trim().is_empty()));
    let months = records.iter().map(|r| r.month()).collect::<Vec<_>>();
    assert!(months.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(records[35].month(), Month::December);
}

#[tokio::test]
async fn test_runs_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let first = config(&dir, "first.csv");
    let second = config(&dir, "second.csv");
    run(&site(&first, &[]), &first).await.unwrap();
    run(&site(&second, &[]), &second).await.unwrap();
    run(&site(&second, &[]), &second).await.unwrap();
    assert_eq!(
        fs_err::read(&first.output_path).unwrap(),
        fs_err::read(&second.output_path).unwrap()
    );
}

#[tokio::test]
async fn test_failed_month_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir, "festivals.csv");
    let summary = run(&site(&config, &[Month::August]), &config)
        .await
        .unwrap();

    assert!(summary.has_failures());
    assert_eq!(
        summary.failed.iter().map(|(m, _)| *m).collect::<Vec<_>>(),
        [Month::August]
    );
    assert_eq!(summary.succeeded.len(), 11);

    let months = read_records(&config)
        .iter()
        .map(|r| r.month())
        .collect::<BTreeSet<_>>();
    assert_eq!(months.len(), 11);
    assert!(!months.contains(&Month::August));
}

#[tokio::test]
async fn test_nothing_collected_writes_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir, "festivals.csv");
    let all = Month::iter().collect::<Vec<_>>();
    let summary = run(&site(&config, &all), &config).await.unwrap();
    assert_eq!(summary.failed.len(), 12);
    assert_eq!(summary.total_records, 0);
    assert!(summary.written.is_none());
    assert!(!config.output_path.exists());

    let empty_site = StaticSite {
        pages: Month::iter()
            .map(|month| {
                (
                    config.month_url(month).to_string(),
                    "<table><tr><th>Date</th><th>Day</th><th>Festival</th></tr></table>"
                        .to_owned(),
                )
            })
            .collect(),
    };
    let summary = run(&empty_site, &config).await.unwrap();
    assert!(!summary.has_failures());
    assert_eq!(summary.total_records, 0);
    assert!(!config.output_path.exists());
}
