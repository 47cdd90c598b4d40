use std::{path::PathBuf, time::Duration};

use strum::IntoEnumIterator;
use typed_builder::TypedBuilder;
use url::Url;

use crate::schema::Month;

pub const BASE_URL: &str = "https://kalnirnay.co.in/";
pub const OUTPUT_PATH: &str = "festivals.csv";

#[derive(Clone, Debug, TypedBuilder)]
pub struct ScrapeConfig {
    #[builder(default = default_base_url())]
    pub base_url: Url,
    #[builder(default = Month::iter().collect())]
    pub months: Vec<Month>,
    #[builder(default = PathBuf::from(OUTPUT_PATH), setter(into))]
    pub output_path: PathBuf,
    #[builder(default)]
    pub retry: RetryPolicy,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ScrapeConfig {
    /// Location of the page of `month`, i.e. `{base_url}/{month}/`.
    pub fn month_url(&self, month: Month) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}/{}/", url.path().trim_end_matches('/'), month.slug());
        url.set_path(&path);
        url
    }
}

fn default_base_url() -> Url {
    Url::parse(BASE_URL).expect("BASE_URL is a valid url")
}

#[derive(Clone, Copy, Debug, TypedBuilder)]
pub struct RetryPolicy {
    #[builder(default = 3)]
    pub max_attempts: u32,
    /// Delay after the first failed attempt; doubled after each further failure.
    #[builder(default = Duration::from_secs(1))]
    pub initial_backoff: Duration,
    /// Pause after every successful fetch.
    #[builder(default = Duration::from_secs(1))]
    pub request_interval: Duration,
    #[builder(default = Duration::from_secs(30))]
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RetryPolicy {
    /// Policy without any sleeping, for driving the pipeline against local sources.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::builder()
            .max_attempts(max_attempts)
            .initial_backoff(Duration::ZERO)
            .request_interval(Duration::ZERO)
            .build()
    }

    /// Backoff before retrying after the failure of the `failed_attempt`-th attempt (0-based).
    pub fn backoff(&self, failed_attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(failed_attempt))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use url::Url;

    use super::{RetryPolicy, ScrapeConfig};
    use crate::schema::Month;

    #[test]
    fn test_default_config() {
        let config = ScrapeConfig::default();
        assert_eq!(config.months.len(), 12);
        assert_eq!(config.months[0], Month::January);
        assert_eq!(config.output_path.to_str(), Some("festivals.csv"));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_month_url() {
        let config = ScrapeConfig::default();
        assert_eq!(
            config.month_url(Month::January).as_str(),
            "https://kalnirnay.co.in/january/"
        );

        let config = ScrapeConfig::builder()
            .base_url(Url::parse("http://localhost:8080/calendar").unwrap())
            .build();
        assert_eq!(
            config.month_url(Month::May).as_str(),
            "http://localhost:8080/calendar/may/"
        );
    }

    #[test]
    fn test_backoff_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(RetryPolicy::immediate(3).backoff(5), Duration::ZERO);
    }
}
