use std::env;
use std::time::Duration;

use business::application::product::list::PageSize;
use business::domain::shared::dates::{DEFAULT_DETECTION_ORDER, DateFormat};

/// Timings, paging and date handling for the console screens
#[derive(Debug, Clone)]
pub struct UiConfig {
    pub toast_duration: Duration,
    pub id_check_delay: Duration,
    pub search_delay: Duration,
    pub page_size: PageSize,
    pub date_priority: Vec<DateFormat>,
    pub display_format: DateFormat,
    pub release_format: Option<DateFormat>,
}

impl UiConfig {
    /// Load UI configuration from environment variables
    ///
    /// Environment variables:
    /// - TOAST_DURATION_MS: Toast lifetime (default: 3000)
    /// - ID_CHECK_DEBOUNCE_MS: Quiet period before the id availability call (default: 300)
    /// - SEARCH_DEBOUNCE_MS: Quiet period before a search applies (default: 300)
    /// - PAGE_SIZE: Rows per page, one of 5, 10 or 20 (default: 5)
    /// - DATE_FORMAT_PRIORITY: Comma-separated detection order
    ///   (default: "YYYY-MM-DD,DD/MM/YYYY,MM/DD/YYYY")
    /// - DATE_DISPLAY_FORMAT: Layout of rendered dates (default: "DD/MM/YYYY")
    /// - RELEASE_INPUT_FORMAT: Layout typed release dates must follow
    ///   (default: unset, any detectable layout)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            toast_duration: millis(lookup("TOAST_DURATION_MS"), 3000),
            id_check_delay: millis(lookup("ID_CHECK_DEBOUNCE_MS"), 300),
            search_delay: millis(lookup("SEARCH_DEBOUNCE_MS"), 300),
            page_size: page_size(lookup("PAGE_SIZE")),
            date_priority: date_priority(lookup("DATE_FORMAT_PRIORITY")),
            display_format: lookup("DATE_DISPLAY_FORMAT")
                .and_then(|format| format.parse().ok())
                .unwrap_or(DateFormat::DdMmYyyy),
            release_format: release_format(lookup("RELEASE_INPUT_FORMAT")),
        }
    }
}

fn millis(value: Option<String>, default: u64) -> Duration {
    let ms = value
        .and_then(|ms| ms.trim().parse::<u64>().ok())
        .unwrap_or(default);
    Duration::from_millis(ms)
}

fn release_format(value: Option<String>) -> Option<DateFormat> {
    let raw = value.filter(|raw| !raw.trim().is_empty())?;
    match raw.trim().parse::<DateFormat>() {
        Ok(format) => Some(format),
        Err(e) => {
            tracing::warn!("Ignoring RELEASE_INPUT_FORMAT: {}", e);
            None
        }
    }
}

fn page_size(value: Option<String>) -> PageSize {
    let Some(raw) = value else {
        return PageSize::default();
    };
    match raw.trim().parse::<usize>().map(PageSize::try_from) {
        Ok(Ok(size)) => size,
        _ => {
            tracing::warn!("Ignoring PAGE_SIZE '{}', expected 5, 10 or 20", raw);
            PageSize::default()
        }
    }
}

/// Unknown entries are skipped; an empty result means the default order.
fn date_priority(value: Option<String>) -> Vec<DateFormat> {
    let parsed: Vec<DateFormat> = value
        .unwrap_or_default()
        .split(',')
        .filter(|entry| !entry.trim().is_empty())
        .filter_map(|entry| match entry.parse::<DateFormat>() {
            Ok(format) => Some(format),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        DEFAULT_DETECTION_ORDER.to_vec()
    } else {
        parsed
    }
}
