use chrono::{Datelike, Local, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Textual date layouts accepted at the API and form boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFormat {
    /// `2025-08-16`
    YyyyMmDd,
    /// `08/16/2025`
    MmDdYyyy,
    /// `16/08/2025`
    DdMmYyyy,
}

static YYYY_MM_DD: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])$").ok()
});
static MM_DD_YYYY: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^(0[1-9]|1[0-2])/(0[1-9]|[12][0-9]|3[01])/[0-9]{4}$").ok()
});
static DD_MM_YYYY: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^(0[1-9]|[12][0-9]|3[01])/(0[1-9]|1[0-2])/[0-9]{4}$").ok()
});

impl DateFormat {
    pub const ALL: [DateFormat; 3] = [
        DateFormat::YyyyMmDd,
        DateFormat::MmDdYyyy,
        DateFormat::DdMmYyyy,
    ];

    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::YyyyMmDd => "YYYY-MM-DD",
            DateFormat::MmDdYyyy => "MM/DD/YYYY",
            DateFormat::DdMmYyyy => "DD/MM/YYYY",
        }
    }

    fn regex(self) -> Option<&'static Regex> {
        match self {
            DateFormat::YyyyMmDd => YYYY_MM_DD.as_ref(),
            DateFormat::MmDdYyyy => MM_DD_YYYY.as_ref(),
            DateFormat::DdMmYyyy => DD_MM_YYYY.as_ref(),
        }
    }

    /// Splits `value` on this layout's separator into `(year, month, day)`.
    ///
    /// Lenient on purpose: `2025-1-5` still yields components even though it
    /// fails the strict layout check.
    fn components(self, value: &str) -> Option<(i32, u32, u32)> {
        let separator = match self {
            DateFormat::YyyyMmDd => '-',
            DateFormat::MmDdYyyy | DateFormat::DdMmYyyy => '/',
        };
        let parts: Vec<&str> = value.split(separator).collect();
        let [a, b, c] = parts.as_slice() else {
            return None;
        };
        match self {
            DateFormat::YyyyMmDd => Some((a.parse().ok()?, b.parse().ok()?, c.parse().ok()?)),
            DateFormat::MmDdYyyy => Some((c.parse().ok()?, a.parse().ok()?, b.parse().ok()?)),
            DateFormat::DdMmYyyy => Some((c.parse().ok()?, b.parse().ok()?, a.parse().ok()?)),
        }
    }

    fn render(self, date: NaiveDate) -> String {
        let layout = match self {
            DateFormat::YyyyMmDd => "%Y-%m-%d",
            DateFormat::MmDdYyyy => "%m/%d/%Y",
            DateFormat::DdMmYyyy => "%d/%m/%Y",
        };
        date.format(layout).to_string()
    }
}

impl std::fmt::Display for DateFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pattern())
    }
}

impl std::str::FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "YYYY-MM-DD" => Ok(DateFormat::YyyyMmDd),
            "MM/DD/YYYY" => Ok(DateFormat::MmDdYyyy),
            "DD/MM/YYYY" => Ok(DateFormat::DdMmYyyy),
            other => Err(format!("Invalid date format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("date.invalid")]
pub struct InvalidDateError {
    pub value: String,
}

impl InvalidDateError {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// A date as it reaches the engine: nothing, a calendar date, or raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DateInput {
    #[default]
    Empty,
    Date(NaiveDate),
    Text(String),
}

impl DateInput {
    pub fn is_empty(&self) -> bool {
        match self {
            DateInput::Empty => true,
            DateInput::Date(_) => false,
            DateInput::Text(text) => text.is_empty(),
        }
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<Option<NaiveDate>> for DateInput {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map_or(DateInput::Empty, DateInput::Date)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

impl From<&DateInput> for DateInput {
    fn from(input: &DateInput) -> Self {
        input.clone()
    }
}

/// Strict layout check: two-digit month 01-12, two-digit day 01-31 and a
/// four-digit year. Calendar validity (e.g. 31/04) is not checked here.
pub fn validate_format(value: &str, format: DateFormat) -> bool {
    if value.is_empty() {
        return false;
    }
    format.regex().is_some_and(|re| re.is_match(value))
}

fn shift_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let months = Months::new(years.unsigned_abs().checked_mul(12)?);
    if years >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    }
}

/// Detection order used when none is configured.
///
/// `DD/MM/YYYY` comes before `MM/DD/YYYY`, so any numeric value whose day is
/// 12 or less reads as day-first.
pub const DEFAULT_DETECTION_ORDER: [DateFormat; 3] = [
    DateFormat::YyyyMmDd,
    DateFormat::DdMmYyyy,
    DateFormat::MmDdYyyy,
];

/// Parses, detects and renders dates in the three supported layouts.
///
/// The detection order is an explicit policy; the first entry doubles as the
/// fallback layout when no strict pattern matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateEngine {
    detection_order: Vec<DateFormat>,
}

impl Default for DateEngine {
    fn default() -> Self {
        Self {
            detection_order: DEFAULT_DETECTION_ORDER.to_vec(),
        }
    }
}

impl DateEngine {
    /// An empty order falls back to [`DEFAULT_DETECTION_ORDER`].
    pub fn new(detection_order: Vec<DateFormat>) -> Self {
        if detection_order.is_empty() {
            return Self::default();
        }
        Self { detection_order }
    }

    pub fn detection_order(&self) -> &[DateFormat] {
        &self.detection_order
    }

    pub fn detect_format(&self, value: &str) -> DateFormat {
        self.detection_order
            .iter()
            .copied()
            .find(|format| validate_format(value, *format))
            .unwrap_or(self.detection_order[0])
    }

    /// Builds the date from its calendar components, with no timezone shift.
    ///
    /// `Ok(None)` means there was nothing to parse.
    pub fn parse_to_date(
        &self,
        input: impl Into<DateInput>,
    ) -> Result<Option<NaiveDate>, InvalidDateError> {
        match input.into() {
            DateInput::Empty => Ok(None),
            DateInput::Date(date) => Ok(Some(date)),
            DateInput::Text(text) if text.is_empty() => Ok(None),
            DateInput::Text(text) => {
                let format = self.detect_format(&text);
                format
                    .components(&text)
                    .and_then(|(year, month, day)| NaiveDate::from_ymd_opt(year, month, day))
                    .map(Some)
                    .ok_or_else(|| InvalidDateError::new(text))
            }
        }
    }

    /// Renders the input in `format`; empty or unparseable input yields `""`.
    pub fn format_date(&self, input: impl Into<DateInput>, format: DateFormat) -> String {
        match self.parse_to_date(input) {
            Ok(Some(date)) => format.render(date),
            _ => String::new(),
        }
    }

    pub fn is_invalid_date(&self, input: impl Into<DateInput>) -> bool {
        !matches!(self.parse_to_date(input), Ok(Some(_)))
    }

    fn require_date(&self, input: impl Into<DateInput>) -> Result<NaiveDate, InvalidDateError> {
        let input = input.into();
        let raw = match &input {
            DateInput::Text(text) => text.clone(),
            DateInput::Empty => String::new(),
            DateInput::Date(date) => date.to_string(),
        };
        self.parse_to_date(input)?
            .ok_or_else(|| InvalidDateError::new(raw))
    }

    pub fn add_years(
        &self,
        input: impl Into<DateInput>,
        years: i32,
    ) -> Result<NaiveDate, InvalidDateError> {
        let date = self.require_date(input)?;
        shift_years(date, years).ok_or_else(|| InvalidDateError::new(date.to_string()))
    }

    pub fn is_today(&self, input: impl Into<DateInput>) -> Result<bool, InvalidDateError> {
        let date = self.require_date(input)?;
        let today = Local::now().date_naive();
        Ok(date.year() == today.year() && date.month() == today.month() && date.day() == today.day())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn should_reject_month_thirteen_in_iso_layout() {
        assert!(!validate_format("2025-13-01", DateFormat::YyyyMmDd));
    }

    #[test]
    fn should_accept_each_layout_only_for_its_own_pattern() {
        assert!(validate_format("2025-08-16", DateFormat::YyyyMmDd));
        assert!(validate_format("08/16/2025", DateFormat::MmDdYyyy));
        assert!(validate_format("16/08/2025", DateFormat::DdMmYyyy));
        assert!(!validate_format("2025-08-16", DateFormat::DdMmYyyy));
        assert!(!validate_format("16/08/2025", DateFormat::MmDdYyyy));
        assert!(!validate_format("", DateFormat::YyyyMmDd));
    }

    #[test]
    fn should_not_check_calendar_validity_in_layout_check() {
        assert!(validate_format("31/04/2025", DateFormat::DdMmYyyy));
    }

    #[test]
    fn should_prefer_day_first_for_ambiguous_values() {
        let engine = DateEngine::default();
        assert_eq!(engine.detect_format("03/04/2025"), DateFormat::DdMmYyyy);
        assert_eq!(engine.detect_format("08/16/2025"), DateFormat::MmDdYyyy);
        assert_eq!(engine.detect_format("2025-08-16"), DateFormat::YyyyMmDd);
    }

    #[test]
    fn should_fall_back_to_first_configured_format() {
        let engine = DateEngine::default();
        assert_eq!(engine.detect_format("not a date"), DateFormat::YyyyMmDd);

        let month_first = DateEngine::new(vec![DateFormat::MmDdYyyy, DateFormat::DdMmYyyy]);
        assert_eq!(month_first.detect_format("03/04/2025"), DateFormat::MmDdYyyy);
        assert_eq!(month_first.detect_format("garbage"), DateFormat::MmDdYyyy);
    }

    #[test]
    fn should_use_default_order_when_configured_order_is_empty() {
        assert_eq!(DateEngine::new(vec![]), DateEngine::default());
    }

    #[test]
    fn should_parse_each_layout_into_calendar_components() {
        let engine = DateEngine::default();
        assert_eq!(engine.parse_to_date("2025-08-16"), Ok(Some(date(2025, 8, 16))));
        assert_eq!(engine.parse_to_date("16/08/2025"), Ok(Some(date(2025, 8, 16))));
        assert_eq!(engine.parse_to_date("08/16/2025"), Ok(Some(date(2025, 8, 16))));
    }

    #[test]
    fn should_return_none_for_empty_input() {
        let engine = DateEngine::default();
        assert_eq!(engine.parse_to_date(""), Ok(None));
        assert_eq!(engine.parse_to_date(DateInput::Empty), Ok(None));
    }

    #[test]
    fn should_return_dates_unchanged() {
        let engine = DateEngine::default();
        assert_eq!(engine.parse_to_date(date(2024, 2, 29)), Ok(Some(date(2024, 2, 29))));
    }

    #[test]
    fn should_fail_for_unparseable_text() {
        let engine = DateEngine::default();
        assert_eq!(
            engine.parse_to_date("someday"),
            Err(InvalidDateError::new("someday"))
        );
        assert!(engine.parse_to_date("31/02/2025").is_err());
    }

    #[test]
    fn should_parse_loose_iso_components_through_fallback() {
        let engine = DateEngine::default();
        assert_eq!(engine.parse_to_date("2025-1-5"), Ok(Some(date(2025, 1, 5))));
    }

    #[test]
    fn should_format_into_requested_layout() {
        let engine = DateEngine::default();
        assert_eq!(engine.format_date("2025-08-16", DateFormat::DdMmYyyy), "16/08/2025");
        assert_eq!(engine.format_date("16/08/2025", DateFormat::MmDdYyyy), "08/16/2025");
        assert_eq!(engine.format_date(date(2025, 8, 16), DateFormat::YyyyMmDd), "2025-08-16");
    }

    #[test]
    fn should_format_invalid_input_as_empty_string() {
        let engine = DateEngine::default();
        assert_eq!(engine.format_date(DateInput::Empty, DateFormat::DdMmYyyy), "");
        assert_eq!(engine.format_date("bogus", DateFormat::DdMmYyyy), "");
    }

    #[test]
    fn should_report_invalid_dates() {
        let engine = DateEngine::default();
        assert!(engine.is_invalid_date(DateInput::Empty));
        assert!(engine.is_invalid_date("bogus"));
        assert!(!engine.is_invalid_date("2025-08-16"));
    }

    #[test]
    fn should_add_years_keeping_month_and_day() {
        let engine = DateEngine::default();
        assert_eq!(engine.add_years("16/08/2025", 1), Ok(date(2026, 8, 16)));
        assert_eq!(engine.add_years(date(2025, 8, 16), -3), Ok(date(2022, 8, 16)));
    }

    #[test]
    fn should_clamp_leap_day_when_target_year_is_not_leap() {
        let engine = DateEngine::default();
        assert_eq!(engine.add_years(date(2024, 2, 29), 1), Ok(date(2025, 2, 28)));
    }

    #[test]
    fn should_fail_adding_years_to_invalid_input() {
        let engine = DateEngine::default();
        assert!(engine.add_years("bogus", 1).is_err());
        assert!(engine.add_years(DateInput::Empty, 1).is_err());
    }

    #[test]
    fn should_recognise_today_ignoring_time_of_day() {
        let engine = DateEngine::default();
        let today = Local::now().date_naive();
        assert_eq!(engine.is_today(today), Ok(true));
        assert_eq!(engine.is_today(today.pred_opt().unwrap()), Ok(false));
        assert!(engine.is_today("bogus").is_err());
    }

    #[test]
    fn should_parse_and_print_format_names() {
        for format in DateFormat::ALL {
            assert_eq!(format.to_string().parse::<DateFormat>(), Ok(format));
        }
        assert!("YYYY/MM/DD".parse::<DateFormat>().is_err());
    }

    fn any_date() -> impl Strategy<Value = NaiveDate> {
        (1000i32..=9999, 1u32..=12, 1u32..=31)
            .prop_filter_map("calendar date", |(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
    }

    fn any_format() -> impl Strategy<Value = DateFormat> {
        prop_oneof![
            Just(DateFormat::YyyyMmDd),
            Just(DateFormat::MmDdYyyy),
            Just(DateFormat::DdMmYyyy),
        ]
    }

    proptest! {
        #[test]
        fn should_round_trip_when_layout_leads_detection(d in any_date(), format in any_format()) {
            let engine = DateEngine::new(vec![format]);
            let text = engine.format_date(d, format);
            prop_assert_eq!(engine.parse_to_date(text), Ok(Some(d)));
        }

        #[test]
        fn should_round_trip_unambiguous_values_with_default_order(d in any_date(), format in any_format()) {
            prop_assume!(format != DateFormat::MmDdYyyy || d.day() > 12 || d.day() == d.month());
            let engine = DateEngine::default();
            let text = engine.format_date(d, format);
            prop_assert_eq!(engine.parse_to_date(text), Ok(Some(d)));
        }

        #[test]
        fn should_undo_add_years_with_negated_offset(d in any_date(), years in -500i32..500) {
            prop_assume!(!(d.month() == 2 && d.day() == 29));
            let engine = DateEngine::default();
            let shifted = engine.add_years(d, years).unwrap();
            prop_assert_eq!(engine.add_years(shifted, -years), Ok(d));
        }
    }
}
