use chrono::{Local, NaiveDate};
use url::Url;

use crate::domain::shared::dates::{DateEngine, DateFormat, DateInput, validate_format};
use crate::domain::shared::value_objects::ProductId;

pub const NAME_LENGTH: (usize, usize) = (5, 100);
pub const DESCRIPTION_LENGTH: (usize, usize) = (10, 200);

/// Lower bound carried by a [`FieldError::MinDate`] so the caller can localize it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinDateBound {
    Today,
    /// The bound rendered as `DD/MM/YYYY`.
    Date(String),
}

/// Structured validation token attached to a single form field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("validation.required")]
    Required,
    #[error("validation.min_length")]
    MinLength { required: usize, actual: usize },
    #[error("validation.max_length")]
    MaxLength { required: usize, actual: usize },
    #[error("validation.invalid_url")]
    InvalidUrl,
    #[error("validation.invalid_date")]
    InvalidDate,
    #[error("validation.invalid_date_format")]
    InvalidDateFormat(DateFormat),
    #[error("validation.min_date")]
    MinDate(MinDateBound),
    #[error("validation.id_exists")]
    IdExists,
}

pub fn required(value: &str) -> Option<FieldError> {
    value.is_empty().then_some(FieldError::Required)
}

pub fn length(value: &str, min: usize, max: usize) -> Option<FieldError> {
    let actual = value.chars().count();
    if actual < min {
        return Some(FieldError::MinLength {
            required: min,
            actual,
        });
    }
    if actual > max {
        return Some(FieldError::MaxLength {
            required: max,
            actual,
        });
    }
    None
}

pub fn validate_id(value: &str) -> Option<FieldError> {
    required(value).or_else(|| length(value, ProductId::MIN_LENGTH, ProductId::MAX_LENGTH))
}

pub fn validate_name(value: &str) -> Option<FieldError> {
    required(value).or_else(|| length(value, NAME_LENGTH.0, NAME_LENGTH.1))
}

pub fn validate_description(value: &str) -> Option<FieldError> {
    required(value).or_else(|| length(value, DESCRIPTION_LENGTH.0, DESCRIPTION_LENGTH.1))
}

/// Absolute URL with a non-empty host and a non-opaque origin.
pub fn validate_logo(value: &str) -> Option<FieldError> {
    if let Some(error) = required(value) {
        return Some(error);
    }
    match Url::parse(value) {
        Ok(url) if url.host_str().is_some_and(|host| !host.is_empty()) && url.origin().is_tuple() => {
            None
        }
        _ => Some(FieldError::InvalidUrl),
    }
}

/// Text values must follow `format`; dates and empty values pass.
pub fn date_format(value: &DateInput, format: DateFormat) -> Option<FieldError> {
    match value {
        DateInput::Text(text) if !text.is_empty() && !validate_format(text, format) => {
            Some(FieldError::InvalidDateFormat(format))
        }
        _ => None,
    }
}

/// Release date rule: present, parseable and not before the minimum day.
/// With a layout set, typed text must also follow that layout.
#[derive(Debug, Clone)]
pub struct ReleaseDateRule {
    engine: DateEngine,
    min_date: Option<NaiveDate>,
    layout: Option<DateFormat>,
}

impl ReleaseDateRule {
    /// Minimum is "today" at the moment each validation runs.
    pub fn new(engine: DateEngine) -> Self {
        Self {
            engine,
            min_date: None,
            layout: None,
        }
    }

    pub fn with_min_date(engine: DateEngine, min_date: NaiveDate) -> Self {
        Self {
            engine,
            min_date: Some(min_date),
            layout: None,
        }
    }

    pub fn with_layout(mut self, layout: Option<DateFormat>) -> Self {
        self.layout = layout;
        self
    }

    pub fn validate(&self, value: &DateInput) -> Option<FieldError> {
        if value.is_empty() {
            return Some(FieldError::Required);
        }
        if let Some(error) = self.layout.and_then(|layout| date_format(value, layout)) {
            return Some(error);
        }
        let date = match self.engine.parse_to_date(value) {
            Ok(Some(date)) => date,
            _ => return Some(FieldError::InvalidDate),
        };

        let today = Local::now().date_naive();
        let min = self.min_date.unwrap_or(today);
        if date >= min {
            return None;
        }
        let bound = if min == today {
            MinDateBound::Today
        } else {
            MinDateBound::Date(self.engine.format_date(min, DateFormat::DdMmYyyy))
        };
        Some(FieldError::MinDate(bound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn should_require_id_and_bound_its_length() {
        assert_eq!(validate_id(""), Some(FieldError::Required));
        assert_eq!(
            validate_id("ab"),
            Some(FieldError::MinLength {
                required: 3,
                actual: 2
            })
        );
        assert_eq!(
            validate_id("abcdefghijk"),
            Some(FieldError::MaxLength {
                required: 10,
                actual: 11
            })
        );
        assert_eq!(validate_id("abc"), None);
    }

    #[test]
    fn should_bound_name_and_description_lengths() {
        assert!(matches!(validate_name("Card"), Some(FieldError::MinLength { .. })));
        assert_eq!(validate_name("Cards"), None);
        assert!(matches!(
            validate_description("too short"),
            Some(FieldError::MinLength { .. })
        ));
        assert_eq!(validate_description("long enough text"), None);
        assert!(matches!(
            validate_description(&"x".repeat(201)),
            Some(FieldError::MaxLength { .. })
        ));
    }

    #[test]
    fn should_count_characters_not_bytes() {
        assert_eq!(validate_name("ñañaña"), None);
        assert!(matches!(validate_id("éé"), Some(FieldError::MinLength { actual: 2, .. })));
    }

    #[test]
    fn should_accept_only_absolute_urls_with_host() {
        assert_eq!(validate_logo(""), Some(FieldError::Required));
        assert_eq!(validate_logo("https://example.com/logo.png"), None);
        assert_eq!(validate_logo("logo.png"), Some(FieldError::InvalidUrl));
        assert_eq!(validate_logo("mailto:ops@example.com"), Some(FieldError::InvalidUrl));
    }

    #[test]
    fn should_check_text_layout_only() {
        assert_eq!(
            date_format(&DateInput::from("2025-08-16"), DateFormat::DdMmYyyy),
            Some(FieldError::InvalidDateFormat(DateFormat::DdMmYyyy))
        );
        assert_eq!(date_format(&DateInput::from("16/08/2025"), DateFormat::DdMmYyyy), None);
        assert_eq!(date_format(&DateInput::Empty, DateFormat::DdMmYyyy), None);
        assert_eq!(date_format(&DateInput::from(date(2025, 8, 16)), DateFormat::DdMmYyyy), None);
    }

    #[test]
    fn should_require_release_date() {
        let rule = ReleaseDateRule::new(DateEngine::default());
        assert_eq!(rule.validate(&DateInput::Empty), Some(FieldError::Required));
    }

    #[test]
    fn should_flag_unparseable_release_date() {
        let rule = ReleaseDateRule::new(DateEngine::default());
        assert_eq!(rule.validate(&DateInput::from("someday")), Some(FieldError::InvalidDate));
    }

    #[test]
    fn should_accept_today_and_reject_yesterday_with_today_token() {
        let rule = ReleaseDateRule::new(DateEngine::default());
        let today = Local::now().date_naive();

        assert_eq!(rule.validate(&DateInput::from(today)), None);
        assert_eq!(
            rule.validate(&DateInput::from(today.pred_opt().unwrap())),
            Some(FieldError::MinDate(MinDateBound::Today))
        );
    }

    #[test]
    fn should_carry_configured_minimum_as_day_first_text() {
        let rule = ReleaseDateRule::with_min_date(DateEngine::default(), date(2025, 8, 16));

        assert_eq!(rule.validate(&DateInput::from("2025-08-17")), None);
        assert_eq!(
            rule.validate(&DateInput::from("2025-08-15")),
            Some(FieldError::MinDate(MinDateBound::Date("16/08/2025".to_string())))
        );
    }

    #[test]
    fn should_enforce_configured_layout_on_typed_release() {
        let rule = ReleaseDateRule::with_min_date(DateEngine::default(), date(2025, 8, 16))
            .with_layout(Some(DateFormat::DdMmYyyy));

        assert_eq!(
            rule.validate(&DateInput::from("2099-08-16")),
            Some(FieldError::InvalidDateFormat(DateFormat::DdMmYyyy))
        );
        assert_eq!(rule.validate(&DateInput::from("16/08/2099")), None);
        assert_eq!(rule.validate(&DateInput::from(date(2099, 8, 16))), None);
    }
}
