//! Blog date display.
//!
//! Timestamps are shown as a medium date in the user's locale and time zone.
//! Both come from the environment by default; `DateFormat` pins them so
//! rendering is reproducible.

use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, Local, Locale, NaiveDate, NaiveDateTime};

/// Abbreviated month, two-digit day, numeric year.
const MEDIUM_DATE: &str = "%b %d, %Y";
const DEFAULT_LOCALE: Locale = Locale::en_US;
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_TIME", "LANG"];

/// Zone an offset timestamp is converted to before its calendar date is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayZone {
    Local,
    Fixed(FixedOffset),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFormat {
    zone: DisplayZone,
    locale: Locale,
}

impl DateFormat {
    pub fn new(zone: DisplayZone, locale: Locale) -> Self {
        Self { zone, locale }
    }

    /// Local time zone, locale from `LC_ALL`, `LC_TIME` or `LANG`.
    pub fn from_env() -> Self {
        let locale = LOCALE_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.is_empty())
            .and_then(|value| parse_locale(&value))
            .unwrap_or(DEFAULT_LOCALE);
        Self::new(DisplayZone::Local, locale)
    }

    pub fn zone(&self) -> DisplayZone {
        self.zone
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Render an ISO-8601 date, e.g. `Jan 15, 2024` in `en_US`. Input that
    /// does not parse is returned unchanged.
    pub fn format(&self, raw: &str) -> String {
        match self.calendar_date(raw) {
            Some(date) => date.format_localized(MEDIUM_DATE, self.locale).to_string(),
            None => raw.to_string(),
        }
    }

    /// Timestamps without an offset and plain dates are already wall-clock
    /// dates and are not shifted.
    fn calendar_date(&self, raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
            let date = match self.zone {
                DisplayZone::Local => timestamp.with_timezone(&Local).date_naive(),
                DisplayZone::Fixed(offset) => timestamp.with_timezone(&offset).date_naive(),
            };
            return Some(date);
        }
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(timestamp.date());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::from_env()
    }
}

/// POSIX locale name such as `fr_FR.UTF-8` or `de_DE@euro`. `C` and unknown
/// names yield `None`.
pub fn parse_locale(name: &str) -> Option<Locale> {
    let base = name.split(['.', '@']).next().unwrap_or_default().replace('-', "_");
    if base.is_empty() || base == "C" {
        return None;
    }
    Locale::try_from(base.as_str()).ok()
}

/// Format with the process-wide `DateFormat::from_env()`.
pub fn format_blog_date(raw: &str) -> String {
    static SYSTEM: OnceLock<DateFormat> = OnceLock::new();
    SYSTEM.get_or_init(DateFormat::from_env).format(raw)
}
