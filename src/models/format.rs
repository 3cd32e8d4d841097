//! Display Helpers

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

/// Parse the datetime spellings the backend and fixtures produce
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Birth dates may be a bare date or a full datetime
pub fn parse_birth_date(s: &str) -> Option<NaiveDate> {
    parse_datetime(s).map(|dt| dt.date_naive())
}

/// Age in whole years as of today (UTC)
pub fn calculate_age(birth: NaiveDate) -> i32 {
    calculate_age_at(birth, Utc::now().date_naive())
}

/// Age in whole years as of `today`
pub fn calculate_age_at(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Long-form date, e.g. "March 1, 2024"
pub fn format_date(s: &str) -> String {
    parse_datetime(s)
        .map(|dt| dt.format("%B %-d, %Y").to_string())
        .unwrap_or_default()
}

/// Upper-cased first letter of each word
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Cut to `length` characters, appending "..." when shortened
pub fn truncate(s: &str, length: usize) -> String {
    if s.chars().count() <= length {
        return s.to_string();
    }
    let cut: String = s.chars().take(length).collect();
    format!("{}...", cut)
}
