//! Display helpers shared by every page.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const NOT_AVAILABLE: &str = "N/A";

pub fn or_fallback(value: Option<&str>, fallback: &str) -> String {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

pub fn or_na(value: Option<&str>) -> String {
    or_fallback(value, NOT_AVAILABLE)
}

/// `Jan 5, 2024`
pub fn short_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `January 5, 2024`
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// `Fri, Jan 5, 2024`
pub fn weekday_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d, %Y").to_string()
}

/// `Friday, January 5, 2024`
pub fn full_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Accepts the timestamp shapes the backend emits: RFC 3339, naive ISO
/// date-times with or without fractions, and plain dates.
pub fn parse_loose_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Some(dt.date());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// `2024-03` becomes `Mar 2024`; anything else is shown as given.
pub fn month_label(month: &str) -> String {
    let trimmed = month.trim();
    if trimmed.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
        .map(|date| date.format("%b %Y").to_string())
        .unwrap_or_else(|_| trimmed.to_string())
}

/// Two decimals with thousands separators: `12,500.00`.
pub fn currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        "-"
    } else {
        ""
    };
    format!("{sign}{}.{fraction}", group_thousands(whole))
}

/// Thousands separators with at most three decimals and no trailing zeros:
/// `52,000` or `1,234.5`.
pub fn number(amount: f64) -> String {
    let fixed = format!("{:.3}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');
    let sign = if amount < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        "-"
    } else {
        ""
    };
    if fraction.is_empty() {
        format!("{sign}{}", group_thousands(whole))
    } else {
        format!("{sign}{}.{fraction}", group_thousands(whole))
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Lenient numeric input: the longest leading number, or 0 when there is
/// none (`"12.5kg"` is 12.5, `"1e3"` is 1000, `"abc"` is 0).
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (index, ch) in trimmed.char_indices() {
        match ch {
            '+' | '-' if index == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = index + ch.len_utf8();
    }

    if !seen_digit {
        return 0.0;
    }
    let mantissa = trimmed[..end].trim_end_matches('.');
    let exponent = exponent_suffix(&trimmed[end..]);
    format!("{mantissa}{exponent}")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// `e`/`E`, an optional sign and at least one digit; empty otherwise.
fn exponent_suffix(rest: &str) -> &str {
    let bytes = rest.as_bytes();
    if !matches!(bytes.first(), Some(b'e' | b'E')) {
        return "";
    }
    let mut end = 1;
    if matches!(bytes.get(end), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits = bytes[end..].iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return "";
    }
    &rest[..end + digits]
}

pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Initials of every word in a full name: `Mary Ann Smith` is `MAS`.
pub fn initials(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// First-name and last-name initials, or `NA` when both are missing.
pub fn name_initials(first: Option<&str>, last: Option<&str>) -> String {
    let pick = |part: Option<&str>| {
        part.and_then(|value| value.trim().chars().next())
            .map(|ch| ch.to_uppercase().collect::<String>())
            .unwrap_or_default()
    };
    let combined = format!("{}{}", pick(first), pick(last));
    if combined.is_empty() {
        "NA".to_string()
    } else {
        combined
    }
}

pub fn day_count(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

/// Whole-number share of `part` in `total`; `None` when `total` is zero.
pub fn percentage(part: u64, total: u64) -> Option<u64> {
    if total == 0 {
        return None;
    }
    Some(((part as f64 / total as f64) * 100.0).round() as u64)
}
