// Date helpers, safe division and number formatting.
//
// Derived record fields and the console output both lean on these, so the
// date rules live in exactly one place.
use chrono::{Datelike, Month, NaiveDate};
use num_format::{CustomFormat, Grouping, Locale, ToFormattedString};
use once_cell::sync::Lazy;

/// Sum money amounts, saturating at the `i64` bounds instead of overflowing.
pub fn sum_amounts(amounts: impl IntoIterator<Item = i64>) -> i64 {
    amounts.into_iter().fold(0, i64::saturating_add)
}

// Indian digit grouping (12,34,567) used for rupee amounts.
static INDIAN_GROUPING: Lazy<Option<CustomFormat>> = Lazy::new(|| {
    CustomFormat::builder()
        .grouping(Grouping::Indian)
        .separator(",")
        .build()
        .ok()
});

/// Turn a `DD-MM-YYYY` display date into `YYYY-MM-DD` by reversing the
/// `-` separated components.
pub fn reverse_date_components(s: &str) -> String {
    s.trim().split('-').rev().collect::<Vec<_>>().join("-")
}

/// Parse a `DD-MM-YYYY` display date into a calendar date.
///
/// The components are reversed first and the result handed to the ISO
/// parser, so ordering always follows the reversed form.
pub fn parse_display_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(&reverse_date_components(s), "%Y-%m-%d").ok()
}

/// Full English month name, e.g. `"August"`.
pub fn month_name(date: NaiveDate) -> &'static str {
    // `month()` is always 1..=12, so the conversion cannot fail.
    Month::try_from(date.month() as u8)
        .map(|m| m.name())
        .unwrap_or("")
}

/// Week of year where week 1 starts on 1 January:
/// `ceil((day_index + jan1_weekday + 1) / 7)` with Sunday = 0.
///
/// This is not the ISO week; the first days of January are always week 1
/// and weeks roll over on Sunday.
pub fn week_number(date: NaiveDate) -> u32 {
    let day_index = date.ordinal0();
    let jan1_weekday = NaiveDate::from_yo_opt(date.year(), 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0);
    (day_index + jan1_weekday + 1).div_ceil(7)
}

/// `num / den`, or `NaN` when `den` is zero.
pub fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        return f64::NAN;
    }
    num / den
}

pub fn group_digits(n: i64) -> String {
    match INDIAN_GROUPING.as_ref() {
        Some(fmt) => n.to_formatted_string(fmt),
        None => n.to_formatted_string(&Locale::en),
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus digit grouping on the integer part. Non-finite
    // values render as the `N/A` sentinel instead of a bogus zero.
    if !n.is_finite() {
        return "N/A".to_string();
    }
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = group_digits(int_val);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Rupee amount with no minor units, e.g. `₹1,00,000`.
pub fn format_currency(n: f64) -> String {
    let s = format_number(n.round(), 0);
    match s.strip_prefix('-') {
        Some(rest) => format!("-₹{}", rest),
        None if s == "N/A" => s,
        None => format!("₹{}", s),
    }
}

pub fn format_pct(n: f64) -> String {
    if !n.is_finite() {
        return "N/A".to_string();
    }
    format!("{:.1}%", n)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
