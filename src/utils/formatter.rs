//! Display formatting for dates, hour amounts and worked time.
//!
//! All functions are pure and total. Inputs the backend is trusted to send
//! well-formed (ISO dates) are not defended against.

use chrono::NaiveDateTime;

/// Placeholder shown instead of an end time while a record is still open.
pub const OPEN_END: &str = "—";

/// Reorders an ISO `YYYY-MM-DD` date into `DD/MM/YYYY`.
///
/// `"2024-06-15"` becomes `"15/06/2024"`. Malformed input yields a garbled
/// string, never a panic.
pub fn format_date_iso_to_european(date: &str) -> String {
    let mut parts = date.split('-');
    let year = parts.next().unwrap_or_default();
    let month = parts.next().unwrap_or_default();
    let day = parts.next().unwrap_or_default();
    format!("{day}/{month}/{year}")
}

/// Formats decimal hours as `"{h}h {m}m"`; `1.5` becomes `"1h 30m"`.
///
/// Missing and non-finite values format as an empty string. Minutes are
/// rounded, so values a hair below the next hour render as `"{h}h 60m"`.
pub fn format_decimal_hours(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let hours = v.floor();
            let minutes = ((v - hours) * 60.0).round();
            format!("{}h {}m", hours as i64, minutes as i64)
        }
        _ => String::new(),
    }
}

/// Time between `start` and `end` as `"{h}h {mm}m"`.
///
/// An absent `end` means the record is open, so `now` is used as the end
/// bound. Seconds are truncated and negative spans render as zero.
pub fn format_elapsed(start: NaiveDateTime, end: Option<NaiveDateTime>, now: NaiveDateTime) -> String {
    let end = end.unwrap_or(now);
    let minutes = (end - start).num_minutes().max(0);
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

/// `DD/MM/YYYY HH:MM`, the format used for record start and end columns.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%d/%m/%Y %H:%M").to_string()
}

/// Turns an enum code into a label: `"FORMA_JURIDICA"` becomes `"Forma Juridica"`.
pub fn humanize_label(value: &str) -> String {
    value
        .to_lowercase()
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
