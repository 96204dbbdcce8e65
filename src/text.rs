//! Text helpers shared by both renderers: greedy word-wrap under a
//! character budget, fixed-width alignment, and the money/date formatting
//! both outputs must agree on.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Greedy word-wrap. Words accumulate onto the current line while the line
/// stays within `max_width` characters; a single word longer than
/// `max_width` is hard-split into `max_width`-sized chunks instead of
/// overflowing. Returns the text unchanged when it already fits.
pub fn wrap(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    if text.chars().count() <= max_width {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let chunks: Vec<String> = word
                .chars()
                .collect::<Vec<_>>()
                .chunks(max_width)
                .map(|chunk| chunk.iter().collect())
                .collect();
            // Last chunk stays open so following words can join it.
            for chunk in &chunks[..chunks.len() - 1] {
                lines.push(chunk.clone());
            }
            current = chunks[chunks.len() - 1].clone();
            continue;
        }

        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word_len <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Number of lines `text` occupies when wrapped at `max_width`.
pub fn wrapped_line_count(text: &str, max_width: usize) -> usize {
    wrap(text, max_width).len()
}

/// Pad a line on the left so it sits centred in a `width`-column stream.
/// Text already at or beyond `width` is returned as-is.
pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let pad = (width - len) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Right-align a line in a `width`-column stream.
pub fn align_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat(width - len), text)
}

/// Dash rule spanning the full stream width.
pub fn rule(width: usize) -> String {
    "-".repeat(width)
}

/// Format an amount with two decimals and a comma decimal separator.
pub fn money(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{value:.2}").replace('.', ",")
}

/// Currency-prefixed amount, e.g. `AOA 1000,00`.
pub fn amount(value: f64, currency: &str) -> String {
    format!("{} {}", currency, money(value))
}

/// Tax-rate percentage label, e.g. `14%` or `14,5%`.
pub fn tax_label(rate: f64) -> String {
    let rate = if rate.is_finite() { rate } else { 0.0 };
    if (rate - rate.round()).abs() < f64::EPSILON {
        format!("{rate:.0}%")
    } else {
        format!("{rate:.1}%").replace('.', ",")
    }
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.naive_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// `dd-mm-yyyy hh:mm:ss` rendering of an ISO-8601 timestamp. Unparsable
/// input passes through trimmed, so a damaged date still prints something.
pub fn format_datetime(raw: &str) -> String {
    let trimmed = raw.trim();
    match parse_datetime(trimmed) {
        Some(naive) => naive.format("%d-%m-%Y %H:%M:%S").to_string(),
        None => trimmed.to_string(),
    }
}

/// Date-only `dd-mm-yyyy` rendering of the same input.
pub fn format_date(raw: &str) -> String {
    let trimmed = raw.trim();
    match parse_datetime(trimmed) {
        Some(naive) => naive.format("%d-%m-%Y").to_string(),
        None => trimmed.to_string(),
    }
}
