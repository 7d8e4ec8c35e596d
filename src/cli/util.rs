// ABOUTME: Shared CLI display helpers
//
// Formats prices the way the booking site shows them (id-ID grouping) and
// derives the day-period label the original slot picker displayed.

use chrono::{NaiveTime, Timelike};

/// Format a minor-unit price as rupiah with dot grouping, e.g. `Rp 50.000`
pub fn format_rupiah(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("Rp {grouped}")
}

/// Day-period label for a slot (presentation only; not part of the wire
/// contract)
pub fn period_label(time: NaiveTime) -> &'static str {
    match time.hour() {
        0..=11 => "morning",
        12..=16 => "afternoon",
        _ => "evening",
    }
}
