//! Finding cooking times in free-form step text.
//!
//! Step text such as "Simmer for 10-15 minutes" carries the only timing
//! information a generated recipe has, so cook mode reads timers from it.

use crate::scaling::parse_leading_quantity;
use regex::Regex;
use std::sync::OnceLock;

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

// Absorbs float error so 2.3 minutes is 138 seconds, not 137.
const TRUNCATION_EPSILON: f64 = 1e-9;

// Mixed numbers, fractions, vulgar fractions, decimals, integers.
const NUMBER: &str = r"\d+\s+\d+/\d+|\d+/\d+|\d*\s?[½¼¾⅓⅔⅛]|\d*\.\d+|\d+";

// A quantity cannot start inside another number ("1 1/2", "1.5").
const NUMBER_START: &str = r"(?:^|[^\d./])";

const RANGE_SEPARATOR: &str = r"(?:-|–|to\b)";

fn duration_regex(units: &str) -> Option<Regex> {
    Regex::new(&format!(
        r"(?i){start}(?P<value>{num})(?:\s*{sep}\s*(?:{num}))?\s*(?:{units})\b",
        start = NUMBER_START,
        num = NUMBER,
        sep = RANGE_SEPARATOR,
        units = units,
    ))
    .ok()
}

fn minute_regex() -> Option<&'static Regex> {
    static MINUTE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    MINUTE_REGEX
        .get_or_init(|| duration_regex("minutes?|mins?"))
        .as_ref()
}

fn hour_regex() -> Option<&'static Regex> {
    static HOUR_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    HOUR_REGEX
        .get_or_init(|| duration_regex("hours?|hrs?"))
        .as_ref()
}

/// Extract the first duration mentioned in `text`, in whole seconds.
///
/// Minutes are searched before hours. For a range like "10-15 minutes" or
/// "10 to 15 minutes" the lower bound is used. Returns `None` when the text names no duration.
///
/// # Example
/// ```
/// use recipe_assistant::extract_duration;
///
/// assert_eq!(extract_duration("Simmer for 10 minutes"), Some(600));
/// assert_eq!(extract_duration("1.5 hrs in the oven"), Some(5400));
/// assert_eq!(extract_duration("Add salt to taste"), None);
/// ```
pub fn extract_duration(text: &str) -> Option<u64> {
    first_match(minute_regex(), text, SECONDS_PER_MINUTE)
        .or_else(|| first_match(hour_regex(), text, SECONDS_PER_HOUR))
}

fn first_match(regex: Option<&Regex>, text: &str, unit_seconds: f64) -> Option<u64> {
    let captures = regex?.captures(text)?;
    let (value, _) = parse_leading_quantity(captures.name("value")?.as_str())?;
    Some((value * unit_seconds + TRUNCATION_EPSILON).floor() as u64)
}

/// Render seconds as a countdown clock: "mm:ss", or "h:mm:ss" from one hour.
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
