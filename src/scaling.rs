//! Rescaling ingredient amounts when the serving count changes.
//!
//! Amounts are free text. Only a leading quantity is scaled ("1 1/2 cups",
//! "200 g", "½ tsp", "2-3 cloves"); the rest of the string is kept as
//! written, and text without a leading quantity ("a pinch", "to taste") is
//! returned unchanged.

use crate::model::Recipe;
use regex::Regex;
use std::sync::OnceLock;

/// Fractions that read better than decimals in a recipe, with their display form.
const FRIENDLY_FRACTIONS: [(f64, &str); 5] = [
    (0.25, "1/4"),
    (1.0 / 3.0, "1/3"),
    (0.5, "1/2"),
    (2.0 / 3.0, "2/3"),
    (0.75, "3/4"),
];

const SNAP_TOLERANCE: f64 = 0.02;

// Smallest amount shown for an ingredient that is still present.
const MIN_DISPLAY: &str = "0.1";

fn quantity_regex() -> Option<&'static Regex> {
    static QUANTITY_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    QUANTITY_REGEX
        .get_or_init(|| {
            Regex::new(concat!(
                r"^(?:",
                r"(?P<grouped>\d{1,3}(?:,\d{3})+(?:\.\d+)?)",
                r"|(?P<mixed_whole>\d+)\s+(?P<mixed_num>\d+)/(?P<mixed_den>\d+)",
                r"|(?P<num>\d+)/(?P<den>\d+)",
                r"|(?P<vulgar_whole>\d+)?\s?(?P<vulgar>[½¼¾⅓⅔⅛])",
                r"|(?P<decimal>\d*\.\d+|\d+)",
                r")",
            ))
            .ok()
        })
        .as_ref()
}

fn range_separator_regex() -> Option<&'static Regex> {
    static RANGE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    RANGE_REGEX
        .get_or_init(|| Regex::new(r"^\s*(?:-|–|to\b)\s*").ok())
        .as_ref()
}

fn vulgar_value(c: &str) -> Option<f64> {
    match c {
        "½" => Some(0.5),
        "¼" => Some(0.25),
        "¾" => Some(0.75),
        "⅓" => Some(1.0 / 3.0),
        "⅔" => Some(2.0 / 3.0),
        "⅛" => Some(0.125),
        _ => None,
    }
}

fn ratio(numerator: &str, denominator: &str) -> Option<f64> {
    let n: f64 = numerator.parse().ok()?;
    let d: f64 = denominator.parse().ok()?;
    if d == 0.0 {
        None
    } else {
        Some(n / d)
    }
}

/// Parse the quantity at the very start of `text`.
///
/// Returns the numeric value and the number of bytes it occupied.
fn parse_number(text: &str) -> Option<(f64, usize)> {
    let caps = quantity_regex()?.captures(text)?;
    let matched = caps.get(0)?;

    let value = if let Some(grouped) = caps.name("grouped") {
        grouped.as_str().replace(',', "").parse().ok()?
    } else if let Some(whole) = caps.name("mixed_whole") {
        let whole: f64 = whole.as_str().parse().ok()?;
        whole + ratio(caps.name("mixed_num")?.as_str(), caps.name("mixed_den")?.as_str())?
    } else if let Some(num) = caps.name("num") {
        ratio(num.as_str(), caps.name("den")?.as_str())?
    } else if let Some(vulgar) = caps.name("vulgar") {
        let whole: f64 = match caps.name("vulgar_whole") {
            Some(w) => w.as_str().parse().ok()?,
            None => 0.0,
        };
        whole + vulgar_value(vulgar.as_str())?
    } else {
        caps.name("decimal")?.as_str().parse().ok()?
    };

    Some((value, matched.end()))
}

/// Split an amount into its leading quantity and the untouched remainder.
///
/// Leading whitespace is skipped. Returns `None` when the amount does not
/// start with a number.
///
/// # Example
/// ```
/// use recipe_assistant::scaling::parse_leading_quantity;
///
/// assert_eq!(parse_leading_quantity("1 1/2 cups"), Some((1.5, " cups")));
/// assert_eq!(parse_leading_quantity("a pinch"), None);
/// ```
pub fn parse_leading_quantity(amount: &str) -> Option<(f64, &str)> {
    let trimmed = amount.trim_start();
    let (value, len) = parse_number(trimmed)?;
    Some((value, &trimmed[len..]))
}

/// Format a quantity for display.
///
/// Whole numbers print bare, values close to a quarter, third or half print
/// as fractions ("1/2", "1 3/4"), anything else gets at most one decimal.
pub fn format_quantity(value: f64) -> String {
    if value <= 0.0 {
        return "0".to_string();
    }

    let whole = value.floor();
    let frac = value - whole;

    if frac < SNAP_TOLERANCE {
        return format_whole(whole);
    }
    if frac > 1.0 - SNAP_TOLERANCE {
        return format_whole(whole + 1.0);
    }

    if let Some((_, display)) = FRIENDLY_FRACTIONS
        .iter()
        .find(|(f, _)| (frac - f).abs() < SNAP_TOLERANCE)
    {
        return if whole == 0.0 {
            display.to_string()
        } else {
            format!("{} {}", whole as u64, display)
        };
    }

    let decimal = format!("{:.1}", value);
    let decimal = decimal.trim_end_matches('0').trim_end_matches('.');
    if decimal == "0" {
        MIN_DISPLAY.to_string()
    } else {
        decimal.to_string()
    }
}

fn format_whole(whole: f64) -> String {
    if whole == 0.0 {
        MIN_DISPLAY.to_string()
    } else {
        format!("{}", whole as u64)
    }
}

/// Scale an amount string from `original_servings` to `desired_servings`.
///
/// A non-positive original serving count is treated as 1, and so is a
/// desired count below 1. When both counts are equal the amount is returned
/// as written.
///
/// # Example
/// ```
/// use recipe_assistant::scale_amount;
///
/// assert_eq!(scale_amount("200 g", 2, 4), "400 g");
/// assert_eq!(scale_amount("1/2 cup", 2, 1), "1/4 cup");
/// assert_eq!(scale_amount("a pinch", 2, 4), "a pinch");
/// ```
pub fn scale_amount(amount: &str, original_servings: i64, desired_servings: i64) -> String {
    let original = original_servings.max(1);
    let desired = desired_servings.max(1);
    if original == desired {
        return amount.to_string();
    }

    let Some((value, rest)) = parse_leading_quantity(amount) else {
        return amount.to_string();
    };
    let factor = desired as f64 / original as f64;
    let mut scaled = format_quantity(value * factor);

    // "2-3 cloves": scale the upper bound as well
    let mut rest = rest;
    if let Some(sep) = range_separator_regex().and_then(|re| re.find(rest)) {
        if let Some((upper, len)) = parse_number(&rest[sep.end()..]) {
            scaled.push_str(sep.as_str());
            scaled.push_str(&format_quantity(upper * factor));
            rest = &rest[sep.end() + len..];
        }
    }

    scaled.push_str(rest);
    scaled
}

/// Return a copy of `recipe` with every amount scaled to `desired_servings`.
pub fn scale_recipe(recipe: &Recipe, desired_servings: u32) -> Recipe {
    let original = i64::from(recipe.servings);
    let desired = i64::from(desired_servings.max(1));
    let mut scaled = recipe.clone();
    for ingredient in &mut scaled.ingredients {
        ingredient.amount = scale_amount(&ingredient.amount, original, desired);
    }
    scaled.servings = desired_servings.max(1);
    scaled
}
