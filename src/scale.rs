// src/scale.rs

//! Ingredient quantity scaling
//!
//! Scales the quantity tokens embedded in a free-text ingredient line
//! ("2 cups flour", "1/2 tsp salt") by a serving multiplier and renders
//! the result back into readable text. Applied transiently at display
//! time; the stored ingredient line never changes.
//!
//! Recognized quantity tokens: integers, decimals, plain ASCII
//! fractions, and the unicode fraction glyphs ¼ ⅓ ½ ⅔ ¾. Anything the
//! scanner cannot resolve is left untouched, so a malformed token never
//! corrupts the surrounding text.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Fraction tokens with their decimal values. Rendering matches scaled
/// values back against the ASCII entries with 0.01 absolute tolerance;
/// both the table and the tolerance are deliberate lossy constants and
/// must not be replaced with exact rational arithmetic.
const KNOWN_FRACTIONS: &[(&str, f64)] = &[
    ("1/4", 0.25),
    ("1/3", 0.333),
    ("1/2", 0.5),
    ("2/3", 0.667),
    ("3/4", 0.75),
    ("¼", 0.25),
    ("⅓", 0.333),
    ("½", 0.5),
    ("⅔", 0.667),
    ("¾", 0.75),
];

/// Number of leading ASCII entries in [`KNOWN_FRACTIONS`].
const ASCII_FRACTIONS: usize = 5;

const FRACTION_TOLERANCE: f64 = 0.01;

static QUANTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+|\d+/\d+|\d+|[¼⅓½⅔¾]").unwrap());

/// Scale every quantity token in `line` by `multiplier`.
///
/// Non-quantity text is preserved verbatim. A multiplier of 1 returns
/// the line unchanged. This function never fails: unresolvable tokens
/// pass through as-is.
///
/// ```
/// use larder::scale_ingredient;
///
/// assert_eq!(scale_ingredient("2 cups flour", 2.0), "4 cups flour");
/// assert_eq!(scale_ingredient("1/2 tsp salt", 2.0), "1 tsp salt");
/// ```
pub fn scale_ingredient(line: &str, multiplier: f64) -> String {
    // Identity fast path: avoids reformatting and float noise.
    if multiplier == 1.0 {
        return line.to_string();
    }

    QUANTITY_RE
        .replace_all(line, |caps: &Captures| {
            let token = &caps[0];
            match resolve_quantity(token) {
                Some(value) => render_quantity(value * multiplier),
                None => token.to_string(),
            }
        })
        .into_owned()
}

/// Resolve a matched token to its numeric value.
///
/// Known fraction tokens resolve through the fixed table; other slash
/// tokens divide numerator by denominator; everything else parses as a
/// float. Returns None when the token has no usable numeric value.
fn resolve_quantity(token: &str) -> Option<f64> {
    if let Some((_, value)) = KNOWN_FRACTIONS.iter().find(|(text, _)| *text == token) {
        return Some(*value);
    }

    if let Some((numerator, denominator)) = token.split_once('/') {
        let numerator: f64 = numerator.parse().ok()?;
        let denominator: f64 = denominator.parse().ok()?;
        if denominator == 0.0 {
            return None;
        }
        return Some(numerator / denominator);
    }

    token.parse().ok()
}

/// Render a scaled value in the most readable form: plain integer,
/// known ASCII fraction within tolerance, or 2-decimal fallback with
/// trailing zeros stripped.
fn render_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        return format!("{}", value as i64);
    }

    let fraction = KNOWN_FRACTIONS[..ASCII_FRACTIONS]
        .iter()
        .find(|(_, decimal)| (value - decimal).abs() < FRACTION_TOLERANCE);
    if let Some((text, _)) = fraction {
        return (*text).to_string();
    }

    let mut rendered = format!("{value:.2}");
    while rendered.ends_with('0') {
        rendered.pop();
    }
    if rendered.ends_with('.') {
        rendered.pop();
    }
    rendered
}
