/// Render a count with its unit, e.g. `1 year`, `2 years`, `0.5 years`.
///
/// Whole numbers print without decimals and fractional counts keep one decimal place.
/// Only a count that renders as exactly `1` takes the singular form.
pub fn pluralize(count: f64, singular: &str) -> String {
    let rendered = format_quantity(count);
    if rendered == "1" {
        format!("{rendered} {singular}")
    } else {
        format!("{rendered} {singular}s")
    }
}

pub fn format_quantity(count: f64) -> String {
    let rounded = round_to_tenth(count);
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// Absorbs representation error in differences such as `3.0 - 2.7`.
const TENTH_EPSILON: f64 = 1e-9;

/// Round up to one decimal place. A positive shortfall never renders as zero.
pub fn ceil_to_tenth(value: f64) -> f64 {
    (value * 10.0 - TENTH_EPSILON).ceil() / 10.0
}

/// Round down to one decimal place. Partial progress never renders as the threshold.
pub fn floor_to_tenth(value: f64) -> f64 {
    (value * 10.0 + TENTH_EPSILON).floor() / 10.0
}
