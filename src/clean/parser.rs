//! Text to coordinate conversion.
//!
//! Every `,` in a value is read as a decimal separator before conversion. With
//! a comma field delimiter, grouped numbers such as `1,234.5` therefore fail to
//! parse (or parse wrongly); choosing a non-comma delimiter is up to the caller.

use crate::models::Coordinate;

/// Parse a single raw value. Missing, empty, or unconvertible text yields `None`.
pub fn parse_value(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.replace(',', ".").parse::<f64>().ok()
}

/// Parse an x/y text pair into a coordinate
pub fn parse(raw_x: Option<&str>, raw_y: Option<&str>) -> Coordinate {
    match (parse_value(raw_x), parse_value(raw_y)) {
        (Some(x), Some(y)) => Coordinate::new(x, y),
        _ => Coordinate::Unparsed,
    }
}
