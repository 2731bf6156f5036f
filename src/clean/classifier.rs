//! Validity triage for parsed coordinates.

use rayon::prelude::*;

use crate::models::{Category, Coordinate};

pub const LON_RANGE: (f64, f64) = (-180.0, 180.0);
pub const LAT_RANGE: (f64, f64) = (-90.0, 90.0);

/// Assign a coordinate to Zero, Invalid, or Valid.
///
/// Rules apply in order: unparsed is Invalid, exact (0, 0) is Zero, in-range
/// (bounds inclusive) is Valid, anything else is Invalid. NaN fails every
/// comparison and so lands in Invalid.
pub fn classify(coord: &Coordinate) -> Category {
    let (x, y) = match coord.xy() {
        Some(xy) => xy,
        None => return Category::Invalid,
    };

    if x == 0.0 && y == 0.0 {
        return Category::Zero;
    }

    let lon_ok = x >= LON_RANGE.0 && x <= LON_RANGE.1;
    let lat_ok = y >= LAT_RANGE.0 && y <= LAT_RANGE.1;
    if lon_ok && lat_ok {
        Category::Valid
    } else {
        Category::Invalid
    }
}

/// Classify many coordinates in parallel, preserving order
pub fn classify_all(coords: &[Coordinate]) -> Vec<Category> {
    coords.par_iter().map(classify).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds_are_inclusive() {
        assert_eq!(classify(&Coordinate::new(180.0, 90.0)), Category::Valid);
        assert_eq!(classify(&Coordinate::new(-180.0, -90.0)), Category::Valid);
        assert_eq!(classify(&Coordinate::new(180.0001, 0.0)), Category::Invalid);
        assert_eq!(classify(&Coordinate::new(0.0, -90.5)), Category::Invalid);
    }

    #[test]
    fn test_zero_sentinel() {
        assert_eq!(classify(&Coordinate::new(0.0, 0.0)), Category::Zero);
        assert_eq!(classify(&Coordinate::new(-0.0, 0.0)), Category::Zero);
        // Only one axis zero is an ordinary point
        assert_eq!(classify(&Coordinate::new(0.0, 12.0)), Category::Valid);
    }

    #[test]
    fn test_unparsed_and_nan_are_invalid() {
        assert_eq!(classify(&Coordinate::Unparsed), Category::Invalid);
        assert_eq!(classify(&Coordinate::new(f64::NAN, 0.0)), Category::Invalid);
        assert_eq!(classify(&Coordinate::new(0.0, f64::NAN)), Category::Invalid);
        assert_eq!(
            classify(&Coordinate::new(f64::INFINITY, 10.0)),
            Category::Invalid
        );
    }

    #[test]
    fn test_classify_all_keeps_order() {
        let coords = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::Unparsed,
            Coordinate::new(10.0, 20.0),
        ];
        assert_eq!(
            classify_all(&coords),
            vec![Category::Zero, Category::Invalid, Category::Valid]
        );
    }

    #[test]
    fn test_classify_is_deterministic() {
        let coord = Coordinate::new(45.123, -12.5);
        assert_eq!(classify(&coord), classify(&coord));
    }
}
