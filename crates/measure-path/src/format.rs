//! Human-readable distance and area strings.
//!
//! The stock [`UnitFormatter`] picks a unit by magnitude, then prints one
//! decimal below 100 and a whole number at or above it:
//!
//! | system   | distance          | area                  |
//! |----------|-------------------|-----------------------|
//! | metric   | `m`, `km` > 1000 m | `m²`, `km²` > 10⁶ m² |
//! | imperial | `ft`, `mi` > 3000 ft | `ft²`, `ac` > 404.685642 m² |
//!
//! Hosts with other conventions implement [`LabelFormatter`].

use crate::config::UnitSystem;

/// Meters per international foot.
pub const METERS_PER_FOOT: f64 = 0.3048;

/// Meters per international mile.
pub const METERS_PER_MILE: f64 = 1609.344;

/// Square meters per square foot.
pub const SQUARE_METERS_PER_SQUARE_FOOT: f64 = 0.092_903_04;

/// Square meters per acre.
pub const SQUARE_METERS_PER_ACRE: f64 = 4046.856_42;

/// Above this many feet, imperial distances switch to miles.
const FEET_TO_MILES_THRESHOLD: f64 = 3000.0;

/// Above this many meters, metric distances switch to kilometers.
const METERS_TO_KILOMETERS_THRESHOLD: f64 = 1000.0;

/// Above this many square meters, imperial areas switch to acres.
const SQUARE_FEET_TO_ACRES_THRESHOLD: f64 = 404.685_642;

/// Above this many square meters, metric areas switch to km².
const SQUARE_METERS_TO_SQUARE_KILOMETERS_THRESHOLD: f64 = 1_000_000.0;

/// Converted magnitudes below this keep one decimal place.
const DECIMAL_PRECISION_LIMIT: f64 = 100.0;

/// Turns raw measurements into label text.
pub trait LabelFormatter {
    /// Format a distance given in meters.
    fn format_distance(&self, meters: f64, units: UnitSystem) -> String;

    /// Format an area given in square meters.
    fn format_area(&self, square_meters: f64, units: UnitSystem) -> String;
}

/// Default metric/imperial formatter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitFormatter;

impl LabelFormatter for UnitFormatter {
    fn format_distance(&self, meters: f64, units: UnitSystem) -> String {
        format_distance(meters, units)
    }

    fn format_area(&self, square_meters: f64, units: UnitSystem) -> String {
        format_area(square_meters, units)
    }
}

/// Format a distance in meters, e.g. `"50.0 m"` or `"150 km"`.
///
/// # Examples
///
/// ```
/// use measure_path::UnitSystem;
/// use measure_path::format::format_distance;
///
/// assert_eq!(format_distance(1200.0, UnitSystem::Metric), "1.2 km");
/// assert_eq!(format_distance(3.0, UnitSystem::Imperial), "9.8 ft");
/// ```
#[must_use]
pub fn format_distance(meters: f64, units: UnitSystem) -> String {
    let (value, unit) = if units.is_imperial() {
        let feet = meters / METERS_PER_FOOT;
        if feet > FEET_TO_MILES_THRESHOLD {
            (meters / METERS_PER_MILE, "mi")
        } else {
            (feet, "ft")
        }
    } else if meters > METERS_TO_KILOMETERS_THRESHOLD {
        (meters / 1000.0, "km")
    } else {
        (meters, "m")
    };
    with_unit(value, unit)
}

/// Format an area in square meters, e.g. `"50.0 m²"` or `"12 ac"`.
#[must_use]
pub fn format_area(square_meters: f64, units: UnitSystem) -> String {
    let (value, unit) = if units.is_imperial() {
        if square_meters > SQUARE_FEET_TO_ACRES_THRESHOLD {
            (square_meters / SQUARE_METERS_PER_ACRE, "ac")
        } else {
            (square_meters / SQUARE_METERS_PER_SQUARE_FOOT, "ft²")
        }
    } else if square_meters > SQUARE_METERS_TO_SQUARE_KILOMETERS_THRESHOLD {
        (square_meters / 1_000_000.0, "km²")
    } else {
        (square_meters, "m²")
    };
    with_unit(value, unit)
}

/// Apply the precision rule and append the unit.
///
/// Rounding works on the stored binary value, so `0.15` (just below the
/// half) prints as `0.1`. Exact halves round up in both branches (`0.25`
/// prints as `0.3`).
fn with_unit(value: f64, unit: &str) -> String {
    if value < DECIMAL_PRECISION_LIMIT {
        format!("{} {unit}", one_decimal(value))
    } else {
        format!("{:.0} {unit}", round_half_up(value))
    }
}

/// `value` with one decimal.
///
/// `{:.1}` rounds the exact value but breaks ties to even, so exact ties
/// are bumped up by hand.
fn one_decimal(value: f64) -> String {
    let scaled = value * 10.0;
    #[allow(clippy::float_cmp)]
    let exact_tie = scaled.fract() == 0.5 && value.mul_add(10.0, -scaled) == 0.0;
    if exact_tie {
        format!("{:.1}", round_half_up(scaled) / 10.0)
    } else {
        format!("{value:.1}")
    }
}

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
