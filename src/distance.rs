//! Great-circle distance calculator based on the Haversine formula.
//!
//! Coordinates and results are fixed-point decimals; only the trigonometric
//! part runs in `f64`. The Earth is treated as a sphere of radius 6378 km.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::units::Unit;

/// Sphere radius used for every distance, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6378.0;

/// A point given by latitude and longitude in degrees. No range is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeographicLocation {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GeographicLocation {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self { latitude, longitude }
    }
}

/// A distance rounded up to a whole number of `unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceResult {
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub distance: Decimal,
    pub unit: Unit,
}

// Every Decimal fits in an f64; the Option is only the trait signature.
fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// `end - start` in radians. Falls back to `f64` subtraction if the decimal
/// difference overflows.
fn delta_radians(start: Decimal, end: Decimal) -> f64 {
    end.checked_sub(start)
        .map(to_f64)
        .unwrap_or_else(|| to_f64(end) - to_f64(start))
        .to_radians()
}

/// Unrounded great-circle distance in kilometers.
///
/// Always finite and within `0..=PI * EARTH_RADIUS_KM`: every angle is a
/// finite `f64` (decimals stay below ~7.9e28), so `a` is finite and clamped
/// to [0, 1] and `c` lies in [0, PI].
pub fn haversine_km(start: &GeographicLocation, end: &GeographicLocation) -> f64 {
    let d_lat = delta_radians(start.latitude, end.latitude);
    let d_lon = delta_radians(start.longitude, end.longitude);
    let lat_start = to_f64(start.latitude).to_radians();
    let lat_end = to_f64(end.latitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat_start.cos() * lat_end.cos() * (d_lon / 2.0).sin().powi(2);
    // Always in [0, 1] analytically; rounding can push it just outside.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance from `start` to `end` in `unit`, rounded up to an integer.
///
/// The kilometer value is converted first and the converted value is rounded
/// toward positive infinity, so 0.01 becomes 1.
pub fn compute(start: GeographicLocation, end: GeographicLocation, unit: Unit) -> DistanceResult {
    let km = haversine_km(&start, &end);
    debug_assert!((0.0..=PI * EARTH_RADIUS_KM).contains(&km), "distance out of range: {}", km);
    // A finite f64 of at most ~20038 always has a Decimal representation.
    let km = Decimal::from_f64(km).unwrap_or_default();
    let distance = unit
        .convert(km)
        .round_dp_with_strategy(0, RoundingStrategy::ToPositiveInfinity);

    tracing::trace!(%unit, %distance, "computed distance");

    DistanceResult { distance, unit }
}

/// [`compute`] in kilometers.
pub fn compute_default(start: GeographicLocation, end: GeographicLocation) -> DistanceResult {
    compute(start, end, Unit::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::str::FromStr;

    fn loc(lat: &str, lon: &str) -> GeographicLocation {
        GeographicLocation::new(Decimal::from_str(lat).unwrap(), Decimal::from_str(lon).unwrap())
    }

    fn sao_paulo() -> GeographicLocation {
        loc("-23.5505", "-46.6333")
    }

    fn rio() -> GeographicLocation {
        loc("-22.9068", "-43.1729")
    }

    #[test]
    fn test_identical_points_are_zero_in_every_unit() {
        for unit in Unit::ALL {
            let r = compute(sao_paulo(), sao_paulo(), unit);
            assert_eq!(r.distance, Decimal::ZERO);
            assert_eq!(r.unit, unit);
        }
    }

    #[test]
    fn test_symmetry() {
        let points = [sao_paulo(), rio(), loc("90", "0"), loc("-33.8688", "151.2093"), loc("0", "-180")];
        for a in points {
            for b in points {
                for unit in Unit::ALL {
                    assert_eq!(compute(a, b, unit), compute(b, a, unit));
                }
            }
        }
    }

    #[test]
    fn test_sao_paulo_to_rio() {
        let km = compute(sao_paulo(), rio(), Unit::KM).distance;
        assert!(km >= Decimal::from(357) && km <= Decimal::from(365), "got {}", km);

        let m = compute(sao_paulo(), rio(), Unit::M).distance;
        assert!(m >= Decimal::from(357_000) && m <= Decimal::from(365_000), "got {}", m);

        let mi = compute(sao_paulo(), rio(), Unit::MI).distance;
        assert!(mi >= Decimal::from(220) && mi <= Decimal::from(225), "got {}", mi);
    }

    #[test]
    fn test_converts_before_rounding() {
        let km = Decimal::from_f64(haversine_km(&sao_paulo(), &rio())).unwrap();
        let ceil = |d: Decimal| d.round_dp_with_strategy(0, RoundingStrategy::ToPositiveInfinity);

        assert_eq!(compute(sao_paulo(), rio(), Unit::MI).distance, ceil(km * Decimal::new(62137, 5)));
        assert_eq!(compute(sao_paulo(), rio(), Unit::M).distance, ceil(km * Decimal::from(1000)));
        assert_eq!(compute(sao_paulo(), rio(), Unit::KM).distance, Decimal::from(362));
        assert_eq!(compute(sao_paulo(), rio(), Unit::MI).distance, Decimal::from(225));
        assert_eq!(compute(sao_paulo(), rio(), Unit::M).distance, Decimal::from(361_146));
    }

    #[test]
    fn test_rounds_up_tiny_distances() {
        // 0.0001 degrees of latitude is roughly 11 meters.
        let a = loc("0", "0");
        let b = loc("0.0001", "0");
        assert_eq!(compute(a, b, Unit::KM).distance, Decimal::ONE);
        assert_eq!(compute(a, b, Unit::MI).distance, Decimal::ONE);
        assert_eq!(compute(a, b, Unit::M).distance, Decimal::from(12));
    }

    #[test]
    fn test_result_has_no_fraction() {
        let r = compute(sao_paulo(), rio(), Unit::MI);
        assert_eq!(r.distance.scale(), 0);
        assert_eq!(r.distance, r.distance.trunc());
    }

    #[test]
    fn test_antimeridian_is_same_meridian() {
        let km = compute(loc("0", "-180"), loc("0", "180"), Unit::KM).distance;
        assert!(km <= Decimal::from(1), "got {}", km);
    }

    #[test]
    fn test_pole_to_pole() {
        let raw = haversine_km(&loc("90", "0"), &loc("-90", "0"));
        assert_relative_eq!(raw, PI * EARTH_RADIUS_KM, max_relative = 1e-9);

        let km = compute(loc("90", "0"), loc("-90", "0"), Unit::KM).distance;
        assert_eq!(km, Decimal::from(20038));
    }

    #[test]
    fn test_along_equator() {
        let raw = haversine_km(&loc("0", "-78.5"), &loc("0", "-47.9"));
        assert_relative_eq!(raw, 30.6_f64.to_radians() * EARTH_RADIUS_KM, max_relative = 1e-9);
        let km = compute_default(loc("0", "-78.5"), loc("0", "-47.9"));
        assert_eq!(km.unit, Unit::KM);
        assert!(km.distance >= Decimal::from(3300) && km.distance <= Decimal::from(3450));
    }

    #[test]
    fn test_out_of_range_coordinates_still_produce_a_distance() {
        let r = compute(loc("135", "400"), loc("-200", "-725.5"), Unit::KM);
        assert!(r.distance >= Decimal::ZERO);
        assert!(r.distance <= Decimal::from(20038));
    }

    #[test]
    fn test_extreme_decimals_take_the_f64_difference() {
        // MAX - MIN overflows Decimal, so the deltas come from f64 subtraction.
        let far = [
            (GeographicLocation::new(Decimal::MAX, Decimal::ZERO), GeographicLocation::new(Decimal::MIN, Decimal::ZERO)),
            (GeographicLocation::new(Decimal::ZERO, Decimal::MIN), GeographicLocation::new(Decimal::ZERO, Decimal::MAX)),
            (GeographicLocation::new(Decimal::MAX, Decimal::MAX), GeographicLocation::new(Decimal::MIN, Decimal::MIN)),
        ];
        for (a, b) in far {
            assert!(a.latitude.checked_sub(b.latitude).is_none() || a.longitude.checked_sub(b.longitude).is_none());
            let raw = haversine_km(&a, &b);
            assert!(raw.is_finite() && (0.0..=PI * EARTH_RADIUS_KM).contains(&raw), "got {}", raw);
            for unit in Unit::ALL {
                let r = compute(a, b, unit);
                assert_eq!(r.distance.scale(), 0);
                assert!(r.distance >= Decimal::ZERO);
                assert!(r.distance <= unit.convert(Decimal::from(20038)).ceil());
            }
        }
    }

    #[test]
    fn test_serializes_distance_as_number() {
        let r = compute(sao_paulo(), sao_paulo(), Unit::M);
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"distance":0,"unit":"M"}"#);
    }
}
