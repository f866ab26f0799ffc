use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::response::Json;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Instant;

use crate::distance::{compute, DistanceResult, GeographicLocation};
use crate::error::ParamError;
use crate::units::Unit;

// ─── GET /distances ──────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceQuery {
    pub latitude_start: Option<String>,
    pub longitude_start: Option<String>,
    pub latitude_end: Option<String>,
    pub longitude_end: Option<String>,
    pub unit: Option<String>,
}

/// Validated inputs for one distance computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceRequest {
    pub start: GeographicLocation,
    pub end: GeographicLocation,
    pub unit: Unit,
}

impl TryFrom<DistanceQuery> for DistanceRequest {
    type Error = ParamError;

    fn try_from(q: DistanceQuery) -> Result<Self, Self::Error> {
        let start = GeographicLocation::new(
            require_decimal("latitudeStart", q.latitude_start.as_deref())?,
            require_decimal("longitudeStart", q.longitude_start.as_deref())?,
        );
        let end = GeographicLocation::new(
            require_decimal("latitudeEnd", q.latitude_end.as_deref())?,
            require_decimal("longitudeEnd", q.longitude_end.as_deref())?,
        );
        let unit = parse_unit(q.unit.as_deref())?;
        Ok(Self { start, end, unit })
    }
}

pub async fn distances(
    query: Result<Query<DistanceQuery>, QueryRejection>,
) -> Result<Json<DistanceResult>, ParamError> {
    let started = Instant::now();

    let Query(params) = query.map_err(|e| ParamError::MalformedQuery(e.body_text()))?;
    let req = DistanceRequest::try_from(params)?;
    let result = compute(req.start, req.end, req.unit);

    tracing::info!(
        lat_start = %req.start.latitude,
        lon_start = %req.start.longitude,
        lat_end = %req.end.latitude,
        lon_end = %req.end.longitude,
        unit = %result.unit,
        distance = %result.distance,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "GET /distances",
    );

    Ok(Json(result))
}

// ─── Helpers ─────────────────────────────────────────────────────

/// Parses a decimal in plain (`-23.5505`) or scientific (`1.5e2`) notation.
///
/// Values that do not fit a `Decimal` (beyond about ±7.9e28, or with more
/// precision than it holds) are reduced modulo 360 degrees through `f64`.
/// Every angle the distance depends on is 360-periodic, so the result is the
/// same as for the unreduced value. Literals that overflow `f64` are refused.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if !is_decimal_literal(raw) {
        return None;
    }
    if let Ok(d) = Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)) {
        return Some(d);
    }
    let degrees: f64 = raw.parse().ok()?;
    if !degrees.is_finite() {
        return None;
    }
    // Within (-360, 360) from_f64 only fails below Decimal's smallest step.
    Some(Decimal::from_f64(degrees % 360.0).unwrap_or(Decimal::ZERO))
}

/// `[+-]digits[.digits][(e|E)[+-]digits]`, with digits allowed on either
/// side of the point but not both missing. No separators, no `inf`/`NaN`.
fn is_decimal_literal(s: &str) -> bool {
    let signs: &[char] = &['+', '-'];
    let digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());

    let s = s.strip_prefix(signs).unwrap_or(s);
    let (mantissa, exponent) = match s.find(&['e', 'E'][..]) {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if (int.is_empty() && frac.is_empty()) || !digits(int) || !digits(frac) {
        return false;
    }
    match exponent {
        None => true,
        Some(e) => {
            let e = e.strip_prefix(signs).unwrap_or(e);
            !e.is_empty() && digits(e)
        }
    }
}

fn require_decimal(name: &'static str, raw: Option<&str>) -> Result<Decimal, ParamError> {
    let raw = match raw {
        Some(r) if !r.trim().is_empty() => r,
        _ => return Err(ParamError::Missing(name)),
    };
    parse_decimal(raw).ok_or_else(|| ParamError::InvalidDecimal {
        name,
        value: raw.to_string(),
    })
}

/// Absent or blank means the default unit.
fn parse_unit(raw: Option<&str>) -> Result<Unit, ParamError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Unit::default()),
        Some(token) => Ok(token.parse::<Unit>()?),
    }
}
