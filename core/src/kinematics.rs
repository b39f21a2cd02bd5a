//! Kinematikk: avstand, kurs (COG) og fart (SOG) fra en kronologisk posisjonsliste.

use log::{debug, warn};

use crate::circular::normalize_deg;
use crate::error::{EngineError, Result};
use crate::geodesy::{check_coordinate, distance_bearing, METERS_PER_NM};
use crate::models::{RawPoint, TrackPoint};

/// Standard vindu for glattet SOG (punkter, sentrert).
pub const SOG_SMOOTH_WIN: usize = 5;

/// Avled TrackPoints fra rå posisjoner.
///
/// Første punkt brukes kun som referanse og sendes ikke ut. Punkter med nøyaktig samme
/// posisjon som forrige beholdte punkt hoppes over (uten å flytte referansen).
/// Tidssteg ≤ 0 gir `sog = 0`. Tidsstempler som går bakover avvises.
pub fn derive_track(raw: &[RawPoint], source: &str) -> Result<Vec<TrackPoint>> {
    if raw.len() < 2 {
        return Ok(Vec::new());
    }
    for (i, w) in raw.windows(2).enumerate() {
        if w[1].timestamp < w[0].timestamp {
            return Err(EngineError::NonMonotonicTimestamp { index: i + 1 });
        }
    }

    let mut out = Vec::with_capacity(raw.len() - 1);
    let mut prev = raw[0];
    let mut dropped = 0usize;

    for cur in &raw[1..] {
        if cur.pos == prev.pos {
            dropped += 1;
            continue;
        }

        let (dist, cog, _) = distance_bearing(prev.pos, cur.pos);
        let dt_s = (cur.timestamp - prev.timestamp).num_milliseconds() as f64 / 1000.0;
        let sog = speed_knots(dist, dt_s);
        if dt_s <= 0.0 {
            debug!("[kinematics] dt={dt_s}s ved {} → sog=0", cur.timestamp);
        }

        out.push(TrackPoint {
            timestamp: cur.timestamp,
            lat: cur.pos.lat(),
            lon: cur.pos.lon(),
            cog,
            sog,
            dist,
            source: source.to_string(),
        });
        prev = *cur;
    }

    if dropped > 0 {
        debug!("[kinematics] {source}: {dropped} duplikate posisjoner fjernet");
    }
    Ok(out)
}

/// Fart i knop fra avstand (m) og tid (s). Ikke-positiv tid gir 0.
#[inline]
pub fn speed_knots(dist_m: f64, dt_s: f64) -> f64 {
    if dt_s <= 0.0 {
        return 0.0;
    }
    let v = (dist_m / METERS_PER_NM) / (dt_s / 3600.0);
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Valider ferdig avledede punkter (CSV-stien): koordinater, rekkefølge og endelige tall.
/// COG normaliseres til [0, 360).
pub fn validate_derived(mut points: Vec<TrackPoint>) -> Result<Vec<TrackPoint>> {
    for (i, p) in points.iter_mut().enumerate() {
        check_coordinate(p.lat, p.lon)?;
        for (field, v) in [("COG", p.cog), ("SOG", p.sog), ("Dist", p.dist)] {
            if !v.is_finite() {
                return Err(EngineError::InvalidValue {
                    row: i,
                    field: field.to_string(),
                    value: v.to_string(),
                });
            }
        }
        p.cog = normalize_deg(p.cog);
    }
    for (i, w) in points.windows(2).enumerate() {
        if w[1].timestamp < w[0].timestamp {
            return Err(EngineError::NonMonotonicTimestamp { index: i + 1 });
        }
    }
    if points.iter().any(|p| p.sog < 0.0) {
        warn!("[kinematics] negative SOG i ferdig avledet track");
    }
    Ok(points)
}

/// Sentrert glidende gjennomsnitt. Partall-vindu rundes opp til oddetall;
/// ved kantene brukes færre punkter (min_periods = 1).
pub fn centered_rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 || values.is_empty() {
        return values.to_vec();
    }

    // sørg for at vinduet er oddetall, slik at midtpunktet er veldefinert
    let w = if window % 2 == 0 { window + 1 } else { window };
    let k = w / 2;
    let n = values.len();

    // prefikssum gir O(n)
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    for v in values {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + v);
    }

    (0..n)
        .map(|i| {
            let a = i.saturating_sub(k);
            let b = (i + k + 1).min(n);
            (prefix[b] - prefix[a]) / (b - a) as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_mean_shrinks_at_edges() {
        let out = centered_rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 5);
        assert!((out[0] - 2.0).abs() < 1e-12); // (1+2+3)/3
        assert!((out[2] - 3.0).abs() < 1e-12);
        assert!((out[4] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn speed_is_zero_for_non_positive_dt() {
        assert_eq!(speed_knots(100.0, 0.0), 0.0);
        assert_eq!(speed_knots(100.0, -1.0), 0.0);
        assert!((speed_knots(1852.0, 3600.0) - 1.0).abs() < 1e-12);
    }
}
