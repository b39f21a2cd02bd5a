use crate::circular::{normalize_deg, to_signed_deg};
use crate::geodesy::{distance_bearing, GeoPos};
use crate::kinematics::centered_rolling_mean;
use crate::models::{EnrichedPoint, TrackPoint};

/// Signert TWA i [-180, 180): ((cog − twd + 180) mod 360) − 180.
/// Positiv og negativ side tilsvarer hver sin baug.
#[inline]
pub fn twa_signed(cog_deg: f64, twd_deg: f64) -> f64 {
    to_signed_deg(cog_deg - twd_deg)
}

/// VMG (knop) = sog · cos(twa). Positiv mot vinden, negativ med vinden.
#[inline]
pub fn vmg(sog_kn: f64, twa_deg: f64) -> f64 {
    sog_kn * twa_deg.to_radians().cos()
}

/// Berik punktene med TWA/VMG for gitt TWD og glattet SOG.
/// Ren funksjon: samme input gir samme output.
pub fn enrich(points: &[TrackPoint], twd_deg: f64, smoothing_window: usize) -> Vec<EnrichedPoint> {
    let sogs: Vec<f64> = points.iter().map(|p| p.sog).collect();
    let smoothed = centered_rolling_mean(&sogs, smoothing_window);

    points
        .iter()
        .zip(smoothed)
        .map(|(p, sog_smoothed)| {
            let twa = twa_signed(p.cog, twd_deg);
            EnrichedPoint {
                timestamp: p.timestamp,
                lat: p.lat,
                lon: p.lon,
                cog: p.cog,
                sog: p.sog,
                dist: p.dist,
                source: p.source.clone(),
                twa,
                twa_abs: twa.abs(),
                vmg: vmg(p.sog, twa),
                sog_smoothed,
            }
        })
        .collect()
}

/// Grovt TWD-estimat fra første og siste posisjon: kursen start→mål snudd 180°.
/// Brukes når metadata ikke har TWD (antar at tracket går mot vinden).
pub fn estimate_twd(first: GeoPos, last: GeoPos) -> f64 {
    let (_, cog, _) = distance_bearing(first, last);
    normalize_deg(cog + 180.0)
}
