#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use sailgraph_core::geodesy::{project, GeoPos, METERS_PER_NM};
use sailgraph_core::kinematics::derive_track;
use sailgraph_core::models::{EnrichedPoint, RawPoint, Track, TrackPoint};
use sailgraph_core::wind::enrich;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn origin() -> GeoPos {
    GeoPos::new(42.24, -8.78).unwrap()
}

/// Rå posisjoner fra en liste kurser, ett sekund mellom hvert punkt.
/// Gir `headings.len() + 1` punkter (første er startpunktet).
pub fn raw_from_headings(start: GeoPos, t_start: DateTime<Utc>, headings: &[f64], speed_kn: f64) -> Vec<RawPoint> {
    let step_m = speed_kn * METERS_PER_NM / 3600.0;
    let mut pos = start;
    let mut out = vec![RawPoint::new(t_start, pos)];
    for (i, h) in headings.iter().enumerate() {
        pos = project(pos, *h, step_m);
        out.push(RawPoint::new(t_start + Duration::seconds(i as i64 + 1), pos));
    }
    out
}

/// Punkter med gitte COG direkte (uten geometri), ett per sekund.
pub fn points_from_cogs(cogs: &[f64], sog: f64) -> Vec<TrackPoint> {
    cogs.iter()
        .enumerate()
        .map(|(i, c)| TrackPoint {
            timestamp: t0() + Duration::seconds(i as i64),
            lat: 42.0 + i as f64 * 1e-5,
            lon: -8.8,
            cog: *c,
            sog,
            dist: sog * METERS_PER_NM / 3600.0,
            source: "test".to_string(),
        })
        .collect()
}

pub fn enriched_from_cogs(cogs: &[f64], sog: f64, twd: f64) -> Vec<EnrichedPoint> {
    enrich(&points_from_cogs(cogs, sog), twd, 5)
}

/// Kryss: `n` sekunder på 45°, så `n` sekunder på 315°.
pub fn tack_headings(n: usize) -> Vec<f64> {
    let mut h = vec![45.0; n];
    h.extend(std::iter::repeat(315.0).take(n));
    h
}

pub fn track_from_raw(id: &str, raw: &[RawPoint], twd: f64) -> Track {
    let base = derive_track(raw, id).unwrap();
    Track {
        id: id.to_string(),
        twd,
        window: None,
        points: enrich(&base, twd, 5),
    }
}

/// Rett linje med fast kurs, `secs` sekunder.
pub fn straight_track(id: &str, start: GeoPos, t_start: DateTime<Utc>, heading: f64, speed_kn: f64, secs: usize, twd: f64) -> Track {
    let raw = raw_from_headings(start, t_start, &vec![heading; secs], speed_kn);
    track_from_raw(id, &raw, twd)
}
