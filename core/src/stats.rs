//! Aggregerte og sammenlignende nøkkeltall per track.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::circular::{circular_mean, circular_mean_signed, circular_min_max, circular_std, normalize_deg};
use crate::geodesy::METERS_PER_NM;
use crate::models::{EnrichedPoint, Track};
use crate::types::TwaBand;

/// En verdi sammen med TWA i punktet der den ble målt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueAtTwa {
    pub value: f64,
    pub twa: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub track: String,
    pub points: usize,
    pub duration_min: f64,
    pub distance_nm: f64,
    pub sog_mean: f64,
    pub sog_max: ValueAtTwa,
    pub sog_min: ValueAtTwa,
    pub twa_mean: f64,
    pub vmg_mean: f64,
    pub vmg_max: ValueAtTwa,
    pub vmg_min: ValueAtTwa,
    pub cog_mean: f64,
    pub cog_std: f64,
    pub cog_min: f64,
    pub cog_max: f64,
    pub cog_span: f64,
}

fn extreme_by<F>(points: &[EnrichedPoint], value: F, want_max: bool) -> Option<ValueAtTwa>
where
    F: Fn(&EnrichedPoint) -> f64,
{
    let mut best: Option<ValueAtTwa> = None;
    for p in points {
        let v = value(p);
        let better = match best {
            None => true,
            Some(b) if want_max => v > b.value,
            Some(b) => v < b.value,
        };
        if better {
            best = Some(ValueAtTwa { value: v, twa: p.twa });
        }
    }
    best
}

/// Nøkkeltall for ett track. `None` for tomt track.
pub fn summarize(track: &Track) -> Option<TrackSummary> {
    let pts = &track.points;
    let n = pts.len();
    if n == 0 {
        return None;
    }
    let cogs: Vec<f64> = pts.iter().map(|p| p.cog).collect();
    let twas: Vec<f64> = pts.iter().map(|p| p.twa).collect();
    let (cog_min, cog_max, cog_span) = circular_min_max(&cogs)?;

    let duration_min = match (track.start(), track.end()) {
        (Some(a), Some(b)) => (b - a).num_milliseconds() as f64 / 60_000.0,
        _ => 0.0,
    };

    Some(TrackSummary {
        track: track.id.clone(),
        points: n,
        duration_min,
        // første dist er steget fra et punkt utenfor vinduet
        distance_nm: pts.iter().skip(1).map(|p| p.dist).sum::<f64>() / METERS_PER_NM,
        sog_mean: pts.iter().map(|p| p.sog).sum::<f64>() / n as f64,
        sog_max: extreme_by(pts, |p| p.sog, true)?,
        sog_min: extreme_by(pts, |p| p.sog, false)?,
        twa_mean: circular_mean_signed(&twas)?,
        vmg_mean: pts.iter().map(|p| p.vmg).sum::<f64>() / n as f64,
        vmg_max: extreme_by(pts, |p| p.vmg, true)?,
        vmg_min: extreme_by(pts, |p| p.vmg, false)?,
        cog_mean: circular_mean(&cogs)?,
        cog_std: circular_std(&cogs)?,
        cog_min,
        cog_max,
        cog_span,
    })
}

/// COG-spredning (sirkulært standardavvik, grader).
pub fn cog_dispersion(points: &[EnrichedPoint]) -> Option<f64> {
    let cogs: Vec<f64> = points.iter().map(|p| p.cog).collect();
    circular_std(&cogs)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    /// Kryss: høyest VMG er best.
    Maximize,
    /// Lens: mest negativ VMG er best.
    Minimize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VmgWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub vmg_mean: f64,
    pub sog_mean: f64,
    pub twa_mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowExtremes {
    pub best: VmgWindow,
    pub worst: VmgWindow,
}

/// Beste og dårligste glidende VMG-vindu blant punktene med |TWA| i båndet.
///
/// Vinduet glir over delsekvensen som passerer filteret (ikke over tid).
/// Ved likhet beholdes det første vinduet. For få punkter gir `None`.
pub fn vmg_windows(points: &[EnrichedPoint], band: TwaBand, window: usize, goal: Goal) -> Option<WindowExtremes> {
    let sel: Vec<&EnrichedPoint> = points.iter().filter(|p| band.contains(p.twa_abs)).collect();
    if window == 0 || sel.len() < window {
        return None;
    }

    let make = |i: usize, vmg_sum: f64| {
        let chunk = &sel[i..i + window];
        let twas: Vec<f64> = chunk.iter().map(|p| p.twa).collect();
        VmgWindow {
            start: chunk[0].timestamp,
            end: chunk[window - 1].timestamp,
            vmg_mean: vmg_sum / window as f64,
            sog_mean: chunk.iter().map(|p| p.sog).sum::<f64>() / window as f64,
            twa_mean: circular_mean_signed(&twas).unwrap_or(0.0),
        }
    };

    // hver sum regnes på nytt; en løpende sum driver og flytter likhetene
    let window_sum = |i: usize| -> f64 { sel[i..i + window].iter().map(|p| p.vmg).sum() };
    let first = window_sum(0);
    let (mut hi, mut hi_i) = (first, 0usize);
    let (mut lo, mut lo_i) = (first, 0usize);
    for i in 1..=(sel.len() - window) {
        let sum = window_sum(i);
        if sum > hi {
            hi = sum;
            hi_i = i;
        }
        if sum < lo {
            lo = sum;
            lo_i = i;
        }
    }

    let (best, worst) = match goal {
        Goal::Maximize => ((hi_i, hi), (lo_i, lo)),
        Goal::Minimize => ((lo_i, lo), (hi_i, hi)),
    };
    Some(WindowExtremes {
        best: make(best.0, best.1),
        worst: make(worst.0, worst.1),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    /// Vinkler; normaliseres til [0, 360) før inndeling.
    Circular,
    /// Vanlige tall (f.eks. signert TWA eller fart).
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectionMode {
    /// Nedre kant av sektoren
    pub sector: f64,
    pub count: usize,
    pub pct: f64,
}

/// De `top_n` hyppigste sektorene med bredde `sector_width`. Likhet avgjøres av laveste sektor.
pub fn direction_modes(values: &[f64], sector_width: f64, top_n: usize, kind: ModeKind) -> Vec<DirectionMode> {
    if sector_width <= 0.0 || !sector_width.is_finite() {
        return Vec::new();
    }
    let mut bins: BTreeMap<i64, usize> = BTreeMap::new();
    let mut total = 0usize;
    for &v in values.iter().filter(|v| v.is_finite()) {
        let v = match kind {
            ModeKind::Circular => normalize_deg(v),
            ModeKind::Linear => v,
        };
        *bins.entry((v / sector_width).floor() as i64).or_default() += 1;
        total += 1;
    }
    if total == 0 {
        return Vec::new();
    }

    // BTreeMap gir stigende sektor; stabil sortering bevarer den ved lik frekvens
    let mut modes: Vec<(i64, usize)> = bins.into_iter().collect();
    modes.sort_by(|a, b| b.1.cmp(&a.1));
    modes
        .into_iter()
        .take(top_n)
        .map(|(bin, count)| DirectionMode {
            sector: bin as f64 * sector_width,
            count,
            pct: count as f64 * 100.0 / total as f64,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceDeficit {
    pub track: String,
    pub distance_m: f64,
    /// Ekstra meter seilt i forhold til korteste track
    pub deficit_m: f64,
}

pub fn distance_deficits(tracks: &[Track]) -> Vec<DistanceDeficit> {
    let dists: Vec<(String, f64)> = tracks
        .iter()
        .map(|t| (t.id.clone(), t.points.iter().skip(1).map(|p| p.dist).sum::<f64>()))
        .collect();
    let Some(shortest) = dists.iter().map(|(_, d)| *d).reduce(f64::min) else {
        return Vec::new();
    };
    dists
        .into_iter()
        .map(|(track, distance_m)| DistanceDeficit {
            track,
            distance_m,
            deficit_m: distance_m - shortest,
        })
        .collect()
}
