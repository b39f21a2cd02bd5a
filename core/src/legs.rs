use log::debug;

use crate::circular::{circular_mean, circular_mean_signed, circular_std};
use crate::models::{EnrichedPoint, Leg, LegKind, Maneuver};
use crate::types::{LegScheme, LegThresholds};

/// Klassifiser et strekk ut fra sirkulært snitt av TWA.
pub fn classify(twa_mean_deg: f64, th: &LegThresholds) -> LegKind {
    let abs_twa = twa_mean_deg.abs();
    if abs_twa < th.upwind_max_deg {
        return LegKind::Upwind;
    }
    match th.scheme {
        LegScheme::Binary => LegKind::Offwind,
        LegScheme::ThreeWay if abs_twa > th.downwind_min_deg => LegKind::Downwind,
        LegScheme::ThreeWay => LegKind::Reach,
    }
}

/// Grenser = {0} ∪ manøverindekser ∪ {siste}, sortert og uten duplikater.
pub fn leg_boundaries(len: usize, maneuvers: &[Maneuver]) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let mut b: Vec<usize> = std::iter::once(0)
        .chain(maneuvers.iter().map(|m| m.index).filter(|&i| i < len))
        .chain(std::iter::once(len - 1))
        .collect();
    b.sort_unstable();
    b.dedup();
    b
}

/// Del tracket i strekk mellom manøvrene. Hvert strekk dekker `points[ini..=fin]`.
pub fn segment_legs(points: &[EnrichedPoint], maneuvers: &[Maneuver], track: &str, th: &LegThresholds) -> Vec<Leg> {
    let bounds = leg_boundaries(points.len(), maneuvers);
    let legs: Vec<Leg> = bounds
        .windows(2)
        .filter_map(|w| build_leg(points, w[0], w[1], track, th))
        .collect();
    debug!("[legs] {track}: {} strekk fra {} grenser", legs.len(), bounds.len());
    legs
}

/// Bygg ett strekk. Tomt strekk gir `None`.
pub fn build_leg(points: &[EnrichedPoint], ini: usize, fin: usize, track: &str, th: &LegThresholds) -> Option<Leg> {
    if fin < ini || fin >= points.len() {
        return None;
    }
    let slice = &points[ini..=fin];
    let n = slice.len();
    if n == 0 {
        return None;
    }

    let cogs: Vec<f64> = slice.iter().map(|p| p.cog).collect();
    let twas: Vec<f64> = slice.iter().map(|p| p.twa).collect();
    let sog_mean = slice.iter().map(|p| p.sog).sum::<f64>() / n as f64;
    let vmg_mean = slice.iter().map(|p| p.vmg).sum::<f64>() / n as f64;
    // dist er avstand fra forrige punkt; første punkt i strekket teller ikke
    let distance_m = slice.iter().skip(1).map(|p| p.dist).sum::<f64>();
    let twa_mean = circular_mean_signed(&twas)?;

    let start = slice[0].timestamp;
    let end = slice[n - 1].timestamp;

    Some(Leg {
        track: track.to_string(),
        start_index: ini,
        end_index: fin,
        start,
        end,
        duration_s: (end - start).num_milliseconds() as f64 / 1000.0,
        points: n,
        sog_mean,
        vmg_mean,
        distance_m,
        cog_mean: circular_mean(&cogs)?,
        cog_std: circular_std(&cogs)?,
        twa_mean,
        kind: classify(twa_mean, th),
    })
}
