//! Manøverdeteksjon (slag/jibb) med glidende vinduer og sirkulær statistikk.
//!
//! For hvert punkt `i` med minst `window` punkter på begge sider sammenlignes
//! kursen i `i` med det sirkulære snittet av vinduet før og etter. Kandidater over
//! terskelen filtreres så på minste tidsavstand.

use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::Serialize;

use crate::circular::{circular_diff, circular_mean};
use crate::models::{EnrichedPoint, Maneuver};
use crate::types::{DebouncePolicy, ManeuverParams};

/// Finn manøvrer i ett track. Tom liste hvis tracket er for kort for vinduet.
pub fn detect_maneuvers(points: &[EnrichedPoint], track: &str, params: &ManeuverParams) -> Vec<Maneuver> {
    let candidates = find_candidates(points, track, params.window, params.threshold_deg);
    let kept = debounce(candidates, params.min_separation_s, params.policy);
    debug!(
        "[maneuvers] {track}: {} manøvrer (terskel={}°, vindu={}, min_sep={}s)",
        kept.len(),
        params.threshold_deg,
        params.window,
        params.min_separation_s
    );
    kept
}

/// Alle punkter der kursavviket mot vinduene før/etter overstiger terskelen.
pub fn find_candidates(points: &[EnrichedPoint], track: &str, window: usize, threshold_deg: f64) -> Vec<Maneuver> {
    let n = points.len();
    if window == 0 || n < 2 * window + 1 {
        return Vec::new();
    }
    let cogs: Vec<f64> = points.iter().map(|p| p.cog).collect();

    let mut out = Vec::new();
    for i in window..(n - window) {
        let (Some(prev_mean), Some(post_mean)) = (
            circular_mean(&cogs[i - window..i]),
            circular_mean(&cogs[i + 1..i + 1 + window]),
        ) else {
            continue;
        };

        let intensity = circular_diff(cogs[i], prev_mean)
            .abs()
            .max(circular_diff(cogs[i], post_mean).abs());

        if intensity > threshold_deg {
            out.push(Maneuver {
                track: track.to_string(),
                timestamp: points[i].timestamp,
                index: i,
                cog: cogs[i],
                cog_before: prev_mean,
                cog_after: post_mean,
                delta_cog: circular_diff(post_mean, prev_mean),
                intensity,
            });
        }
    }
    out
}

/// Fjern kandidater nærmere enn `min_separation_s` i tid.
pub fn debounce(mut candidates: Vec<Maneuver>, min_separation_s: f64, policy: DebouncePolicy) -> Vec<Maneuver> {
    candidates.sort_by_key(|m| (m.timestamp, m.index));
    // negativ eller NaN betyr ingen avstand; for store verdier slår alt sammen
    let min_sep = Duration::try_milliseconds((min_separation_s.max(0.0) * 1000.0).round() as i64)
        .unwrap_or_else(Duration::max_value);

    let mut kept: Vec<Maneuver> = Vec::with_capacity(candidates.len());
    match policy {
        DebouncePolicy::FirstWins => {
            for c in candidates {
                match kept.last() {
                    Some(last) if c.timestamp - last.timestamp < min_sep => {}
                    _ => kept.push(c),
                }
            }
        }
        DebouncePolicy::BestOfCluster => {
            // klyngen forankres i første kandidat; beste intensitet vinner
            let mut anchor: Option<DateTime<Utc>> = None;
            for c in candidates {
                match anchor {
                    Some(a) if c.timestamp - a < min_sep => {
                        if let Some(best) = kept.last_mut() {
                            if c.intensity > best.intensity {
                                *best = c;
                            }
                        }
                    }
                    _ => {
                        anchor = Some(c.timestamp);
                        kept.push(c);
                    }
                }
            }
        }
    }
    kept
}

/// Snittfart i et tidsvindu rundt én manøver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedSample {
    pub offset_s: i64,
    pub label: String,
    /// `None` når vinduet ikke inneholder punkter
    pub sog_mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManeuverSpeedProfile {
    pub track: String,
    pub timestamp: DateTime<Utc>,
    pub cog_before: f64,
    pub cog_after: f64,
    pub delta_cog: f64,
    pub samples: Vec<SpeedSample>,
}

fn offset_label(offset_s: i64) -> String {
    if offset_s == 0 {
        "0s".to_string()
    } else {
        format!("{offset_s:+}s")
    }
}

/// Fart før og etter hver manøver.
///
/// Negativ forskyvning d gir vinduet [t+d, t], positiv [t, t+d], og 0 gir [t−0.5s, t+0.5s].
/// Forskyvningene sorteres og dupliseres bort.
pub fn speed_profile(points: &[EnrichedPoint], maneuvers: &[Maneuver], offsets_s: &[i64]) -> Vec<ManeuverSpeedProfile> {
    let mut offsets = offsets_s.to_vec();
    offsets.sort_unstable();
    offsets.dedup();

    maneuvers
        .iter()
        .map(|m| {
            let t = m.timestamp;
            // kanter utenfor tidsrommet klemmes
            let shifted = |d: i64| {
                Duration::try_seconds(d)
                    .and_then(|dd| t.checked_add_signed(dd))
                    .unwrap_or(if d < 0 { DateTime::<Utc>::MIN_UTC } else { DateTime::<Utc>::MAX_UTC })
            };
            let samples = offsets
                .iter()
                .map(|&d| {
                    let (lo, hi) = match d {
                        0 => (t - Duration::milliseconds(500), t + Duration::milliseconds(500)),
                        d if d < 0 => (shifted(d), t),
                        d => (t, shifted(d)),
                    };
                    let (sum, n) = points
                        .iter()
                        .filter(|p| p.timestamp >= lo && p.timestamp <= hi)
                        .fold((0.0, 0usize), |(s, n), p| (s + p.sog, n + 1));
                    SpeedSample {
                        offset_s: d,
                        label: offset_label(d),
                        sog_mean: if n == 0 { None } else { Some(sum / n as f64) },
                    }
                })
                .collect();

            ManeuverSpeedProfile {
                track: m.track.clone(),
                timestamp: t,
                cog_before: m.cog_before,
                cog_after: m.cog_after,
                delta_cog: m.delta_cog,
                samples,
            }
        })
        .collect()
}
