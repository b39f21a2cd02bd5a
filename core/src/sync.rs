//! Tidsvinduer og sammenstilling av to track i samme tidsrom.

use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::Serialize;

use crate::geodesy::axis_projection;
use crate::models::{EnrichedPoint, LegKind, Track};

/// Klipp tracket til [start, end] (inklusivt). Omvendte grenser byttes.
pub fn clip_window(track: &Track, start: DateTime<Utc>, end: DateTime<Utc>) -> Track {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    Track {
        id: track.id.clone(),
        twd: track.twd,
        window: Some((start, end)),
        points: track
            .points
            .iter()
            .filter(|p| p.timestamp >= start && p.timestamp <= end)
            .cloned()
            .collect(),
    }
}

/// `t` flyttet `minutes` minutter, eller `None` når resultatet faller utenfor chronos tidsrom.
pub fn shift_minutes(t: DateTime<Utc>, minutes: f64) -> Option<DateTime<Utc>> {
    let ms = (minutes * 60_000.0).round();
    if !ms.is_finite() {
        return None;
    }
    Duration::try_milliseconds(ms as i64).and_then(|d| t.checked_add_signed(d))
}

/// Klipp med minutter relativt til første punkt (som skjæreverktøyet i dashbordet).
/// Grenser utenfor tidsrommet klemmes til ytterkantene.
pub fn clip_minutes(track: &Track, start_min: f64, end_min: f64) -> Track {
    let Some(t0) = track.start() else {
        return track.clone();
    };
    let at = |m: f64| {
        shift_minutes(t0, m).unwrap_or(if m < 0.0 { DateTime::<Utc>::MIN_UTC } else { DateTime::<Utc>::MAX_UTC })
    };
    clip_window(track, at(start_min), at(end_min))
}

#[derive(Debug, Clone, PartialEq)]
pub enum Synchronized {
    Aligned {
        a: Track,
        b: Track,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    NoOverlap,
}

impl Synchronized {
    pub fn is_aligned(&self) -> bool {
        matches!(self, Synchronized::Aligned { .. })
    }
}

/// Felles tidsintervall for to track, eller `None` hvis de ikke overlapper.
pub fn overlap(a: &Track, b: &Track) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = a.start()?.max(b.start()?);
    let end = a.end()?.min(b.end()?);
    (start <= end).then_some((start, end))
}

/// Klipp begge track til det felles tidsrommet.
pub fn synchronize(a: &Track, b: &Track) -> Synchronized {
    let Some((start, end)) = overlap(a, b) else {
        debug!("[sync] {} og {} overlapper ikke", a.id, b.id);
        return Synchronized::NoOverlap;
    };
    let a = clip_window(a, start, end);
    let b = clip_window(b, start, end);
    if a.is_empty() || b.is_empty() {
        return Synchronized::NoOverlap;
    }
    Synchronized::Aligned { a, b, start, end }
}

fn nearest(points: &[EnrichedPoint], t: DateTime<Utc>) -> Option<&EnrichedPoint> {
    points
        .iter()
        .min_by_key(|p| (p.timestamp - t).num_milliseconds().abs())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeparationReport {
    pub kind: LegKind,
    /// Aksen avstanden er målt langs (grader fra nord)
    pub axis_deg: f64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Meter, positiv når b ligger foran a langs aksen
    pub at_start: f64,
    pub at_end: f64,
}

impl SeparationReport {
    /// Hvor mye b har tatt inn (positiv) eller tapt i løpet av vinduet.
    pub fn gain(&self) -> f64 {
        self.at_end - self.at_start
    }
}

/// Akse for sammenligning: stigen (TWD + 90) på kryss, vindaksen med vinden ellers.
pub fn separation_axis(twd: f64, kind: LegKind) -> f64 {
    match kind {
        LegKind::Upwind => twd + 90.0,
        LegKind::Downwind | LegKind::Reach | LegKind::Offwind => twd + 180.0,
    }
}

/// Avstand mellom to båter ved start og slutt av det felles tidsvinduet.
/// `None` hvis trackene ikke overlapper.
pub fn axial_separation(a: &Track, b: &Track, twd: f64, kind: LegKind) -> Option<SeparationReport> {
    let (start, end) = overlap(a, b)?;
    let axis = separation_axis(twd, kind);

    let measure = |t: DateTime<Utc>| -> Option<f64> {
        let pa = nearest(&a.points, t)?;
        let pb = nearest(&b.points, t)?;
        Some(axis_projection(pa.pos(), pb.pos(), axis))
    };

    Some(SeparationReport {
        kind,
        axis_deg: crate::circular::normalize_deg(axis),
        start,
        end,
        at_start: measure(start)?,
        at_end: measure(end)?,
    })
}
