//! Fra rå eller ferdig avledede punkter til fullstendig rapport per track og per økt.
//!
//! Hvert track behandles for seg: en valideringsfeil avviser bare det ene tracket, de
//! andre analyseres videre.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;

use crate::circular::{circular_diff, circular_mean_signed, normalize_deg};
use crate::error::Result;
use crate::kinematics::{derive_track, validate_derived};
use crate::legs::{classify, segment_legs};
use crate::maneuvers::{detect_maneuvers, speed_profile, ManeuverSpeedProfile};
use crate::marks::{regime_marks, turn_marks};
use crate::meta::RaceMeta;
use crate::models::{Leg, LegKind, Maneuver, Mark, RawPoint, Track, TrackPoint};
use crate::stats::{
    cog_dispersion, direction_modes, distance_deficits, summarize, vmg_windows, DirectionMode, DistanceDeficit, Goal,
    ModeKind, TrackSummary, WindowExtremes,
};
use crate::sync::{axial_separation, clip_window, synchronize, SeparationReport, Synchronized};
use crate::telemetry;
use crate::types::AnalysisCfg;
use crate::wind::{enrich, estimate_twd};

/// Punktene slik de kommer inn.
#[derive(Debug, Clone)]
pub enum TrackSource {
    /// Rå posisjoner; COG/SOG/avstand avledes.
    Positions(Vec<RawPoint>),
    /// Ferdig avledet (CSV); valideres og brukes som de er.
    Derived(Vec<TrackPoint>),
}

/// Ett track i en økt. `source` er `Err` når innlesingen allerede feilet.
#[derive(Debug)]
pub struct TrackInput {
    pub id: String,
    pub twd: Option<f64>,
    pub source: Result<TrackSource>,
}

/// Avled eller valider grunnpunktene.
pub fn base_points(id: &str, source: TrackSource) -> Result<Vec<TrackPoint>> {
    match source {
        TrackSource::Positions(raw) => derive_track(&raw, id),
        TrackSource::Derived(points) => validate_derived(points),
    }
}

/// Bygg et beriket track for gitt TWD.
pub fn build_track(id: &str, source: TrackSource, twd: f64, cfg: &AnalysisCfg) -> Result<Track> {
    let base = base_points(id, source)?;
    Ok(track_from_base(id, &base, twd, cfg))
}

fn track_from_base(id: &str, base: &[TrackPoint], twd: f64, cfg: &AnalysisCfg) -> Track {
    let twd = normalize_deg(twd);
    Track {
        id: id.to_string(),
        twd,
        window: None,
        points: enrich(base, twd, cfg.smoothing_window),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackReport {
    pub track: String,
    pub twd: f64,
    pub summary: Option<TrackSummary>,
    pub maneuvers: Vec<Maneuver>,
    pub speed_profile: Vec<ManeuverSpeedProfile>,
    pub legs: Vec<Leg>,
    pub upwind: Option<WindowExtremes>,
    pub downwind: Option<WindowExtremes>,
    pub cog_dispersion: Option<f64>,
    pub cog_modes: Vec<DirectionMode>,
    pub twa_modes: Vec<DirectionMode>,
    pub turn_marks: Vec<Mark>,
    pub regime_marks: Vec<Mark>,
}

/// Full analyse av ett track.
pub fn analyze_track(track: &Track, cfg: &AnalysisCfg) -> TrackReport {
    let pts = &track.points;
    let maneuvers = detect_maneuvers(pts, &track.id, &cfg.maneuvers);
    let legs = segment_legs(pts, &maneuvers, &track.id, &cfg.legs);
    telemetry::maneuvers_detected(maneuvers.len());
    telemetry::legs_built(legs.len());

    let cogs: Vec<f64> = pts.iter().map(|p| p.cog).collect();
    let twas: Vec<f64> = pts.iter().map(|p| p.twa).collect();
    let r = &cfg.ranking;
    let m = &cfg.modes;

    TrackReport {
        track: track.id.clone(),
        twd: track.twd,
        summary: summarize(track),
        speed_profile: speed_profile(pts, &maneuvers, &cfg.speed_offsets_s),
        upwind: vmg_windows(pts, r.upwind_band, r.window, Goal::Maximize),
        downwind: vmg_windows(pts, r.downwind_band, r.window, Goal::Minimize),
        cog_dispersion: cog_dispersion(pts),
        cog_modes: direction_modes(&cogs, m.sector_width_deg, m.top_n, ModeKind::Circular),
        twa_modes: direction_modes(&twas, m.sector_width_deg, m.top_n, ModeKind::Linear),
        turn_marks: turn_marks(pts, &cfg.marks),
        regime_marks: regime_marks(pts, &legs),
        maneuvers,
        legs,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub a: String,
    pub b: String,
    pub aligned: bool,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Regimet i det felles vinduet, ut fra snitt-TWA for a
    pub kind: Option<LegKind>,
    pub separation: Option<SeparationReport>,
    pub summary_a: Option<TrackSummary>,
    pub summary_b: Option<TrackSummary>,
}

/// Sammenlign to track i det felles tidsrommet. Uten overlapp hoppes sammenligningen over.
///
/// Vinden til `a` er referansen: regime og separasjonsakse regnes fra `a.twd`.
pub fn compare_tracks(a: &Track, b: &Track, cfg: &AnalysisCfg) -> Comparison {
    match synchronize(a, b) {
        Synchronized::NoOverlap => Comparison {
            a: a.id.clone(),
            b: b.id.clone(),
            aligned: false,
            start: None,
            end: None,
            kind: None,
            separation: None,
            summary_a: None,
            summary_b: None,
        },
        Synchronized::Aligned { a: ca, b: cb, start, end } => {
            if circular_diff(ca.twd, cb.twd).abs() > 1e-6 {
                warn!(
                    "[pipeline] {} og {} har ulik TWD ({:.1}° / {:.1}°), bruker {:.1}°",
                    ca.id, cb.id, ca.twd, cb.twd, ca.twd
                );
            }
            let twas: Vec<f64> = ca.points.iter().map(|p| p.twa).collect();
            let kind = circular_mean_signed(&twas).map(|t| classify(t, &cfg.legs));
            let separation = kind.and_then(|k| axial_separation(&ca, &cb, ca.twd, k));
            Comparison {
                a: ca.id.clone(),
                b: cb.id.clone(),
                aligned: true,
                start: Some(start),
                end: Some(end),
                kind,
                separation,
                summary_a: summarize(&ca),
                summary_b: summarize(&cb),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrackOutcome {
    Analyzed(TrackReport),
    Rejected { id: String, kind: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SessionReport {
    pub tracks: Vec<TrackOutcome>,
    pub comparisons: Vec<Comparison>,
    pub deficits: Vec<DistanceDeficit>,
    pub marks: Vec<Mark>,
}

impl SessionReport {
    pub fn analyzed(&self) -> impl Iterator<Item = &TrackReport> {
        self.tracks.iter().filter_map(|t| match t {
            TrackOutcome::Analyzed(r) => Some(r),
            TrackOutcome::Rejected { .. } => None,
        })
    }

    pub fn rejected_ids(&self) -> Vec<&str> {
        self.tracks
            .iter()
            .filter_map(|t| match t {
                TrackOutcome::Rejected { id, .. } => Some(id.as_str()),
                TrackOutcome::Analyzed(_) => None,
            })
            .collect()
    }
}

/// TWD for ett track: eget felt, så metadata, ellers estimert fra første og siste punkt.
fn resolve_twd(input_twd: Option<f64>, meta: Option<&RaceMeta>, base: &[TrackPoint]) -> f64 {
    if let Some(t) = input_twd.filter(|t| t.is_finite()) {
        return t;
    }
    if let Some(t) = meta.and_then(RaceMeta::twd_deg) {
        return t;
    }
    match (base.first(), base.last()) {
        (Some(f), Some(l)) => {
            let twd = estimate_twd(f.pos(), l.pos());
            debug!("[pipeline] TWD estimert fra track: {twd:.1}°");
            twd
        }
        _ => 0.0,
    }
}

fn prepare(input: TrackInput, meta: Option<&RaceMeta>, cfg: &AnalysisCfg) -> Result<Track> {
    let base = base_points(&input.id, input.source?)?;
    let twd = resolve_twd(input.twd, meta, &base);
    let track = track_from_base(&input.id, &base, twd, cfg);

    // analysen starter ved startsignalet når metadata har det
    let start = meta.zip(track.start()).and_then(|(m, t0)| m.start_instant(t0));
    match (start, track.end()) {
        (Some(s), Some(e)) if s <= e => Ok(clip_window(&track, s, e)),
        _ => Ok(track),
    }
}

/// Analyser en hel økt med flere track.
pub fn analyze_session(inputs: Vec<TrackInput>, meta: Option<&RaceMeta>, cfg: &AnalysisCfg) -> SessionReport {
    let mut report = SessionReport::default();
    let mut built: Vec<Track> = Vec::new();

    for input in inputs {
        let id = input.id.clone();
        match prepare(input, meta, cfg) {
            Ok(track) => {
                report.tracks.push(TrackOutcome::Analyzed(analyze_track(&track, cfg)));
                telemetry::track_built();
                built.push(track);
            }
            Err(e) => {
                warn!("[pipeline] {id} avvist: {e}");
                telemetry::track_rejected(e.kind());
                report.tracks.push(TrackOutcome::Rejected {
                    id,
                    kind: e.kind().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    for (i, a) in built.iter().enumerate() {
        for b in &built[i + 1..] {
            report.comparisons.push(compare_tracks(a, b, cfg));
        }
    }
    report.deficits = distance_deficits(&built);

    if let Some(m) = meta {
        match m.mark_list() {
            Ok(marks) => report.marks = marks,
            Err(e) => warn!("[pipeline] ugyldige bøyer i metadata: {e}"),
        }
    }

    info!(
        "[pipeline] økt: {} analysert, {} avvist, {} sammenligninger",
        built.len(),
        report.tracks.len() - built.len(),
        report.comparisons.len()
    );
    report
}
