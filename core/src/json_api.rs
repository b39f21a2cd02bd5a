//! Tolerant JSON inn, flat JSON ut. Brukes av Python-broen og av verktøy som ikke vil
//! bygge kjernetypene selv.

use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json as json;
use serde_path_to_error as spte;

use crate::error::{EngineError, Result};
use crate::geodesy::GeoPos;
use crate::ingest::parse_utc;
use crate::meta::RaceMeta;
use crate::models::{EnrichedPoint, RawPoint, TrackPoint};
use crate::pipeline::{analyze_session, base_points, TrackInput, TrackSource};
use crate::types::AnalysisCfg;
use crate::wind::enrich;

// ──────────────────────────────────────────────────────────────────────────────
// INPUT-REPR (tolerant)
// ──────────────────────────────────────────────────────────────────────────────

/// Tid som RFC 3339-tekst eller epoke-sekunder.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TimeIn {
    Epoch(f64),
    Text(String),
}

impl TimeIn {
    fn to_utc(&self, row: usize) -> Result<DateTime<Utc>> {
        let parsed = match self {
            TimeIn::Epoch(s) if s.is_finite() => DateTime::from_timestamp_millis((s * 1000.0).round() as i64),
            TimeIn::Epoch(_) => None,
            TimeIn::Text(s) => parse_utc(s),
        };
        parsed.ok_or_else(|| EngineError::UnparsableTimestamp {
            row,
            value: match self {
                TimeIn::Epoch(s) => s.to_string(),
                TimeIn::Text(s) => s.clone(),
            },
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct PointIn {
    #[serde(alias = "Lat", alias = "latitude")]
    lat: f64,
    #[serde(alias = "Lon", alias = "longitude")]
    lon: f64,
    #[serde(alias = "UTC", alias = "time", alias = "timestamp")]
    utc: TimeIn,
    #[serde(default, alias = "COG")]
    cog: Option<f64>,
    #[serde(default, alias = "SOG")]
    sog: Option<f64>,
    #[serde(default, alias = "Dist")]
    dist: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TrackIn {
    #[serde(alias = "name", alias = "SourceFile")]
    id: String,
    #[serde(default)]
    points: Vec<PointIn>,
    #[serde(default, alias = "TWD")]
    twd: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SessionIn {
    tracks: Vec<TrackIn>,
    #[serde(default)]
    meta: Option<RaceMeta>,
    #[serde(default)]
    cfg: AnalysisCfg,
}

#[derive(Debug, Deserialize)]
struct EnrichIn {
    #[serde(default = "default_enrich_id", alias = "name")]
    id: String,
    points: Vec<PointIn>,
    #[serde(alias = "TWD")]
    twd: f64,
    #[serde(default = "default_smoothing")]
    smoothing_window: usize,
}

fn default_enrich_id() -> String {
    "track".to_string()
}

fn default_smoothing() -> usize {
    AnalysisCfg::default().smoothing_window
}

// ──────────────────────────────────────────────────────────────────────────────
/* KONVERTERINGER (tolerant → kjerne-typer) */
// ──────────────────────────────────────────────────────────────────────────────

/// Enten har alle punkter cog/sog/dist (ferdig avledet), eller ingen (avledes her).
fn to_source(id: &str, points: &[PointIn]) -> Result<TrackSource> {
    let derived = points
        .iter()
        .filter(|p| p.cog.is_some() && p.sog.is_some() && p.dist.is_some())
        .count();
    let bare = points
        .iter()
        .filter(|p| p.cog.is_none() && p.sog.is_none() && p.dist.is_none())
        .count();

    if !points.is_empty() && derived == points.len() {
        let mut out = Vec::with_capacity(points.len());
        for (row, p) in points.iter().enumerate() {
            out.push(TrackPoint {
                timestamp: p.utc.to_utc(row)?,
                lat: p.lat,
                lon: p.lon,
                cog: p.cog.unwrap_or_default(),
                sog: p.sog.unwrap_or_default(),
                dist: p.dist.unwrap_or_default(),
                source: id.to_string(),
            });
        }
        return Ok(TrackSource::Derived(out));
    }

    if bare != points.len() {
        return Err(EngineError::MissingColumns(
            ["COG", "SOG", "Dist"].iter().map(|s| s.to_string()).collect(),
        ));
    }

    let mut raw = Vec::with_capacity(points.len());
    for (row, p) in points.iter().enumerate() {
        raw.push(RawPoint::new(p.utc.to_utc(row)?, GeoPos::new(p.lat, p.lon)?));
    }
    Ok(TrackSource::Positions(raw))
}

fn parse_tolerant<'a, T: Deserialize<'a>>(json_in: &'a str, what: &str) -> anyhow::Result<T> {
    let mut de = json::Deserializer::from_str(json_in);
    spte::deserialize(&mut de).map_err(|e| anyhow!("parse error ({what}) at {}: {}", e.path(), e.inner()))
}

// ──────────────────────────────────────────────────────────────────────────────
// API
// ──────────────────────────────────────────────────────────────────────────────

/// `{tracks: [{id, points, twd?}], meta?, cfg?}` → `SessionReport` som JSON.
///
/// Bare feil i selve dokumentet gir `Err`; ugyldige track kommer ut som `rejected`.
pub fn analyze_session_json(json_in: &str) -> anyhow::Result<String> {
    let parsed: SessionIn = parse_tolerant(json_in, "session")?;
    if let Some(meta) = &parsed.meta {
        meta.validate().context("ugyldig metadata")?;
    }

    let inputs: Vec<TrackInput> = parsed
        .tracks
        .iter()
        .map(|t| TrackInput {
            id: t.id.clone(),
            twd: t.twd,
            source: to_source(&t.id, &t.points),
        })
        .collect();

    let report = analyze_session(inputs, parsed.meta.as_ref(), &parsed.cfg);
    json::to_string(&report).context("serialisering av rapport")
}

#[derive(Debug, Serialize)]
struct EnrichOut<'a> {
    id: &'a str,
    twd: f64,
    points: Vec<EnrichedPoint>,
}

/// `{id?, points, twd, smoothing_window?}` → berikede punkter som JSON.
pub fn enrich_json(json_in: &str) -> anyhow::Result<String> {
    let parsed: EnrichIn = parse_tolerant(json_in, "enrich")?;
    let source = to_source(&parsed.id, &parsed.points).with_context(|| format!("track {}", parsed.id))?;
    let base = base_points(&parsed.id, source).with_context(|| format!("track {}", parsed.id))?;
    let twd = crate::circular::normalize_deg(parsed.twd);

    let out = EnrichOut {
        id: &parsed.id,
        twd,
        points: enrich(&base, twd, parsed.smoothing_window),
    };
    json::to_string(&out).context("serialisering av punkter")
}
