use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::circular::normalize_deg;
use crate::geodesy::GeoPos;
use crate::wind::enrich;

/// Rå posisjon slik den kommer fra import (GPX/FIT/VKX er parset utenfor motoren).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub timestamp: DateTime<Utc>,
    pub pos: GeoPos,
}

impl RawPoint {
    pub fn new(timestamp: DateTime<Utc>, pos: GeoPos) -> Self {
        Self { timestamp, pos }
    }
}

/// Kinematisk punkt. Avledes fra rå posisjoner eller leses ferdig fra CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub timestamp: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub cog: f64,  // grader [0, 360)
    pub sog: f64,  // knop
    pub dist: f64, // meter fra forrige punkt
    pub source: String,
}

impl TrackPoint {
    /// Posisjonen er validert da punktet ble laget.
    pub fn pos(&self) -> GeoPos {
        GeoPos::from_validated(self.lat, self.lon)
    }
}

/// TrackPoint + vindrelative felt. Gyldig kun sammen med TWD-en den ble regnet med.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPoint {
    pub timestamp: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub cog: f64,
    pub sog: f64,
    pub dist: f64,
    pub source: String,
    pub twa: f64,     // signert [-180, 180)
    pub twa_abs: f64, // [0, 180]
    pub vmg: f64,     // knop, signert (positiv mot vinden)
    pub sog_smoothed: f64,
}

impl EnrichedPoint {
    pub fn base(&self) -> TrackPoint {
        TrackPoint {
            timestamp: self.timestamp,
            lat: self.lat,
            lon: self.lon,
            cog: self.cog,
            sog: self.sog,
            dist: self.dist,
            source: self.source.clone(),
        }
    }

    pub fn pos(&self) -> GeoPos {
        GeoPos::from_validated(self.lat, self.lon)
    }
}

/// Ett track: punktene eies av tracket, sammen med TWD og eventuelt tidsvindu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub twd: f64,
    pub window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub points: Vec<EnrichedPoint>,
}

impl Track {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.points.first().map(|p| p.timestamp)
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|p| p.timestamp)
    }

    /// Grunnpunktene uten vindfelt (for ny avledning med annen TWD).
    pub fn base_points(&self) -> Vec<TrackPoint> {
        self.points.iter().map(EnrichedPoint::base).collect()
    }

    /// Nytt track med vindfeltene regnet om for en annen TWD. Originalen endres ikke.
    pub fn with_twd(&self, twd: f64, smoothing_window: usize) -> Track {
        let twd = normalize_deg(twd);
        Track {
            id: self.id.clone(),
            twd,
            window: self.window,
            points: enrich(&self.base_points(), twd, smoothing_window),
        }
    }
}

/// Slag eller jibb funnet av manøverdetektoren.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maneuver {
    pub track: String,
    pub timestamp: DateTime<Utc>,
    pub index: usize,
    pub cog: f64,
    pub cog_before: f64, // sirkulært snitt av vinduet før
    pub cog_after: f64,  // sirkulært snitt av vinduet etter
    pub delta_cog: f64,  // signert, [-180, 180)
    pub intensity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegKind {
    Upwind,
    Downwind,
    Reach,
    /// Alt som ikke er kryss, når klassifiseringen er binær.
    Offwind,
}

impl LegKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegKind::Upwind => "upwind",
            LegKind::Downwind => "downwind",
            LegKind::Reach => "reach",
            LegKind::Offwind => "offwind",
        }
    }
}

impl std::fmt::Display for LegKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strekk mellom to manøvrer (eller track-start/slutt).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub track: String,
    pub start_index: usize,
    pub end_index: usize,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_s: f64,
    pub points: usize,
    pub sog_mean: f64,
    pub vmg_mean: f64,
    pub distance_m: f64,
    pub cog_mean: f64,
    pub cog_std: f64,
    pub twa_mean: f64,
    pub kind: LegKind,
}

/// Merke (bøye) eller funnet vendepunkt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(flatten)]
    pub pos: GeoPos,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}
