//! Metadata for en regatta (vind, startminutt, notater, bøyer) lagret som JSON.
//!
//! Feltnavnene følger filene metadata-editoren skriver (`TWD`, `BALIZAS`, ...).

use std::path::Path;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::circular::normalize_deg;
use crate::error::{EngineError, Result};
use crate::geodesy::{check_coordinate, GeoPos};
use crate::models::Mark;
use crate::sync::shift_minutes;

/// Bøye slik den lagres i metadatafilen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaMark {
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "nombre", alias = "name", default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RaceMeta {
    #[serde(rename = "TWD", default, skip_serializing_if = "Option::is_none")]
    pub twd: Option<f64>,
    /// Typisk vindskift (grader)
    #[serde(rename = "TWDShift", default, skip_serializing_if = "Option::is_none")]
    pub twd_shift: Option<f64>,
    /// Vindstyrke (knop)
    #[serde(rename = "TWS", default, skip_serializing_if = "Option::is_none")]
    pub tws: Option<f64>,
    /// Kast (knop)
    #[serde(rename = "TWSG", default, skip_serializing_if = "Option::is_none")]
    pub twsg: Option<f64>,
    /// Start, i minutter etter første punkt
    #[serde(rename = "MINUTO_SALIDA", default, skip_serializing_if = "Option::is_none")]
    pub start_minute: Option<f64>,
    #[serde(rename = "NOTAS", default)]
    pub notes: String,
    #[serde(rename = "BALIZAS", default)]
    pub marks: Vec<MetaMark>,
}

impl RaceMeta {
    /// Sjekk at alle bøyer har gyldige koordinater og at tallene er endelige.
    pub fn validate(&self) -> Result<()> {
        for m in &self.marks {
            check_coordinate(m.lat, m.lon)?;
        }
        let numbers = [
            ("TWD", self.twd),
            ("TWDShift", self.twd_shift),
            ("TWS", self.tws),
            ("TWSG", self.twsg),
            ("MINUTO_SALIDA", self.start_minute),
        ];
        for (field, v) in numbers {
            if let Some(v) = v.filter(|v| !v.is_finite()) {
                return Err(EngineError::InvalidValue {
                    row: 0,
                    field: field.to_string(),
                    value: v.to_string(),
                });
            }
        }
        Ok(())
    }

    /// TWD normalisert til [0, 360).
    pub fn twd_deg(&self) -> Option<f64> {
        self.twd.map(normalize_deg)
    }

    /// Starttidspunkt gitt første punkt i tracket. `None` når minuttet havner utenfor tidsrommet.
    pub fn start_instant(&self, track_start: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let m = self.start_minute?;
        let at = shift_minutes(track_start, m);
        if at.is_none() {
            warn!("[meta] MINUTO_SALIDA={m} gir et tidspunkt utenfor tidsrommet, ignoreres");
        }
        at
    }

    /// Bøyene som merker. Koordinatene må være validert.
    pub fn mark_list(&self) -> Result<Vec<Mark>> {
        self.marks
            .iter()
            .map(|m| {
                Ok(Mark {
                    name: m.name.clone(),
                    pos: GeoPos::new(m.lat, m.lon)?,
                    timestamp: None,
                    label: None,
                })
            })
            .collect()
    }
}

/// Tolk metadata fra JSON-tekst. Ukjente nøkler ignoreres.
pub fn from_json_str(s: &str) -> Result<RaceMeta> {
    let de = &mut serde_json::Deserializer::from_str(s);
    let meta: RaceMeta = serde_path_to_error::deserialize(de).map_err(|e| {
        warn!("[meta] ugyldig felt '{}': {}", e.path(), e.inner());
        EngineError::Json(e.into_inner())
    })?;
    meta.validate()?;
    Ok(meta)
}

/// Les metadata fra disk. Finnes ikke filen, returneres standardverdier.
pub fn load_meta(path: &Path) -> Result<RaceMeta> {
    if !path.exists() {
        warn!("[meta] fant ikke {}, bruker standardverdier", path.display());
        return Ok(RaceMeta::default());
    }
    let contents = std::fs::read_to_string(path)?;
    let meta = from_json_str(&contents)?;
    info!(
        "[meta] lastet fra {} (TWD={:?}, {} bøyer)",
        path.display(),
        meta.twd,
        meta.marks.len()
    );
    Ok(meta)
}

/// Lagre metadata som JSON (pretty-print).
pub fn save_meta(meta: &RaceMeta, path: &Path) -> Result<()> {
    meta.validate()?;
    let json = serde_json::to_string_pretty(meta)?;
    std::fs::write(path, json)?;
    info!("[meta] lagret til {} ({} bøyer)", path.display(), meta.marks.len());
    Ok(())
}
