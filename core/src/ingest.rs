//! Import av ferdig avledede track fra CSV (eksport fra dashbordet/kutteren).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use log::{info, warn};
use serde::Deserialize;

use crate::error::{EngineError, Result};
use crate::kinematics::validate_derived;
use crate::models::TrackPoint;

/// Kolonner som må finnes i headeren.
pub const REQUIRED_COLUMNS: [&str; 6] = ["Lat", "Lon", "UTC", "COG", "SOG", "Dist"];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Tolk et tidsstempel: RFC 3339 eller naiv dato/tid (tolkes som UTC).
pub fn parse_utc(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .map(|n| n.and_utc())
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Lat")]
    lat: f64,
    #[serde(rename = "Lon")]
    lon: f64,
    #[serde(rename = "UTC")]
    utc: String,
    #[serde(rename = "COG")]
    cog: f64,
    #[serde(rename = "SOG")]
    sog: f64,
    #[serde(rename = "Dist")]
    dist: f64,
    #[serde(rename = "SourceFile", default)]
    source_file: Option<String>,
}

/// Les et track fra CSV. Manglende påkrevde kolonner avviser hele filen.
///
/// Returnerer (track-id, punkter). Id-en tas fra `SourceFile` i første rad hvis kolonnen finnes,
/// ellers brukes `default_id`.
pub fn read_csv_track<R: Read>(reader: R, default_id: &str) -> Result<(String, Vec<TrackPoint>)> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !headers.iter().any(|h| h == **c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        warn!("[ingest] {default_id}: mangler kolonner {missing:?}");
        return Err(EngineError::MissingColumns(missing));
    }

    let mut id: Option<String> = None;
    let mut points = Vec::new();
    for (row, rec) in rdr.deserialize::<CsvRow>().enumerate() {
        let r = rec?;
        let timestamp = parse_utc(&r.utc).ok_or_else(|| EngineError::UnparsableTimestamp {
            row,
            value: r.utc.clone(),
        })?;
        let source = match r.source_file {
            Some(s) if !s.is_empty() => s,
            _ => default_id.to_string(),
        };
        if id.is_none() {
            id = Some(source.clone());
        }
        points.push(TrackPoint {
            timestamp,
            lat: r.lat,
            lon: r.lon,
            cog: r.cog,
            sog: r.sog,
            dist: r.dist,
            source,
        });
    }

    let points = validate_derived(points)?;
    let id = id.unwrap_or_else(|| default_id.to_string());
    info!("[ingest] {id}: {} punkter lest", points.len());
    Ok((id, points))
}

/// Les CSV fra fil. Filnavnet (uten endelse) er standard id.
pub fn read_csv_file(path: &Path) -> Result<(String, Vec<TrackPoint>)> {
    let default_id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "track".to_string());
    let file = File::open(path)?;
    read_csv_track(file, &default_id)
}
