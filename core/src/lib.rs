pub mod circular;
pub mod error;
pub mod geodesy;
pub mod ingest;
pub mod json_api;
pub mod kinematics;
pub mod legs;
pub mod maneuvers;
pub mod marks;
pub mod meta;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod sync;
pub mod telemetry;
pub mod types;
pub mod wind;

#[cfg(feature = "python")]
mod py;

pub use error::{EngineError, Result};
pub use geodesy::GeoPos;
pub use meta::RaceMeta;
pub use models::{EnrichedPoint, Leg, LegKind, Maneuver, Mark, RawPoint, Track, TrackPoint};
pub use pipeline::{analyze_session, analyze_track, build_track, compare_tracks, SessionReport, TrackInput, TrackOutcome, TrackReport, TrackSource};
pub use types::AnalysisCfg;
