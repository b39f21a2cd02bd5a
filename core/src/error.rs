use thiserror::Error;

/// Feil som avbryter behandlingen av ett track (aldri hele økten).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("ugyldig koordinat: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("mangler påkrevde kolonner: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("tidsstempel går bakover ved punkt {index}")]
    NonMonotonicTimestamp { index: usize },

    #[error("kunne ikke tolke tidsstempel '{value}' (rad {row})")]
    UnparsableTimestamp { row: usize, value: String },

    #[error("ugyldig verdi i felt '{field}' (rad {row}): {value}")]
    InvalidValue {
        row: usize,
        field: String,
        value: String,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Kort etikett brukt som label i telemetri.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidCoordinate { .. } => "invalid_coordinate",
            EngineError::MissingColumns(_) => "missing_columns",
            EngineError::NonMonotonicTimestamp { .. } => "non_monotonic_timestamp",
            EngineError::UnparsableTimestamp { .. } => "unparsable_timestamp",
            EngineError::InvalidValue { .. } => "invalid_value",
            EngineError::Csv(_) => "csv",
            EngineError::Io(_) => "io",
            EngineError::Json(_) => "json",
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
