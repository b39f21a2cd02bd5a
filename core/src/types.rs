use serde::{Deserialize, Serialize};

/// Standard tidsforskyvninger (sek) for fartsprofil rundt manøvrer.
pub const DEFAULT_SPEED_OFFSETS_S: [i64; 14] = [-12, -8, -5, -3, -2, -1, 0, 1, 2, 3, 5, 8, 12, 20];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DebouncePolicy {
    /// Første kandidat i en klynge beholdes (grådig skann forover).
    #[default]
    FirstWins,
    /// Kandidaten med høyest intensitet i klyngen beholdes.
    BestOfCluster,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManeuverParams {
    pub threshold_deg: f64,
    pub window: usize, // antall punkter, ikke tid
    pub min_separation_s: f64,
    pub policy: DebouncePolicy,
}

impl Default for ManeuverParams {
    fn default() -> Self {
        Self {
            threshold_deg: 30.0,
            window: 10,
            min_separation_s: 15.0,
            policy: DebouncePolicy::FirstWins,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LegScheme {
    /// kryss / slør / lens
    #[default]
    ThreeWay,
    /// kryss / alt annet
    Binary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LegThresholds {
    pub upwind_max_deg: f64,
    pub downwind_min_deg: f64,
    pub scheme: LegScheme,
}

impl Default for LegThresholds {
    fn default() -> Self {
        Self {
            upwind_max_deg: 60.0,
            downwind_min_deg: 135.0,
            scheme: LegScheme::ThreeWay,
        }
    }
}

/// Lukket intervall av |TWA| i grader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwaBand {
    pub min_deg: f64,
    pub max_deg: f64,
}

impl TwaBand {
    pub fn new(min_deg: f64, max_deg: f64) -> Self {
        Self { min_deg, max_deg }
    }

    #[inline]
    pub fn contains(&self, twa_abs: f64) -> bool {
        twa_abs >= self.min_deg && twa_abs <= self.max_deg
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingParams {
    pub window: usize,
    pub upwind_band: TwaBand,
    pub downwind_band: TwaBand,
}

impl Default for RankingParams {
    fn default() -> Self {
        Self {
            window: 20,
            upwind_band: TwaBand::new(40.0, 70.0),
            downwind_band: TwaBand::new(135.0, 180.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeParams {
    pub sector_width_deg: f64,
    pub top_n: usize,
}

impl Default for ModeParams {
    fn default() -> Self {
        Self { sector_width_deg: 10.0, top_n: 3 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkParams {
    pub turn_threshold_deg: f64,
    pub min_spacing_m: f64,
}

impl Default for MarkParams {
    fn default() -> Self {
        Self { turn_threshold_deg: 60.0, min_spacing_m: 40.0 }
    }
}

/// Alle parametre for én analyse. Alle felt har standardverdier, så `{}` er gyldig JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisCfg {
    pub smoothing_window: usize,
    pub maneuvers: ManeuverParams,
    pub legs: LegThresholds,
    pub ranking: RankingParams,
    pub modes: ModeParams,
    pub marks: MarkParams,
    pub speed_offsets_s: Vec<i64>,
}

impl Default for AnalysisCfg {
    fn default() -> Self {
        Self {
            smoothing_window: 5,
            maneuvers: ManeuverParams::default(),
            legs: LegThresholds::default(),
            ranking: RankingParams::default(),
            modes: ModeParams::default(),
            marks: MarkParams::default(),
            speed_offsets_s: DEFAULT_SPEED_OFFSETS_S.to_vec(),
        }
    }
}
