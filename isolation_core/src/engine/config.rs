use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which built-in scoring function `HeuristicEvaluator` applies at cutoff nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// Win/loss only; every undecided position scores zero.
    Outcome,
    /// Mobility difference weighted by the number of plies played.
    #[default]
    MoveCount,
    /// Mobility difference scaled by how full the board is.
    CalibratedMobility,
    /// Own mobility plus distance from the opponent, minus opponent mobility.
    Distance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Fixed-depth search
    pub search_depth: u8,

    // Time control: the search aborts once less than this many milliseconds remain.
    pub timer_threshold_ms: f64,
    // Iterative deepening cap. `None` lets it run to the number of blank cells.
    pub max_depth: Option<u8>,

    // Evaluation
    pub heuristic: Heuristic,
    pub calibration_factor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_depth: 3,
            timer_threshold_ms: 12.0,
            max_depth: None,
            heuristic: Heuristic::MoveCount,
            calibration_factor: 10.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("search_depth must be at least 1")]
    ZeroSearchDepth,
    #[error("max_depth must be at least 1 when set")]
    ZeroMaxDepth,
    #[error("timer_threshold_ms must be finite and non-negative, got {0}")]
    InvalidThreshold(f64),
    #[error("calibration_factor must be finite, got {0}")]
    InvalidCalibration(f64),
}

impl EngineConfig {
    /// Parses a possibly partial JSON object; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input and the [`EngineConfig::validate`]
    /// errors for out-of-range values.
    pub fn load_from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Rejects a zero `search_depth` or `max_depth`, a negative or non-finite threshold, and
    /// a non-finite calibration factor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_depth == 0 {
            return Err(ConfigError::ZeroSearchDepth);
        }
        if self.max_depth == Some(0) {
            return Err(ConfigError::ZeroMaxDepth);
        }
        if !self.timer_threshold_ms.is_finite() || self.timer_threshold_ms < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.timer_threshold_ms));
        }
        if !self.calibration_factor.is_finite() {
            return Err(ConfigError::InvalidCalibration(self.calibration_factor));
        }
        Ok(())
    }
}
