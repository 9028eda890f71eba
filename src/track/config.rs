//! Configuration for the planner

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a planner configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Distance and angle slack used when deciding whether two endpoints join
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub distance_mm: f64,
    pub angle_rad: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            distance_mm: 3.0,
            angle_rad: std::f64::consts::PI / 36.0,
        }
    }
}

/// Configuration options for the planner
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Connection tolerance for endpoint joins
    pub tolerance: Tolerance,

    /// Maximum endpoint distance considered by the snap solver
    pub snap_distance_mm: f64,

    /// Grid pitch for grid-snap
    pub grid_mm: f64,

    /// Rotation step for grid-snap
    pub angle_step_deg: f64,

    /// Rotation applied by a single rotate-left/right step
    pub rotate_step_deg: f64,

    /// Distance moved by a single nudge
    pub nudge_mm: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            snap_distance_mm: 200.0,
            grid_mm: 10.0,
            angle_step_deg: 15.0,
            rotate_step_deg: 15.0,
            nudge_mm: 10.0,
        }
    }
}

/// TOML structure for deserializing configuration; absent keys keep defaults
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    connection_tolerance_mm: Option<f64>,
    angle_tolerance_deg: Option<f64>,
    snap_distance_mm: Option<f64>,
    grid_mm: Option<f64>,
    angle_step_deg: Option<f64>,
    rotate_step_deg: Option<f64>,
    nudge_mm: Option<f64>,
}

impl PlannerConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();
        if let Some(v) = parsed.connection_tolerance_mm {
            config.tolerance.distance_mm = v;
        }
        if let Some(v) = parsed.angle_tolerance_deg {
            config.tolerance.angle_rad = v.to_radians();
        }
        if let Some(v) = parsed.snap_distance_mm {
            config.snap_distance_mm = v;
        }
        if let Some(v) = parsed.grid_mm {
            config.grid_mm = v;
        }
        if let Some(v) = parsed.angle_step_deg {
            config.angle_step_deg = v;
        }
        if let Some(v) = parsed.rotate_step_deg {
            config.rotate_step_deg = v;
        }
        if let Some(v) = parsed.nudge_mm {
            config.nudge_mm = v;
        }
        Ok(config)
    }

    /// Set the connection tolerance
    pub fn with_tolerance(mut self, distance_mm: f64, angle_deg: f64) -> Self {
        self.tolerance = Tolerance {
            distance_mm,
            angle_rad: angle_deg.to_radians(),
        };
        self
    }

    /// Set the snap search radius
    pub fn with_snap_distance(mut self, distance_mm: f64) -> Self {
        self.snap_distance_mm = distance_mm;
        self
    }

    /// Set the grid-snap pitch and angle step
    pub fn with_grid(mut self, grid_mm: f64, angle_step_deg: f64) -> Self {
        self.grid_mm = grid_mm;
        self.angle_step_deg = angle_step_deg;
        self
    }
}
