// Engine configuration loading and parsing (engine.toml).
//
// Every threshold the scoring pass uses lives here so operators can retune
// the classifier, age curves and default weights without touching code.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::roster::position::Position;
use crate::valuation::age_curve::position_bucket;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("no config/engine.toml or defaults/engine.toml under {}", .base_dir.display())]
    NoConfig { base_dir: PathBuf },

    #[error("failed to install default config at {path}: {source}")]
    InstallDefaults {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Top-level assembled config
// ---------------------------------------------------------------------------

/// All tunables for one scoring pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub archetype: ArchetypeConfig,
    pub age_curve: AgeCurveConfig,
    /// Weights used when a request doesn't carry its own.
    pub weights: EdgeEngineWeights,
    pub needs: NeedsConfig,
}

// ---------------------------------------------------------------------------
// Composite weights
// ---------------------------------------------------------------------------

/// Per-axis weights for the composite power score. Nominally sum to 100 but
/// any non-negative, not-all-zero set is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeEngineWeights {
    pub starters: f64,
    pub bench: f64,
    pub picks: f64,
    pub depth: f64,
    pub age: f64,
}

/// The documented fallback weight table.
pub const DEFAULT_WEIGHTS: EdgeEngineWeights = EdgeEngineWeights {
    starters: 45.0,
    bench: 15.0,
    picks: 15.0,
    depth: 20.0,
    age: 5.0,
};

impl Default for EdgeEngineWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

impl EdgeEngineWeights {
    /// (name, weight) pairs in a fixed order.
    pub fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("starters", self.starters),
            ("bench", self.bench),
            ("picks", self.picks),
            ("depth", self.depth),
            ("age", self.age),
        ]
    }

    pub fn total(&self) -> f64 {
        self.fields().iter().map(|(_, w)| w).sum()
    }
}

// ---------------------------------------------------------------------------
// Archetype thresholds
// ---------------------------------------------------------------------------

/// Percentile cut points for the archetype decision list.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeConfig {
    pub dynasty_juggernaut: JuggernautThresholds,
    pub all_in_contender: AllInThresholds,
    pub fragile_contender: FragileThresholds,
    pub productive_struggle: StruggleThresholds,
    pub rebuilder: RebuilderThresholds,
    pub dead_zone: DeadZoneThresholds,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JuggernautThresholds {
    pub power_min: f64,
    pub window_min: f64,
}

impl Default for JuggernautThresholds {
    fn default() -> Self {
        Self {
            power_min: 80.0,
            window_min: 70.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllInThresholds {
    pub power_min: f64,
    pub draft_max: f64,
}

impl Default for AllInThresholds {
    fn default() -> Self {
        Self {
            power_min: 75.0,
            draft_max: 40.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragileThresholds {
    pub power_min: f64,
    pub window_max: f64,
}

impl Default for FragileThresholds {
    fn default() -> Self {
        Self {
            power_min: 70.0,
            window_max: 40.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StruggleThresholds {
    pub low_now_max: f64,
    pub draft_min: f64,
    pub window_min: f64,
}

impl Default for StruggleThresholds {
    fn default() -> Self {
        Self {
            low_now_max: 40.0,
            draft_min: 70.0,
            window_min: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebuilderThresholds {
    pub power_max: f64,
}

impl Default for RebuilderThresholds {
    fn default() -> Self {
        Self { power_max: 30.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeadZoneThresholds {
    pub power_min: f64,
    pub power_max: f64,
    pub draft_max: f64,
    pub window_max: f64,
}

impl Default for DeadZoneThresholds {
    fn default() -> Self {
        Self {
            power_min: 40.0,
            power_max: 60.0,
            draft_max: 50.0,
            window_max: 50.0,
        }
    }
}

impl ArchetypeConfig {
    /// (dotted field name, value) for every threshold.
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("archetype.dynasty_juggernaut.power_min", self.dynasty_juggernaut.power_min),
            ("archetype.dynasty_juggernaut.window_min", self.dynasty_juggernaut.window_min),
            ("archetype.all_in_contender.power_min", self.all_in_contender.power_min),
            ("archetype.all_in_contender.draft_max", self.all_in_contender.draft_max),
            ("archetype.fragile_contender.power_min", self.fragile_contender.power_min),
            ("archetype.fragile_contender.window_max", self.fragile_contender.window_max),
            ("archetype.productive_struggle.low_now_max", self.productive_struggle.low_now_max),
            ("archetype.productive_struggle.draft_min", self.productive_struggle.draft_min),
            ("archetype.productive_struggle.window_min", self.productive_struggle.window_min),
            ("archetype.rebuilder.power_max", self.rebuilder.power_max),
            ("archetype.dead_zone.power_min", self.dead_zone.power_min),
            ("archetype.dead_zone.power_max", self.dead_zone.power_max),
            ("archetype.dead_zone.draft_max", self.dead_zone.draft_max),
            ("archetype.dead_zone.window_max", self.dead_zone.window_max),
        ]
    }

    /// Check every threshold is a percentile and the dead zone band is ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, val) in self.fields() {
            if !(0.0..=100.0).contains(&val) {
                return Err(ConfigError::ValidationError {
                    field: field.to_string(),
                    message: format!("must be between 0 and 100 inclusive, got {val}"),
                });
            }
        }
        if self.dead_zone.power_min > self.dead_zone.power_max {
            return Err(ConfigError::ValidationError {
                field: "archetype.dead_zone.power_min".into(),
                message: format!(
                    "must not exceed dead_zone.power_max ({} > {})",
                    self.dead_zone.power_min, self.dead_zone.power_max
                ),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Age curves
// ---------------------------------------------------------------------------

/// Lifecycle ages for one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeWindow {
    /// First prime age. Anything younger is on the ascent.
    pub prime_start: u32,
    /// Last prime age.
    pub prime_end: u32,
    /// First age of the cliff. Ages between `prime_end` and this are decline.
    pub cliff_age: u32,
}

/// Age windows keyed by position label plus the display range for the age bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgeCurveConfig {
    pub display_min_age: u32,
    pub display_max_age: u32,
    /// Keyed by canonical position label ("QB", "DEF"). Windows named in a
    /// file are layered over the built-in ones.
    #[serde(deserialize_with = "merge_windows")]
    pub windows: HashMap<String, AgeWindow>,
}

/// Layer file windows over the built-in table, normalizing keys the same way
/// player positions are bucketed ("rb" -> "RB", "DST" -> "DEF").
fn merge_windows<'de, D>(deserializer: D) -> Result<HashMap<String, AgeWindow>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = HashMap::<String, AgeWindow>::deserialize(deserializer)?;
    let mut windows = AgeCurveConfig::default().windows;
    for (label, window) in overrides {
        windows.insert(position_bucket(&label), window);
    }
    Ok(windows)
}

impl Default for AgeCurveConfig {
    fn default() -> Self {
        let mut windows = HashMap::new();
        let mut add = |pos: &str, prime_start, prime_end, cliff_age| {
            windows.insert(
                pos.to_string(),
                AgeWindow {
                    prime_start,
                    prime_end,
                    cliff_age,
                },
            );
        };
        add("QB", 26, 32, 36);
        add("RB", 22, 26, 29);
        add("WR", 24, 29, 32);
        add("TE", 25, 30, 33);
        add("K", 25, 36, 41);
        Self {
            display_min_age: 20,
            display_max_age: 40,
            windows,
        }
    }
}

impl AgeCurveConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display_min_age >= self.display_max_age {
            return Err(ConfigError::ValidationError {
                field: "age_curve.display_min_age".into(),
                message: format!(
                    "must be less than display_max_age ({} >= {})",
                    self.display_min_age, self.display_max_age
                ),
            });
        }
        for (pos, w) in &self.windows {
            let canonical = Position::from_str_pos(pos).map(|p| p.display_str());
            if canonical != Some(pos.as_str()) {
                return Err(ConfigError::ValidationError {
                    field: format!("age_curve.windows.{pos}"),
                    message: "not a position label (expected one of QB, RB, WR, TE, K, DEF, DL, LB, DB)".into(),
                });
            }
            if w.prime_start > w.prime_end {
                return Err(ConfigError::ValidationError {
                    field: format!("age_curve.windows.{pos}.prime_start"),
                    message: format!("must not exceed prime_end ({} > {})", w.prime_start, w.prime_end),
                });
            }
            if w.cliff_age <= w.prime_end {
                return Err(ConfigError::ValidationError {
                    field: format!("age_curve.windows.{pos}.cliff_age"),
                    message: format!("must be greater than prime_end ({} <= {})", w.cliff_age, w.prime_end),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Position needs
// ---------------------------------------------------------------------------

/// Percentile cut points for flagging a position as surplus or shallow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedsConfig {
    /// At or above this percentile the position is a surplus.
    pub surplus_min: f64,
    /// Below this percentile the position is shallow.
    pub shallow_max: f64,
}

impl Default for NeedsConfig {
    fn default() -> Self {
        Self {
            surplus_min: 75.0,
            shallow_max: 25.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/engine.toml` relative to
/// `base_dir`. Sections missing from the file keep their defaults.
///
/// This does not auto-copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<EngineConfig, ConfigError> {
    let path = base_dir.join("config").join("engine.toml");
    let text = read_file(&path)?;
    let config = parse_config(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Parse an engine config from TOML text without validating it.
pub fn parse_config(text: &str) -> Result<EngineConfig, toml::de::Error> {
    toml::from_str(text)
}

/// Install the shipped `defaults/engine.toml` as `config/engine.toml` when the
/// league has no config of its own yet. Returns the installed path, or `None`
/// if a config was already present.
pub fn install_default_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join("engine.toml");
    if target.exists() {
        return Ok(None);
    }
    let source = base_dir.join("defaults").join("engine.toml");
    if !source.is_file() {
        return Err(ConfigError::NoConfig {
            base_dir: base_dir.to_path_buf(),
        });
    }

    let install_err = |e: std::io::Error| ConfigError::InstallDefaults {
        path: target.clone(),
        source: e,
    };
    std::fs::create_dir_all(base_dir.join("config")).map_err(install_err)?;
    // Never overwrite a config that appeared since the check above.
    let mut dest = match std::fs::OpenOptions::new().write(true).create_new(true).open(&target) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => return Err(install_err(e)),
    };
    let mut shipped = std::fs::File::open(&source).map_err(install_err)?;
    std::io::copy(&mut shipped, &mut dest).map_err(install_err)?;
    Ok(Some(target))
}

/// Load config relative to `base_dir`, installing the shipped defaults first.
pub fn load_config(base_dir: &Path) -> Result<EngineConfig, ConfigError> {
    install_default_config(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an assembled config. Returns the first problem found.
pub fn validate(config: &EngineConfig) -> Result<(), ConfigError> {
    config.archetype.validate()?;
    config.age_curve.validate()?;

    for (name, val) in config.weights.fields() {
        if !val.is_finite() || val < 0.0 {
            return Err(ConfigError::ValidationError {
                field: format!("weights.{name}"),
                message: format!("must be a non-negative number, got {val}"),
            });
        }
    }
    if config.weights.total() <= 0.0 {
        return Err(ConfigError::ValidationError {
            field: "weights".into(),
            message: "at least one weight must be greater than 0".into(),
        });
    }

    let needs = &config.needs;
    for (name, val) in [("needs.surplus_min", needs.surplus_min), ("needs.shallow_max", needs.shallow_max)] {
        if !(0.0..=100.0).contains(&val) {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be between 0 and 100 inclusive, got {val}"),
            });
        }
    }
    if needs.shallow_max > needs.surplus_min {
        return Err(ConfigError::ValidationError {
            field: "needs.shallow_max".into(),
            message: format!(
                "must not exceed needs.surplus_min ({} > {})",
                needs.shallow_max, needs.surplus_min
            ),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
