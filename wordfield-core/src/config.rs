/// TOML configuration.
///
/// Every section has defaults, so partial files work. A file that parses but
/// fails validation is reported with a warning and replaced by the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::color::Color;
use crate::error::{ConfigError, Error, Result};
use crate::placement::{ScaleMode, SearchTerm};

/// Sketches show at most this many search terms
pub const MAX_TERMS: usize = 3;
pub const MAX_INSTANCES_PER_MATCH: usize = 1000;

/// Slider ranges of the knot tuner
pub const SPEED_RANGE: (f32, f32) = (0.1, 10.0);
pub const DISTANCE_RANGE: (f32, f32) = (0.1, 10.0);
pub const ROTATION_SPEED_RANGE: (f32, f32) = (0.01, 1.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordfieldConfig {
    /// Seed for instance placement; entropy when absent
    pub seed: Option<u64>,
    /// Target frames per second of the terminal host
    pub fps: u32,
    pub text: TextConfig,
    pub terms: Vec<TermConfig>,
    pub controls: ControlsConfig,
    pub changes: ChangesConfig,
    pub tuner: TunerConfig,
}

impl Default for WordfieldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            fps: 30,
            text: TextConfig::default(),
            terms: TermConfig::defaults(),
            controls: ControlsConfig::default(),
            changes: ChangesConfig::default(),
            tuner: TunerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Text analysed by the term field
    pub source: String,
}

/// Group animation applied to a term's instances in the term field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupMotion {
    /// Cubes spin around y, faster toward +x; the group bobs
    Spin,
    /// The group circles the origin; cube scale pulses with height
    Orbit,
    Still,
}

impl GroupMotion {
    /// Motion used when a term does not name one
    pub fn for_slot(slot: usize) -> Self {
        match slot {
            0 => GroupMotion::Spin,
            1 => GroupMotion::Orbit,
            _ => GroupMotion::Still,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermConfig {
    pub term: String,
    pub color: String,
    pub diameter: f32,
    pub count: usize,
    pub scale: f32,
    pub scale_mode: ScaleMode,
    pub randomized: bool,
    pub visible: bool,
    pub motion: Option<GroupMotion>,
}

impl Default for TermConfig {
    fn default() -> Self {
        Self {
            term: String::new(),
            color: "#ffffff".into(),
            diameter: 10.0,
            count: 100,
            scale: 0.8,
            scale_mode: ScaleMode::Constant,
            randomized: true,
            visible: true,
            motion: None,
        }
    }
}

impl TermConfig {
    /// The three terms the term field starts with
    pub fn defaults() -> Vec<TermConfig> {
        vec![
            TermConfig {
                term: "button".into(),
                color: "#00a3d7".into(),
                diameter: 12.0,
                count: 80,
                scale_mode: ScaleMode::Linear,
                ..Default::default()
            },
            TermConfig {
                term: "steward".into(),
                color: "#ff8300".into(),
                diameter: 8.0,
                randomized: false,
                ..Default::default()
            },
            TermConfig {
                term: "arthur".into(),
                color: "#00ff00".into(),
                diameter: 6.0,
                scale_mode: ScaleMode::Inverse,
                ..Default::default()
            },
        ]
    }

    pub fn to_search_term(&self) -> Result<SearchTerm> {
        let color: Color = self.color.parse()?;
        Ok(SearchTerm {
            term: self.term.clone(),
            color,
            diameter: self.diameter,
            count: self.count,
            scale: self.scale,
            scale_mode: self.scale_mode,
            randomized: self.randomized,
            visible: self.visible,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    pub damping: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping: 0.05,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangesConfig {
    /// Enabling a change mode disables the others
    pub exclusive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunerConfig {
    pub speed: f32,
    pub distance: f32,
    pub rotation_speed: f32,
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            distance: 8.0,
            rotation_speed: 0.5,
        }
    }
}

impl WordfieldConfig {
    /// Parse and validate config text. Validation failures are errors here.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: WordfieldConfig = toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;
        validate(&config)?;
        Ok(config)
    }

    /// Search terms in slot order
    pub fn search_terms(&self) -> Result<Vec<SearchTerm>> {
        self.terms.iter().map(TermConfig::to_search_term).collect()
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(ConfigError::ParseError(format!("failed to serialize: {e}"))))
    }
}

/// Load config from a TOML file.
///
/// Missing fields take their defaults. If the file parses but fails
/// validation, a warning is logged and the default config is returned.
pub fn load_from_path(path: &Path) -> Result<WordfieldConfig> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()).into());
    }

    let content = std::fs::read_to_string(path)?;
    let config: WordfieldConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validate(&config) {
        warn!("config validation warning: {e}");
        warn!("falling back to default config");
        return Ok(WordfieldConfig::default());
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &WordfieldConfig) -> std::result::Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if !(1..=120).contains(&config.fps) {
        errors.push(format!("fps must be between 1 and 120, got {}", config.fps));
    }

    if config.terms.len() > MAX_TERMS {
        errors.push(format!(
            "at most {MAX_TERMS} terms are supported, got {}",
            config.terms.len()
        ));
    }

    for (i, term) in config.terms.iter().enumerate() {
        if term.term.trim().is_empty() {
            errors.push(format!("terms[{i}].term must not be empty"));
        }
        if term.color.parse::<Color>().is_err() {
            errors.push(format!("terms[{i}].color: unrecognized color {:?}", term.color));
        }
        if term.diameter.is_nan() || term.diameter <= 0.0 {
            errors.push(format!("terms[{i}].diameter must be positive"));
        }
        if term.count > MAX_INSTANCES_PER_MATCH {
            errors.push(format!(
                "terms[{i}].count must be at most {MAX_INSTANCES_PER_MATCH}"
            ));
        }
        if !term.scale.is_finite() {
            errors.push(format!("terms[{i}].scale must be finite"));
        }
    }

    if !(0.0..=1.0).contains(&config.controls.damping) {
        errors.push("controls.damping must be between 0 and 1".into());
    }

    validate_range(&mut errors, "tuner.speed", config.tuner.speed, SPEED_RANGE);
    validate_range(&mut errors, "tuner.distance", config.tuner.distance, DISTANCE_RANGE);
    validate_range(
        &mut errors,
        "tuner.rotation_speed",
        config.tuner.rotation_speed,
        ROTATION_SPEED_RANGE,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_range(errors: &mut Vec<String>, name: &str, value: f32, (min, max): (f32, f32)) {
    if !(min..=max).contains(&value) {
        errors.push(format!("{name} must be between {min} and {max}, got {value}"));
    }
}
