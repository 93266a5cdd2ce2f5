use directories::ProjectDirs;
use piesection::{AngularSection, SectionError};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::f64::consts::TAU;
use std::path::{Path, PathBuf};
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum PieUnit {
    #[default]
    #[strum(to_string = "degrees", serialize = "deg")]
    Degrees,
    #[strum(to_string = "radians", serialize = "rad")]
    Radians,
    #[strum(to_string = "turns", serialize = "turn", serialize = "rev")]
    Turns,
    #[strum(to_string = "gradians", serialize = "grad", serialize = "gon")]
    Gradians,
}

impl PieUnit {
    pub fn full_turn(&self) -> f64 {
        match self {
            PieUnit::Degrees => 360.0,
            PieUnit::Radians => TAU,
            PieUnit::Turns => 1.0,
            PieUnit::Gradians => 400.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SectionConfig {
    pub section_size: f64,
    /// Overrides the full turn of `unit` when set.
    #[serde(default)]
    pub pie_size: Option<f64>,
    #[serde(default)]
    pub unit: PieUnit,
    #[serde(default)]
    pub center: Option<f64>,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            section_size: 90.0,
            pie_size: None,
            unit: PieUnit::Degrees,
            center: None,
        }
    }
}

impl SectionConfig {
    pub fn pie_size(&self) -> f64 {
        self.pie_size.unwrap_or_else(|| self.unit.full_turn())
    }

    /// Applies command line values on top of the loaded ones. A new `unit`
    /// drops the loaded `pie_size` unless one is given alongside it.
    pub fn apply_overrides(
        &mut self,
        section_size: Option<f64>,
        pie_size: Option<f64>,
        unit: Option<PieUnit>,
        center: Option<f64>,
    ) {
        if let Some(section_size) = section_size {
            self.section_size = section_size;
        }
        if let Some(unit) = unit {
            self.unit = unit;
            self.pie_size = None;
        }
        if pie_size.is_some() {
            self.pie_size = pie_size;
        }
        if center.is_some() {
            self.center = center;
        }
    }

    pub fn build(&self) -> Result<AngularSection, SectionError> {
        let mut section = AngularSection::new(self.section_size, self.pie_size())?;
        if let Some(center) = self.center {
            if !center.is_finite() {
                return Err(SectionError::InvalidConfiguration {
                    section_size: self.section_size,
                    pie_size: self.pie_size(),
                    reason: "center must be finite",
                });
            }
            section.set_center(center);
        }
        Ok(section)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Section(#[from] SectionError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub const ENV_PREFIX: &str = "PIEDIAL";

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "piesection", "piedial").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<SectionConfig, ConfigError> {
    load_from_path(&get_config_path()?)
}

/// Reads `path` if it exists, then applies `PIEDIAL_*` environment overrides.
/// The section itself is checked later by [`SectionConfig::build`], once any
/// command line overrides are in.
pub fn load_from_path(path: &Path) -> Result<SectionConfig, ConfigError> {
    log::debug!("Loading config from {}", path.display());

    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> SectionConfig {
    match get_config_path() {
        Ok(path) => load_or_default_from(&path),
        Err(e) => {
            log::warn!("Falling back to the default section: {}", e);
            SectionConfig::default()
        }
    }
}

/// Loads `path`, falling back to the default section when the file cannot be
/// read or describes an invalid section.
pub fn load_or_default_from(path: &Path) -> SectionConfig {
    let loaded = load_from_path(path).and_then(|c| {
        c.build()?;
        Ok(c)
    });

    match loaded {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Falling back to the default section: {}", e);
            SectionConfig::default()
        }
    }
}

pub fn write_default_config() -> Result<PathBuf, ConfigError> {
    let path = get_config_path()?;
    write_default_config_to(&path)?;
    Ok(path)
}

/// Writes the default config to `path` unless a file is already there.
pub fn write_default_config_to(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(())
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");
