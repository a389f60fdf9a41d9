use crate::projection::GeoBounds;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub projection: GeoBounds,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub color: ColorConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default = "default_municipalities")]
    pub municipalities: Vec<MunicipalityConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub map_image: PathBuf,
    pub population_tsv: PathBuf,
    #[serde(default = "default_territory_column")]
    pub territory_column: String,
    #[serde(default = "default_period_column")]
    pub period_column: String,
    #[serde(default = "default_value_column")]
    pub value_column: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnimationConfig {
    pub year_duration_ms: u64,
    pub frame_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ColorConfig {
    pub min: u32,
    pub max: u32,
    pub label_threshold: u32, // Names below this population are drawn in white
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub frame_dir: PathBuf,
    pub point_radius: u32,
    pub frame_width: Option<u32>,
    pub font: Option<PathBuf>, // Bundled DejaVu Sans Bold when unset
    pub label_size: f32,
    pub year_size: f32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MunicipalityConfig {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            year_duration_ms: 700,
            frame_interval_ms: 16,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            min: 500,
            max: 70_000,
            label_threshold: 6_000,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            frame_dir: PathBuf::from("output/frames"),
            point_radius: 50,
            frame_width: None,
            font: None,
            label_size: 32.5,
            year_size: 60.0,
        }
    }
}

impl InputConfig {
    pub fn new(map_image: impl Into<PathBuf>, population_tsv: impl Into<PathBuf>) -> Self {
        Self {
            map_image: map_image.into(),
            population_tsv: population_tsv.into(),
            territory_column: default_territory_column(),
            period_column: default_period_column(),
            value_column: default_value_column(),
        }
    }
}

impl AnimationConfig {
    pub fn year_duration(&self) -> Duration {
        Duration::from_millis(self.year_duration_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects static setups that would otherwise surface as NaN positions or
    /// a silent empty animation.
    pub fn validate(&self) -> Result<()> {
        self.projection.validate()?;
        if self.color.max <= self.color.min {
            anyhow::bail!(
                "Color scale max ({}) must be greater than min ({})",
                self.color.max,
                self.color.min
            );
        }
        if self.animation.year_duration_ms == 0 {
            anyhow::bail!("animation.year_duration_ms must be positive");
        }
        if self.output.frame_width == Some(0) {
            anyhow::bail!("output.frame_width must be positive");
        }
        if !(self.output.label_size > 0.0 && self.output.year_size > 0.0) {
            anyhow::bail!("output.label_size and output.year_size must be positive");
        }
        if self.municipalities.is_empty() {
            anyhow::bail!("No municipalities configured");
        }
        Ok(())
    }
}

fn default_territory_column() -> String {
    "TERRITORIO".to_string()
}

fn default_period_column() -> String {
    "TIME_PERIOD".to_string()
}

fn default_value_column() -> String {
    "OBS_VALUE".to_string()
}

/// Approximate town centres of the Gran Canaria municipalities.
pub fn default_municipalities() -> Vec<MunicipalityConfig> {
    [
        ("Agaete", 28.100, -15.700),
        ("Agüimes", 27.905, -15.450),
        ("Artenara", 28.020, -15.650),
        ("Arucas", 28.120, -15.520),
        ("Firgas", 28.100, -15.550),
        ("Gáldar", 28.150, -15.650),
        ("Ingenio", 27.930, -15.430),
        ("La Aldea de San Nicolás", 27.982132, -15.778562),
        ("Las Palmas de Gran Canaria", 28.123, -15.436),
        ("Mogán", 27.840, -15.740),
        ("Moya", 28.050, -15.550),
        ("San Bartolomé de Tirajana", 27.800, -15.550),
        ("Santa Brígida", 28.050, -15.450),
        ("Santa Lucía de Tirajana", 27.910, -15.500),
        ("Tejeda", 28.020, -15.583),
        ("Telde", 27.992, -15.405),
        ("Valsequillo de Gran Canaria", 28.039, -15.483),
        ("Vega de San Mateo", 28.030, -15.533),
    ]
    .into_iter()
    .map(|(name, lat, lon)| MunicipalityConfig {
        name: name.to_string(),
        lat,
        lon,
    })
    .collect()
}
