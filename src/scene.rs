use crate::color::ColorScale;
use crate::config::AppConfig;
use crate::data::{self, PopulationSeries};
use crate::projection::{GeoProjector, Surface};
use crate::types::{Municipality, ScreenPoint};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// Everything the animator reads, assembled once both assets are loaded.
#[derive(Debug, Clone)]
pub struct SceneDataset {
    pub series: PopulationSeries,
    pub surface: Surface,
    pub points: Vec<ScreenPoint>,
}

impl SceneDataset {
    pub fn build(config: &AppConfig, series: PopulationSeries, surface: Surface) -> Result<Self> {
        let projector = GeoProjector::new(config.projection, surface)?;
        let scale = ColorScale::from(&config.color);
        let latest_year = series.latest_year();

        let points: Vec<ScreenPoint> = config
            .municipalities
            .iter()
            .map(Municipality::from)
            .map(|m| {
                let position = projector.project(m.position.y(), m.position.x());
                let latest = latest_year.and_then(|year| series.population(&m.name, year));
                debug!(municipality = %m.name, x = position.x, y = position.y, "Projected municipality");
                ScreenPoint {
                    label_color: scale.label_color(latest),
                    municipality: m.name,
                    position,
                }
            })
            .collect();

        let unmatched = points
            .iter()
            .filter(|p| !series.territories().any(|t| t == p.municipality))
            .count();
        if unmatched > 0 {
            info!(unmatched, "Some municipalities have no rows in the population table");
        }

        Ok(Self {
            series,
            surface,
            points,
        })
    }
}

/// Reads the map image dimensions and the population table concurrently.
/// The dataset is only built once both have loaded.
pub async fn load_scene(config: &AppConfig) -> Result<SceneDataset> {
    let image_path = config.input.map_image.clone();
    let input = config.input.clone();

    let image_task = tokio::task::spawn_blocking(move || read_map_dimensions(image_path));
    let table_task = tokio::task::spawn_blocking(move || data::load_population(&input));

    let (dimensions, series) = tokio::try_join!(image_task, table_task)
        .context("Asset loading task panicked")?;
    let (width, height) = dimensions?;
    let series = series?;

    info!(width, height, "Loaded map image");
    SceneDataset::build(config, series, Surface::new(width, height))
}

fn read_map_dimensions(path: PathBuf) -> Result<(u32, u32)> {
    image::image_dimensions(&path).with_context(|| format!("Failed to read map image: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_municipalities, InputConfig};
    use crate::data::parse_population;
    use crate::color::{BLACK, WHITE};

    fn config() -> AppConfig {
        toml::from_str(
            r#"
            [input]
            map_image = "map.png"
            population_tsv = "pop.tsv"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn one_point_per_configured_municipality() {
        let series = PopulationSeries::default();
        let scene = SceneDataset::build(&config(), series, Surface::new(1942, 2046)).unwrap();
        assert_eq!(scene.points.len(), default_municipalities().len());
        assert!(scene
            .points
            .iter()
            .all(|p| p.position.x.abs() <= 971.0 && p.position.y.abs() <= 1023.0));
    }

    #[test]
    fn label_colour_follows_latest_year() {
        let text = "TERRITORIO\tTIME_PERIOD\tOBS_VALUE\n\
                    Telde\t2015\t5000\n\
                    Telde\t2020\t102000\n\
                    Tejeda\t2015\t2000\n";
        let series = parse_population(text, &InputConfig::new("m", "p")).unwrap();
        let scene = SceneDataset::build(&config(), series, Surface::new(100, 100)).unwrap();

        let label = |name: &str| {
            scene
                .points
                .iter()
                .find(|p| p.municipality == name)
                .map(|p| p.label_color)
        };
        assert_eq!(label("Telde"), Some(BLACK));
        // No 2020 row for Tejeda
        assert_eq!(label("Tejeda"), Some(WHITE));
    }
}
