use crate::config::MunicipalityConfig;
use geo::{Coord, Point};
use image::Rgb;

#[derive(Debug, Clone, PartialEq)]
pub struct Municipality {
    pub name: String,
    pub position: Point<f64>, // x = lon, y = lat
}

impl From<&MunicipalityConfig> for Municipality {
    fn from(config: &MunicipalityConfig) -> Self {
        Self {
            name: config.name.clone(),
            position: Point::new(config.lon, config.lat),
        }
    }
}

/// A municipality marker placed on the map surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenPoint {
    pub municipality: String,
    pub position: Coord<f64>, // Centred offset, y up
    pub label_color: Rgb<u8>,
}
