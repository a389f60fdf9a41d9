//! Linear projection of geographic coordinates onto the map surface.
//!
//! Offsets are centred on the surface with y pointing up (north), matching the
//! scene the map plane lives in. [`Surface::to_pixel`] flips back to image rows.

use crate::error::TimelapseError;
use geo::Coord;
use serde::Deserialize;

/// Geographic box the map image covers, in degrees.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl Default for GeoBounds {
    fn default() -> Self {
        // Gran Canaria
        Self {
            min_lon: -15.8402,
            max_lon: -15.3562,
            min_lat: 27.7303,
            max_lat: 28.1828,
        }
    }
}

impl GeoBounds {
    pub fn validate(&self) -> Result<(), TimelapseError> {
        // Written as negations so NaN bounds are rejected as well.
        if !(self.max_lon > self.min_lon) {
            return Err(TimelapseError::DegenerateBounds { axis: "lon" });
        }
        if !(self.max_lat > self.min_lat) {
            return Err(TimelapseError::DegenerateBounds { axis: "lat" });
        }
        Ok(())
    }
}

/// Target coordinate space, sized after the map image in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
        }
    }

    /// Converts a centred, y-up offset into image pixel coordinates.
    pub fn to_pixel(&self, offset: Coord<f64>) -> Coord<f64> {
        Coord {
            x: offset.x + self.width / 2.0,
            y: self.height / 2.0 - offset.y,
        }
    }
}

/// Maps `(lat, lon)` to an offset from the centre of a `width` x `height` surface.
///
/// Values outside `bounds` extrapolate linearly; nothing is clamped.
pub fn project(bounds: &GeoBounds, lat: f64, lon: f64, width: f64, height: f64) -> Coord<f64> {
    let x = (lon - bounds.min_lon) / (bounds.max_lon - bounds.min_lon) * width - width / 2.0;
    let y = (lat - bounds.min_lat) / (bounds.max_lat - bounds.min_lat) * height - height / 2.0;
    Coord { x, y }
}

#[derive(Debug, Clone, Copy)]
pub struct GeoProjector {
    bounds: GeoBounds,
    surface: Surface,
}

impl GeoProjector {
    pub fn new(bounds: GeoBounds, surface: Surface) -> Result<Self, TimelapseError> {
        bounds.validate()?;
        Ok(Self { bounds, surface })
    }

    pub fn project(&self, lat: f64, lon: f64) -> Coord<f64> {
        project(&self.bounds, lat, lon, self.surface.width, self.surface.height)
    }
}
