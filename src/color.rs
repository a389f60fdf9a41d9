use crate::config::ColorConfig;
use image::Rgb;

pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Ramp from dark (small towns) through green (mid-range) to red (largest).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min: u32,
    pub max: u32,
    pub label_threshold: u32,
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::from(&ColorConfig::default())
    }
}

impl From<&ColorConfig> for ColorScale {
    fn from(config: &ColorConfig) -> Self {
        Self {
            min: config.min,
            max: config.max,
            label_threshold: config.label_threshold,
        }
    }
}

impl ColorScale {
    pub fn color_of(&self, population: u32) -> Rgb<u8> {
        if population >= self.max {
            return RED;
        }
        // Negative below `min`; the channel clamps take care of it.
        let t = (population as f64 - self.min as f64) / (self.max as f64 - self.min as f64);
        let r = channel(255.0 * t);
        let g = channel(255.0 * (1.0 - (t - 0.5).abs() * 2.0));
        Rgb([r, g, 0])
    }

    /// Text colour for a municipality name, chosen from its latest known population.
    pub fn label_color(&self, latest_population: Option<u32>) -> Rgb<u8> {
        if latest_population.unwrap_or(0) < self.label_threshold {
            WHITE
        } else {
            BLACK
        }
    }
}

fn channel(v: f64) -> u8 {
    v.clamp(0.0, 255.0) as u8
}
