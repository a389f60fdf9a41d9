use crate::animation::YearCycleAnimator;
use crate::color::{ColorScale, BLACK};
use crate::config::{AppConfig, OutputConfig};
use crate::scene::SceneDataset;
use ab_glyph::{FontArc, PxScale};
use anyhow::{anyhow, Context, Result};
use image::imageops::{self, FilterType};
use image::{Rgb, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_text_mut, text_size};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

static BUNDLED_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

/// Output size of the rendering surface. Resizing only changes the aspect the
/// host draws with; projected positions stay in map-image space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height.max(1) as f64
    }

    /// Returns the new aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) -> f64 {
        self.width = width;
        self.height = height;
        self.aspect()
    }

    pub fn scaled_to_width(&self, width: u32) -> Self {
        let mut scaled = *self;
        let height = (width as f64 / self.aspect()).round().max(1.0) as u32;
        scaled.resize(width, height);
        scaled
    }
}

struct Frame {
    index: usize,
    year: i32,
    overlay: String,
    colors: Vec<Rgb<u8>>,
}

/// Font and sizes shared by every frame.
pub struct FrameStyle {
    pub font: FontArc,
    pub point_radius: u32,
    pub label_size: f32,
    pub year_size: f32,
}

impl FrameStyle {
    pub fn from_config(output: &OutputConfig) -> Result<Self> {
        Ok(Self {
            font: load_font(output.font.as_deref())?,
            point_radius: output.point_radius,
            label_size: output.label_size,
            year_size: output.year_size,
        })
    }
}

pub fn load_font(path: Option<&Path>) -> Result<FontArc> {
    match path {
        Some(path) => {
            let bytes = fs::read(path).with_context(|| format!("Failed to read font: {:?}", path))?;
            FontArc::try_from_vec(bytes).map_err(|e| anyhow!("Invalid font {:?}: {}", path, e))
        }
        None => FontArc::try_from_slice(BUNDLED_FONT)
            .map_err(|e| anyhow!("Bundled font is invalid: {}", e)),
    }
}

/// Renders one frame per year of a full cycle and returns the written paths.
pub fn render_frames(
    config: &AppConfig,
    dataset: Arc<SceneDataset>,
    map: &RgbaImage,
) -> Result<Vec<PathBuf>> {
    let style = FrameStyle::from_config(&config.output)?;
    let period = config.animation.year_duration();
    let mut animator =
        YearCycleAnimator::new(Arc::clone(&dataset), ColorScale::from(&config.color), period)?;

    // Step the animator on synthetic timestamps so colours carry over exactly
    // as they would on screen when a year has no data.
    let years = dataset.series.years().len();
    let mut frames = Vec::with_capacity(years);
    for step in 0..years as u32 {
        if let Some(transition) = animator.tick(period * step) {
            frames.push(Frame {
                index: transition.index,
                year: transition.year,
                overlay: animator.overlay_text().to_string(),
                colors: animator.colors().to_vec(),
            });
        }
    }

    let viewport = Viewport::new(map.width(), map.height());
    let output = match config.output.frame_width {
        Some(width) => viewport.scaled_to_width(width),
        None => viewport,
    };

    fs::create_dir_all(&config.output.frame_dir)
        .with_context(|| format!("Failed to create frame directory: {:?}", config.output.frame_dir))?;

    info!(
        frames = frames.len(),
        width = output.width,
        height = output.height,
        "Rendering frames"
    );

    let paths = frames
        .par_iter()
        .map(|frame| -> Result<PathBuf> {
            let mut img = map.clone();
            draw_frame(&mut img, &dataset, &frame.colors, &frame.overlay, &style);

            if output != viewport {
                img = imageops::resize(&img, output.width, output.height, FilterType::Triangle);
            }

            let path = config
                .output
                .frame_dir
                .join(format!("{:03}_{}.png", frame.index, frame.year));
            img.save(&path)
                .with_context(|| format!("Failed to save frame {:?}", path))?;
            Ok(path)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(paths)
}

/// Markers, then their name labels, then the year overlay at the map centre.
pub fn draw_frame(
    img: &mut RgbaImage,
    dataset: &SceneDataset,
    colors: &[Rgb<u8>],
    overlay: &str,
    style: &FrameStyle,
) {
    let radius = style.point_radius as i32;
    let centres: Vec<(i32, i32)> = dataset
        .points
        .iter()
        .map(|point| {
            let c = dataset.surface.to_pixel(point.position);
            (c.x.round() as i32, c.y.round() as i32)
        })
        .collect();

    for ((point, color), &centre) in dataset.points.iter().zip(colors).zip(&centres) {
        if !marker_visible(img, centre, radius) {
            warn!(municipality = %point.municipality, "Marker lies outside the map image");
            continue;
        }
        draw_filled_circle_mut(img, centre, radius, opaque(*color));
    }

    for (point, &centre) in dataset.points.iter().zip(&centres) {
        draw_centered_text(img, &style.font, style.label_size, centre, point.label_color, &point.municipality);
    }

    let middle = (img.width() as i32 / 2, img.height() as i32 / 2);
    draw_centered_text(img, &style.font, style.year_size, middle, BLACK, overlay);
}

fn draw_centered_text(
    img: &mut RgbaImage,
    font: &FontArc,
    size: f32,
    centre: (i32, i32),
    color: Rgb<u8>,
    text: &str,
) {
    let scale = PxScale::from(size);
    let (w, h) = text_size(scale, font, text);
    let x = centre.0 - w as i32 / 2;
    let y = centre.1 - h as i32 / 2;
    draw_text_mut(img, opaque(color), x, y, scale, font, text);
}

fn marker_visible(img: &RgbaImage, (cx, cy): (i32, i32), radius: i32) -> bool {
    cx + radius >= 0
        && cy + radius >= 0
        && cx - radius < img.width() as i32
        && cy - radius < img.height() as i32
}

fn opaque(Rgb([r, g, b]): Rgb<u8>) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}
