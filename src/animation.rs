//! Year cycling driven by host frame ticks.
//!
//! The host calls [`YearCycleAnimator::tick`] once per rendered frame with the
//! time elapsed since it started. The visible year only changes once a full
//! period has passed since the previous change, so the cycle is independent of
//! frame rate but may lag by up to one frame per step.

use crate::color::{ColorScale, WHITE};
use crate::error::TimelapseError;
use crate::scene::SceneDataset;
use image::Rgb;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Showing { index: usize },
}

/// Cursor into the year set plus the time of the last change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationState {
    pub phase: Phase,
    pub last_transition: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub index: usize,
    pub year: i32,
    /// Points whose colour was updated; the rest had no data for `year`.
    pub recolored: usize,
}

pub struct YearCycleAnimator {
    dataset: Arc<SceneDataset>,
    scale: ColorScale,
    period: Duration,
    state: AnimationState,
    colors: Vec<Rgb<u8>>,
    overlay: String,
}

impl YearCycleAnimator {
    pub fn new(
        dataset: Arc<SceneDataset>,
        scale: ColorScale,
        period: Duration,
    ) -> Result<Self, TimelapseError> {
        if dataset.series.is_empty() {
            return Err(TimelapseError::EmptyYearSet);
        }
        let colors = vec![WHITE; dataset.points.len()];
        Ok(Self {
            dataset,
            scale,
            period,
            state: AnimationState {
                phase: Phase::Idle,
                last_transition: Duration::ZERO,
            },
            colors,
            overlay: String::new(),
        })
    }

    /// Advances the cycle if due. Returns the transition that happened, if any.
    pub fn tick(&mut self, now: Duration) -> Option<Transition> {
        let next = match self.state.phase {
            Phase::Idle => 0,
            Phase::Showing { index } => {
                if now.saturating_sub(self.state.last_transition) < self.period {
                    return None;
                }
                (index + 1) % self.dataset.series.years().len()
            }
        };

        self.state = AnimationState {
            phase: Phase::Showing { index: next },
            last_transition: now,
        };
        Some(self.show(next))
    }

    fn show(&mut self, index: usize) -> Transition {
        let year = self.dataset.series.years()[index];
        let mut recolored = 0;

        for (point, color) in self.dataset.points.iter().zip(self.colors.iter_mut()) {
            if let Some(pop) = self.dataset.series.population(&point.municipality, year) {
                *color = self.scale.color_of(pop);
                recolored += 1;
            }
        }
        self.overlay = year.to_string();

        debug!(year, index, recolored, "Showing year");
        Transition {
            index,
            year,
            recolored,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn current_year(&self) -> Option<i32> {
        match self.state.phase {
            Phase::Idle => None,
            Phase::Showing { index } => Some(self.dataset.series.years()[index]),
        }
    }

    /// Marker colours, parallel to the dataset's points.
    pub fn colors(&self) -> &[Rgb<u8>] {
        &self.colors
    }

    pub fn overlay_text(&self) -> &str {
        &self.overlay
    }
}
