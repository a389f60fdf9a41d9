//! Error types for loading and animating the population timelapse.

use thiserror::Error;

/// Errors raised while parsing the time series or validating the static setup.
#[derive(Debug, Error)]
pub enum TimelapseError {
    /// A required header column is absent from the tabular input.
    #[error("Column '{0}' not found in population table")]
    MissingColumn(String),

    /// A year or observation value could not be read as an integer.
    #[error("Line {line}: column '{column}' holds '{value}', expected an integer")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },

    /// A row has no territory name to join on.
    #[error("Line {line}: empty territory name")]
    EmptyTerritory { line: u64 },

    /// Data loaded fine but contains no years, so there is nothing to cycle.
    #[error("Population table contains no years; animation cannot start")]
    EmptyYearSet,

    /// The projection bounding box has zero (or negative) extent on one axis.
    #[error("Degenerate geographic bounds: {axis} range is empty")]
    DegenerateBounds { axis: &'static str },

    #[error("Malformed population table: {0}")]
    Csv(#[from] csv::Error),
}

impl TimelapseError {
    pub fn invalid_number(line: u64, column: &str, value: &str) -> Self {
        Self::InvalidNumber {
            line,
            column: column.to_string(),
            value: value.to_string(),
        }
    }
}
