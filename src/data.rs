use crate::config::InputConfig;
use crate::error::TimelapseError;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use tracing::info;

/// Population by territory then year, plus the ascending list of years seen.
#[derive(Debug, Clone, Default)]
pub struct PopulationSeries {
    // Map<Territory, Map<Year, Population>>
    by_territory: HashMap<String, BTreeMap<i32, u32>>,
    years: Vec<i32>,
}

impl PopulationSeries {
    /// `None` means "no data", which is distinct from a recorded zero.
    pub fn population(&self, territory: &str, year: i32) -> Option<u32> {
        self.by_territory.get(territory)?.get(&year).copied()
    }

    /// Distinct years, strictly ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.years.last().copied()
    }

    pub fn territories(&self) -> impl Iterator<Item = &str> {
        self.by_territory.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

pub fn load_population(input: &InputConfig) -> Result<PopulationSeries> {
    let path = &input.population_tsv;
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read population table: {:?}", path))?;
    let series = parse_population(&text, input)
        .with_context(|| format!("Failed to parse population table: {:?}", path))?;

    info!(
        territories = series.by_territory.len(),
        years = series.years.len(),
        path = %path.display(),
        "Loaded population table"
    );
    Ok(series)
}

/// Parses tab-separated observations. Any malformed row rejects the whole table.
pub fn parse_population(text: &str, input: &InputConfig) -> Result<PopulationSeries, TimelapseError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(text.as_bytes());
    let headers = rdr.headers()?.clone();

    let territory_idx = column_index(&headers, &input.territory_column)?;
    let period_idx = column_index(&headers, &input.period_column)?;
    let value_idx = column_index(&headers, &input.value_column)?;

    let mut by_territory: HashMap<String, BTreeMap<i32, u32>> = HashMap::new();
    let mut years = BTreeSet::new();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let territory = field(&record, territory_idx).trim();
        if territory.is_empty() {
            return Err(TimelapseError::EmptyTerritory { line });
        }

        let raw_year = field(&record, period_idx);
        let year: i32 = raw_year
            .trim()
            .parse()
            .map_err(|_| TimelapseError::invalid_number(line, &input.period_column, raw_year))?;

        let raw_value = field(&record, value_idx);
        let value: u32 = raw_value
            .trim()
            .parse()
            .map_err(|_| TimelapseError::invalid_number(line, &input.value_column, raw_value))?;

        // Repeated (territory, year) rows: last one wins.
        by_territory
            .entry(territory.to_string())
            .or_default()
            .insert(year, value);
        years.insert(year);
    }

    Ok(PopulationSeries {
        by_territory,
        years: years.into_iter().collect(),
    })
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize, TimelapseError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| TimelapseError::MissingColumn(name.to_string()))
}

fn field(record: &StringRecord, idx: usize) -> &str {
    // The reader is not flexible, so every record has the header's width.
    record.get(idx).unwrap_or("")
}
