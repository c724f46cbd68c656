use crate::{Destination, DestinationId};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One row as it appears in the catalog file, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRow {
    #[serde(rename = "City", alias = "city")]
    pub city: String,
    #[serde(rename = "Country", alias = "country")]
    pub country: String,
    #[serde(rename = "Description", alias = "description")]
    pub description: String,
    #[serde(rename = "Avg_Cost", alias = "avg_cost")]
    pub avg_cost: f64,
    #[serde(rename = "Best_Time_to_Travel", alias = "best_time")]
    pub best_time: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("malformed CSV row in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("malformed JSON row in {path} (line {line}): {source}")]
    Json { path: PathBuf, line: usize, source: serde_json::Error },

    #[error("malformed JSON document {path}: {source}")]
    JsonDocument { path: PathBuf, source: serde_json::Error },

    #[error("malformed JSON row in {path} (element {element}): {source}")]
    JsonElement { path: PathBuf, element: usize, source: serde_json::Error },

    #[error("unsupported catalog format {0:?} (expected .csv, .json or .jsonl)")]
    UnsupportedFormat(PathBuf),

    #[error("row {row}: field `{field}` is empty")]
    EmptyField { row: usize, field: &'static str },

    #[error("row {row}: Avg_Cost must be a finite non-negative number, got {value}")]
    InvalidCost { row: usize, value: f64 },

    #[error("catalog has no destinations")]
    Empty,
}

/// The fixed, validated set of destinations. Loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    destinations: Vec<Destination>,
}

impl Catalog {
    /// Load a catalog file; the format is chosen from the extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let rows = match path.extension().and_then(|s| s.to_str()) {
            Some("csv") => read_csv(path)?,
            Some("jsonl") => read_jsonl(path)?,
            Some("json") => read_json(path)?,
            _ => return Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        };
        let catalog = Self::from_rows(rows)?;
        tracing::info!(path = %path.display(), destinations = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    /// Validate rows and assign ids in row order.
    pub fn from_rows(rows: Vec<CatalogRow>) -> Result<Self, CatalogError> {
        if rows.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut destinations = Vec::with_capacity(rows.len());
        for (pos, row) in rows.into_iter().enumerate() {
            // 1-based for error messages
            let n = pos + 1;
            for (field, value) in [("City", &row.city), ("Country", &row.country), ("Description", &row.description)] {
                if value.trim().is_empty() {
                    return Err(CatalogError::EmptyField { row: n, field });
                }
            }
            if !row.avg_cost.is_finite() || row.avg_cost < 0.0 {
                return Err(CatalogError::InvalidCost { row: n, value: row.avg_cost });
            }
            destinations.push(Destination {
                id: pos as DestinationId,
                city: row.city.trim().to_string(),
                country: row.country.trim().to_string(),
                description: row.description,
                // folds -0.0 into 0.0
                avg_cost: row.avg_cost + 0.0,
                best_time: row.best_time.trim().to_string(),
            });
        }
        Ok(Self { destinations })
    }

    pub fn get(&self, id: DestinationId) -> Option<&Destination> {
        self.destinations.get(id as usize)
    }

    pub fn destinations(&self) -> &[Destination] { &self.destinations }

    pub fn len(&self) -> usize { self.destinations.len() }

    pub fn is_empty(&self) -> bool { self.destinations.is_empty() }

    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.destinations.iter().map(|d| d.description.as_str())
    }

    /// Distinct countries in first-seen order.
    pub fn countries(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for d in &self.destinations {
            if !out.iter().any(|c| crate::same_country(c, &d.country)) {
                out.push(&d.country);
            }
        }
        out
    }
}

fn read_csv(path: &Path) -> Result<Vec<CatalogRow>, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|source| CatalogError::Csv { path: path.to_path_buf(), source })?;
    let mut rows = Vec::new();
    for rec in reader.deserialize::<CatalogRow>() {
        rows.push(rec.map_err(|source| CatalogError::Csv { path: path.to_path_buf(), source })?);
    }
    Ok(rows)
}

fn read_jsonl(path: &Path) -> Result<Vec<CatalogRow>, CatalogError> {
    let f = File::open(path).map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
    let mut rows = Vec::new();
    for (i, line) in BufReader::new(f).lines().enumerate() {
        let line = line.map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
        if line.trim().is_empty() { continue; }
        let row = serde_json::from_str(&line)
            .map_err(|source| CatalogError::Json { path: path.to_path_buf(), line: i + 1, source })?;
        rows.push(row);
    }
    Ok(rows)
}

fn read_json(path: &Path) -> Result<Vec<CatalogRow>, CatalogError> {
    let f = File::open(path).map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(f))
        .map_err(|source| CatalogError::JsonDocument { path: path.to_path_buf(), source })?;
    let to_row = |element: usize, v: serde_json::Value| {
        serde_json::from_value::<CatalogRow>(v)
            .map_err(|source| CatalogError::JsonElement { path: path.to_path_buf(), element, source })
    };
    match json {
        serde_json::Value::Array(arr) => arr.into_iter().enumerate().map(|(i, v)| to_row(i, v)).collect(),
        obj @ serde_json::Value::Object(_) => Ok(vec![to_row(0, obj)?]),
        _ => Ok(Vec::new()),
    }
}
