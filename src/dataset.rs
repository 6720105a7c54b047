//! Loading and standardizing the observation table.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};

use crate::error::{Error, Result};

/// Tokens treated as a missing measurement (matched case-insensitively).
const MISSING_TOKENS: [&str; 4] = ["", "na", "n/a", "nan"];

/// A named observation table: one id and one feature row per observation.
///
/// Built from CSV where the first column holds the observation id and every
/// remaining column holds one numeric feature. Rows containing a missing
/// token (`""`, `na`, `n/a`, `nan`, any case) are dropped with a warning;
/// any other non-numeric cell is an error, as is a duplicated id.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    ids: Vec<String>,
    features: Vec<Vec<f32>>,
    columns: Vec<String>,
}

impl Dataset {
    /// Build a dataset from already-parsed parts.
    ///
    /// Validates that every feature row matches the column count, that at
    /// least one row and one column remain, and that ids are unique.
    pub fn new(ids: Vec<String>, features: Vec<Vec<f32>>, columns: Vec<String>) -> Result<Self> {
        if ids.is_empty() || columns.is_empty() {
            return Err(Error::EmptyInput);
        }
        if ids.len() != features.len() {
            return Err(Error::DimensionMismatch {
                expected: ids.len(),
                found: features.len(),
            });
        }
        for row in &features {
            if row.len() != columns.len() {
                return Err(Error::DimensionMismatch {
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        let mut seen = HashSet::new();
        for (row, id) in ids.iter().enumerate() {
            if !seen.insert(id.as_str()) {
                return Err(Error::DuplicateIdentifier {
                    id: id.clone(),
                    row: row + 1,
                });
            }
        }
        Ok(Self {
            ids,
            features,
            columns,
        })
    }

    /// Load a dataset from a CSV file on disk.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let dataset = Self::from_reader(std::io::BufReader::new(file))?;
        debug!(
            "loaded {} observations x {} features from {}",
            dataset.len(),
            dataset.n_features(),
            path.as_ref().display()
        );
        Ok(dataset)
    }

    /// Load a dataset from any CSV reader.
    ///
    /// The first row must be a header; the first column names each
    /// observation.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
        if columns.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut ids = Vec::new();
        let mut features = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut dropped = 0usize;

        for (index, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row = index + 1;
            let id = record.get(0).unwrap_or_default().to_string();

            let mut values = Vec::with_capacity(columns.len());
            let mut missing_in: Option<usize> = None;
            for (col, cell) in record.iter().skip(1).enumerate() {
                if is_missing(cell) {
                    missing_in = Some(col);
                    break;
                }
                let value: f32 = cell.parse().map_err(|_| Error::NonNumericValue {
                    column: columns[col].clone(),
                    row,
                    value: cell.to_string(),
                })?;
                if !value.is_finite() {
                    return Err(Error::NonNumericValue {
                        column: columns[col].clone(),
                        row,
                        value: cell.to_string(),
                    });
                }
                values.push(value);
            }
            if let Some(col) = missing_in {
                warn!(
                    "dropping row {row} (id {id:?}): missing value in column {:?}",
                    columns[col]
                );
                dropped += 1;
                continue;
            }

            if !seen.insert(id.clone()) {
                return Err(Error::DuplicateIdentifier { id, row });
            }
            ids.push(id);
            features.push(values);
        }

        if dropped > 0 {
            warn!("dropped {dropped} of {} rows with missing values", ids.len() + dropped);
        }
        if ids.is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(Self {
            ids,
            features,
            columns,
        })
    }

    /// Observation identifiers, in input order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// The raw feature rows.
    pub fn features(&self) -> &[Vec<f32>] {
        &self.features
    }

    /// Feature column names, in input order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the dataset holds no observations.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of feature columns.
    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    /// Z-score standardized copy of the feature matrix.
    ///
    /// Each column is centered on its mean and scaled by its sample
    /// standard deviation. Constant columns (and all columns when only one
    /// observation remains) become all zeros rather than NaN.
    pub fn standardized(&self) -> Vec<Vec<f32>> {
        let n = self.features.len();
        let m = self.columns.len();
        let mut means = vec![0.0f64; m];
        for row in &self.features {
            for (mean, &x) in means.iter_mut().zip(row.iter()) {
                *mean += f64::from(x);
            }
        }
        for mean in means.iter_mut() {
            *mean /= n as f64;
        }

        let mut stds = vec![0.0f64; m];
        if n > 1 {
            for row in &self.features {
                for ((std, &mean), &x) in stds.iter_mut().zip(means.iter()).zip(row.iter()) {
                    let d = f64::from(x) - mean;
                    *std += d * d;
                }
            }
            for std in stds.iter_mut() {
                *std = (*std / (n - 1) as f64).sqrt();
            }
        }

        self.features
            .iter()
            .map(|row| {
                row.iter()
                    .zip(means.iter().zip(stds.iter()))
                    .map(|(&x, (&mean, &std))| {
                        if std > 1e-12 {
                            ((f64::from(x) - mean) / std) as f32
                        } else {
                            0.0
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS
        .iter()
        .any(|token| cell.eq_ignore_ascii_case(token))
}
