// This file is part of midnight-ledger.
// Copyright (C) 2025 Midnight Foundation
// SPDX-License-Identifier: Apache-2.0
// Licensed under the Apache License, Version 2.0 (the "License");
// You may not use this file except in compliance with the License.
// You may obtain a copy of the License at
// http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Parsing of the benchmark results CSV.
//!
//! # Expected CSV Format
//! ```text
//! Algorithm,DataType,DataSize,Time_ms,Comparisons,Verified
//! Quick Sort,Random,1000,0.084,11263,true
//! Quick Sort,Random,10000,1.02,154035,true
//! ```
//!
//! Column order is free and extra columns are ignored. A header missing any
//! of [`REQUIRED_COLUMNS`] is fatal; a row that fails to parse is skipped.

use crate::error::ReportError;
use crate::series::{Sample, Series, SeriesKey};
use csv::{ReaderBuilder, StringRecord, Trim};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Algorithm",
    "DataType",
    "DataSize",
    "Time_ms",
    "Comparisons",
    "Verified",
];

/// One parsed line of the results file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BenchmarkRow {
    #[serde(rename = "Algorithm")]
    pub algorithm: String,
    #[serde(rename = "DataType")]
    pub data_type: String,
    #[serde(rename = "DataSize")]
    pub data_size: u64,
    #[serde(rename = "Time_ms")]
    pub time_ms: f64,
    #[serde(rename = "Comparisons")]
    pub comparisons: u64,
    #[serde(rename = "Verified", deserialize_with = "deserialize_verified")]
    pub verified: bool,
}

/// Anything other than a case-insensitive `true` counts as unverified.
fn deserialize_verified<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(s.eq_ignore_ascii_case("true"))
}

/// A benchmark run whose output failed the sortedness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnverifiedRun {
    pub algorithm: String,
    pub data_type: String,
    pub size: u64,
}

/// All benchmark results of one run, grouped into one [`Series`] per
/// (algorithm, data type).
///
/// Every series is laid out on the same size axis: the sorted, deduplicated
/// set of sizes seen anywhere in the input. Sizes a series has no row for
/// are kept as missing samples.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkTable {
    algorithms: IndexSet<String>,
    data_types: IndexSet<String>,
    sizes: Vec<u64>,
    series: IndexMap<SeriesKey, Series>,
    unverified: Vec<UnverifiedRun>,
    skipped_rows: usize,
}

impl BenchmarkTable {
    /// Load a results file from disk.
    pub fn from_path(path: &Path) -> Result<Self, ReportError> {
        if !path.is_file() {
            return Err(ReportError::MissingInputFile(path.to_path_buf()));
        }
        info!("Reading benchmark results from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReportError> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let headers = reader.headers()?.clone();
        check_headers(&headers)?;

        let mut rows = Vec::new();
        let mut skipped_rows = 0;
        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable row");
                    skipped_rows += 1;
                    continue;
                }
            };
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            match parse_row(&record, &headers) {
                Ok(row) => rows.push(row),
                Err(reason) => {
                    warn!(line, row = ?record, "skipping malformed row: {reason}");
                    skipped_rows += 1;
                }
            }
        }
        let mut table = Self::from_rows(rows);
        table.skipped_rows = skipped_rows;
        info!(
            rows_skipped = skipped_rows,
            series = table.series.len(),
            sizes = table.sizes.len(),
            "Collected benchmark series"
        );
        Ok(table)
    }

    /// Group already parsed rows. For repeated (algorithm, data type, size)
    /// rows the last one wins.
    pub fn from_rows(rows: Vec<BenchmarkRow>) -> Self {
        let mut algorithms = IndexSet::new();
        let mut data_types = IndexSet::new();
        let mut unverified = Vec::new();
        let mut by_key: IndexMap<SeriesKey, HashMap<u64, BenchmarkRow>> = IndexMap::new();

        for row in rows {
            algorithms.insert(row.algorithm.clone());
            data_types.insert(row.data_type.clone());
            if !row.verified {
                unverified.push(UnverifiedRun {
                    algorithm: row.algorithm.clone(),
                    data_type: row.data_type.clone(),
                    size: row.data_size,
                });
            }
            let key = SeriesKey::new(row.algorithm.clone(), row.data_type.clone());
            let size = row.data_size;
            if by_key.entry(key).or_default().insert(size, row).is_some() {
                debug!(size, "duplicate row replaces an earlier one");
            }
        }

        let sizes: Vec<u64> = by_key
            .values()
            .flat_map(|rows| rows.keys().copied())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();

        let series = by_key
            .into_iter()
            .map(|(key, rows)| {
                let samples = sizes
                    .iter()
                    .map(|&size| match rows.get(&size) {
                        Some(row) => Sample {
                            size,
                            time_ms: Some(row.time_ms),
                            comparisons: Some(row.comparisons),
                            verified: row.verified,
                        },
                        None => Sample::missing(size),
                    })
                    .collect();
                (key, Series::new(samples))
            })
            .collect();

        BenchmarkTable {
            algorithms,
            data_types,
            sizes,
            series,
            unverified,
            skipped_rows: 0,
        }
    }

    /// Algorithms in the order they first appear in the input.
    pub fn algorithms(&self) -> impl Iterator<Item = &str> + '_ {
        self.algorithms.iter().map(String::as_str)
    }

    /// Data types in the order they first appear in the input.
    pub fn data_types(&self) -> impl Iterator<Item = &str> + '_ {
        self.data_types.iter().map(String::as_str)
    }

    /// The global size axis.
    pub fn sizes(&self) -> &[u64] {
        &self.sizes
    }

    pub fn series(&self, algorithm: &str, data_type: &str) -> Option<&Series> {
        self.series.get(&SeriesKey::new(algorithm, data_type))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SeriesKey, &Series)> + '_ {
        self.series.iter()
    }

    pub fn unverified_runs(&self) -> &[UnverifiedRun] {
        &self.unverified
    }

    /// Number of rows dropped as malformed.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

fn check_headers(headers: &StringRecord) -> Result<(), ReportError> {
    let found: Vec<String> = headers.iter().map(str::to_string).collect();
    let complete = REQUIRED_COLUMNS
        .iter()
        .all(|required| found.iter().any(|h| h == required));
    if complete {
        Ok(())
    } else {
        Err(ReportError::MalformedHeader {
            expected: REQUIRED_COLUMNS.iter().map(|s| s.to_string()).collect(),
            found,
        })
    }
}

fn parse_row(record: &StringRecord, headers: &StringRecord) -> Result<BenchmarkRow, String> {
    let row: BenchmarkRow = record
        .deserialize(Some(headers))
        .map_err(|e| e.to_string())?;
    if row.data_size == 0 {
        return Err("DataSize must be positive".into());
    }
    Ok(row)
}
