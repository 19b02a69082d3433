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

//! Text and JSON rendering of complexity estimates.

use crate::estimator::{Classification, ClassificationResult, ComplexityEstimator};
use crate::ingest::{BenchmarkTable, UnverifiedRun};
use serde::Serialize;
use std::io::{self, Write};

/// Estimate for one data type of an algorithm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesEntry {
    pub data_type: String,
    /// Complexity label, or `"no data"` when there is no result.
    pub label: String,
    /// `None` when the algorithm was never run on this data type.
    pub result: Option<ClassificationResult>,
}

impl SeriesEntry {
    pub fn new(data_type: impl Into<String>, result: Option<ClassificationResult>) -> Self {
        SeriesEntry {
            data_type: data_type.into(),
            label: result
                .as_ref()
                .map_or_else(|| "no data".to_string(), ClassificationResult::label),
            result,
        }
    }

    /// The line printed for this entry, without indentation.
    pub fn describe(&self) -> String {
        let data_type = &self.data_type;
        match &self.result {
            None => format!("{data_type}: no data"),
            Some(result) => match (result.classification, result.power) {
                (Classification::Invalid, _) => format!(
                    "{data_type}: invalid values after taking logarithms, analysis skipped"
                ),
                (Classification::InsufficientData, _) | (_, None) => format!(
                    "{data_type}: insufficient data for complexity analysis (fewer than 2 usable points)"
                ),
                (class, Some(power)) => format!(
                    "{data_type}: Estimated power = {power:.2} -> Approx. Complexity: {class}"
                ),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgorithmEntry {
    pub algorithm: String,
    pub series: Vec<SeriesEntry>,
}

/// Complexity estimates for every algorithm × data type of a benchmark run,
/// in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexityReport {
    pub algorithms: Vec<AlgorithmEntry>,
}

impl ComplexityReport {
    pub fn build(table: &BenchmarkTable, estimator: &ComplexityEstimator) -> Self {
        let algorithms = table
            .algorithms()
            .map(|algorithm| AlgorithmEntry {
                algorithm: algorithm.to_string(),
                series: table
                    .data_types()
                    .map(|data_type| {
                        SeriesEntry::new(
                            data_type,
                            table
                                .series(algorithm, data_type)
                                .map(|series| estimator.classify(series)),
                        )
                    })
                    .collect(),
            })
            .collect();
        ComplexityReport { algorithms }
    }

    pub fn get(&self, algorithm: &str, data_type: &str) -> Option<&SeriesEntry> {
        self.algorithms
            .iter()
            .find(|a| a.algorithm == algorithm)?
            .series
            .iter()
            .find(|s| s.data_type == data_type)
    }

    pub fn write_text<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "\nAlgorithmic Complexity Analysis (Time):")?;
        writeln!(out, "======================================")?;
        for entry in &self.algorithms {
            writeln!(out, "\n{}:", entry.algorithm)?;
            for series in &entry.series {
                writeln!(out, "  {}", series.describe())?;
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Print the list of runs that failed verification, if any.
pub fn write_unverified_warning<W: Write>(mut out: W, runs: &[UnverifiedRun]) -> io::Result<()> {
    if runs.is_empty() {
        return Ok(());
    }
    writeln!(out, "\nWARNING: runs that failed verification:")?;
    for run in runs {
        writeln!(
            out,
            "  - Algorithm: {}, DataType: {}, Size: {}",
            run.algorithm, run.data_type, run.size
        )?;
    }
    writeln!(out, "{}", "-".repeat(30))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(result: Option<ClassificationResult>) -> SeriesEntry {
        SeriesEntry::new("Random", result)
    }

    #[test]
    fn describes_estimates() {
        let e = entry(Some(ClassificationResult {
            power: Some(1.9876),
            classification: Classification::Quadratic,
            samples_used: 4,
            r_squared: Some(0.99),
        }));
        assert_eq!(
            e.describe(),
            "Random: Estimated power = 1.99 -> Approx. Complexity: O(N^2)"
        );
    }

    #[test]
    fn describes_terminal_conditions() {
        let insufficient = entry(Some(ClassificationResult {
            power: None,
            classification: Classification::InsufficientData,
            samples_used: 1,
            r_squared: None,
        }));
        assert!(insufficient.describe().starts_with("Random: insufficient data"));
        let invalid = entry(Some(ClassificationResult {
            power: None,
            classification: Classification::Invalid,
            samples_used: 3,
            r_squared: None,
        }));
        assert!(invalid.describe().starts_with("Random: invalid values"));
        assert_eq!(entry(None).describe(), "Random: no data");
    }

    #[test]
    fn builds_in_input_order() {
        let csv = "Algorithm,DataType,DataSize,Time_ms,Comparisons,Verified\n\
                   Merge,Sorted,10,1,1,true\n\
                   Merge,Sorted,100,10,1,true\n\
                   Merge,Sorted,1000,100,1,true\n\
                   Bubble,Random,10,1,1,true\n\
                   Bubble,Random,100,100,1,true\n\
                   Bubble,Random,1000,10000,1,true\n";
        let table = BenchmarkTable::from_reader(csv.as_bytes()).unwrap();
        let report = ComplexityReport::build(&table, &ComplexityEstimator::default());

        let mut text = Vec::new();
        report.write_text(&mut text).unwrap();
        let text = String::from_utf8(text).unwrap();
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(
            lines,
            vec![
                "Algorithmic Complexity Analysis (Time):",
                "======================================",
                "Merge:",
                "  Sorted: Estimated power = 1.00 -> Approx. Complexity: O(N)",
                "  Random: no data",
                "Bubble:",
                "  Sorted: no data",
                "  Random: Estimated power = 2.00 -> Approx. Complexity: O(N^2)",
            ]
        );
        assert!(report.get("Bubble", "Random").unwrap().result.is_some());
    }

    #[test]
    fn unverified_warning_is_silent_without_failures() {
        let mut out = Vec::new();
        write_unverified_warning(&mut out, &[]).unwrap();
        assert!(out.is_empty());

        write_unverified_warning(
            &mut out,
            &[UnverifiedRun {
                algorithm: "Radix".into(),
                data_type: "Strings".into(),
                size: 5000,
            }],
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("  - Algorithm: Radix, DataType: Strings, Size: 5000"));
    }
}
