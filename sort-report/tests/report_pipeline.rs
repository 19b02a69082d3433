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

use serde_json::Value;
use sort_report::{
    BenchmarkTable, Classification, ComplexityEstimator, ComplexityReport, ReportError, plot,
};
use std::fmt::Write as _;
use std::fs;

const SIZES: [u64; 5] = [100, 1_000, 10_000, 100_000, 1_000_000];

/// Results for three algorithms on two data types, with a few rows a
/// benchmark harness could plausibly emit by mistake.
fn results_csv() -> String {
    let mut csv = String::from("Algorithm,DataType,DataSize,Time_ms,Comparisons,Verified\n");
    for &n in &SIZES {
        let nf = n as f64;
        for data_type in ["Random", "Sorted"] {
            writeln!(
                csv,
                "Merge Sort,{data_type},{n},{},{},true",
                2e-5 * nf * nf.ln(),
                (nf * nf.log2()) as u64
            )
            .unwrap();
            writeln!(
                csv,
                "Radix Sort,{data_type},{n},{},0,true",
                3e-5 * nf
            )
            .unwrap();
        }
        // Insertion sort only ever ran on random data, and too slowly to
        // finish past 10k elements.
        if n <= 10_000 {
            writeln!(
                csv,
                "Insertion Sort,Random,{n},{},{},{}",
                1e-7 * nf * nf,
                n * n / 4,
                n != 10_000
            )
            .unwrap();
        }
    }
    csv.push_str("Radix Sort,Random,lots,1.0,0,true\n");
    csv.push_str("Bogo Sort,Random,100,0,0,false\n");
    csv
}

#[test]
fn end_to_end_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sort_performance.csv");
    fs::write(&path, results_csv()).unwrap();

    let table = BenchmarkTable::from_path(&path).unwrap();
    assert_eq!(table.skipped_rows(), 1);
    assert_eq!(table.sizes(), &SIZES);
    assert_eq!(table.unverified_runs().len(), 2);

    let report = ComplexityReport::build(&table, &ComplexityEstimator::default());
    let class = |algorithm: &str, data_type: &str| {
        report
            .get(algorithm, data_type)
            .and_then(|e| e.result.as_ref())
            .map(|r| r.classification)
    };
    assert_eq!(class("Merge Sort", "Random"), Some(Classification::Linearithmic));
    assert_eq!(class("Merge Sort", "Sorted"), Some(Classification::Linearithmic));
    assert_eq!(class("Radix Sort", "Random"), Some(Classification::Linear));
    assert_eq!(class("Insertion Sort", "Random"), Some(Classification::Quadratic));
    assert_eq!(class("Insertion Sort", "Sorted"), None);
    // A single zero-time row leaves nothing to fit.
    assert_eq!(class("Bogo Sort", "Random"), Some(Classification::InsufficientData));

    let mut text = Vec::new();
    report.write_text(&mut text).unwrap();
    let text = String::from_utf8(text).unwrap();
    assert!(text.contains("  Sorted: no data"));
    assert!(text.contains("  Random: Estimated power = 2.00 -> Approx. Complexity: O(N^2)"));
    assert!(text.contains("  Random: insufficient data"));

    let json: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    let algorithms = json["algorithms"].as_array().unwrap();
    assert_eq!(algorithms.len(), 4);
    assert_eq!(algorithms[0]["algorithm"], "Merge Sort");
    assert_eq!(algorithms[0]["series"][0]["result"]["samples_used"], 5);
}

#[test]
fn charts_cover_every_data_type() {
    let dir = tempfile::tempdir().unwrap();
    let table = BenchmarkTable::from_reader(results_csv().as_bytes()).unwrap();
    let plot_dir = dir.path().join("plot");
    let written = plot::render_charts(&table, &plot_dir).unwrap();
    for stem in [
        "time_combined",
        "time_combined_log",
        "comparisons_combined",
        "time_Random",
        "time_Random_log",
        "comparisons_Sorted",
    ] {
        let file = plot_dir.join(format!("{stem}.html"));
        assert!(written.contains(&file), "{stem} not rendered");
    }
}

#[test]
fn missing_input_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let err = BenchmarkTable::from_path(&dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, ReportError::MissingInputFile(_)));
    assert!(err.to_string().contains("nope.csv"));
}

#[test]
fn bad_header_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sort_performance.csv");
    fs::write(&path, "Algo,Type,Size\nQuick,Random,10\n").unwrap();
    let err = BenchmarkTable::from_path(&path).unwrap_err();
    assert!(matches!(err, ReportError::MalformedHeader { .. }));
    assert!(err.to_string().contains("Time_ms"));
}
