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

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a report run.
///
/// Per-row and per-series problems are not represented here: malformed rows
/// are logged and skipped during ingestion, and unusable series are reported
/// inline by their classification.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("input file {0} not found; run the benchmark to generate it")]
    MissingInputFile(PathBuf),
    #[error("CSV header is malformed: expected columns [{}], found [{}]", .expected.join(", "), .found.join(", "))]
    MalformedHeader {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to render chart: {0}")]
    Chart(#[from] charming::EchartsError),
}
