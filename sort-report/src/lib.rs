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

//! # Sort Report
//!
//! Post-processing for sorting benchmark results. See `../README.md`.
//!
//! A run goes through three phases:
//!
//! 1. Ingestion: parse the results CSV into one [`Series`] per algorithm and
//!    data type ([`ingest`]).
//! 2. Estimation: fit a power law to each series and classify its growth
//!    order ([`estimator`]), collected into a [`ComplexityReport`].
//! 3. Optional plotting: render comparison charts ([`plot`]).

#![deny(unreachable_pub)]

pub mod error;
pub mod estimator;
pub mod ingest;
pub mod plot;
pub mod report;
pub mod series;

pub use error::ReportError;
pub use estimator::{Classification, ClassificationResult, ComplexityEstimator, Thresholds};
pub use ingest::BenchmarkTable;
pub use report::ComplexityReport;
pub use series::{Sample, Series, SeriesKey};
