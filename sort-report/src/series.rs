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

//! Benchmark samples grouped per (algorithm, data type).

use serde::Serialize;
use std::fmt;

/// Identifies one series: an algorithm run over one kind of input data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SeriesKey {
    pub algorithm: String,
    pub data_type: String,
}

impl SeriesKey {
    pub fn new(algorithm: impl Into<String>, data_type: impl Into<String>) -> Self {
        SeriesKey {
            algorithm: algorithm.into(),
            data_type: data_type.into(),
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.algorithm, self.data_type)
    }
}

/// A single measurement slot on the size axis.
///
/// `time_ms` is `None` when no benchmark row existed for this size. Such
/// slots are kept so that every series lines up with the global size axis,
/// but they never take part in fitting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub size: u64,
    pub time_ms: Option<f64>,
    pub comparisons: Option<u64>,
    /// `false` only when a row exists and its output failed verification.
    pub verified: bool,
}

impl Sample {
    /// A measured sample with no comparison count, mostly useful for tests
    /// and synthetic series.
    pub fn timed(size: u64, time_ms: f64) -> Self {
        Sample {
            size,
            time_ms: Some(time_ms),
            comparisons: None,
            verified: true,
        }
    }

    /// An empty slot: no row was recorded at this size.
    pub fn missing(size: u64) -> Self {
        Sample {
            size,
            time_ms: None,
            comparisons: None,
            verified: true,
        }
    }
}

/// All samples for one [`SeriesKey`], ordered by ascending size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    /// Build a series, sorting samples by size.
    pub fn new(mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.size);
        Series { samples }
    }

    /// Convenience constructor from parallel `(size, time)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u64, f64)>) -> Self {
        Series::new(
            pairs
                .into_iter()
                .map(|(size, time)| Sample::timed(size, time))
                .collect(),
        )
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `(size, time)` for every slot that holds a measurement.
    pub fn measured(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.samples
            .iter()
            .filter_map(|s| s.time_ms.map(|t| (s.size, t)))
    }

    /// Samples whose run failed verification.
    pub fn unverified(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter().filter(|s| !s.verified)
    }
}
