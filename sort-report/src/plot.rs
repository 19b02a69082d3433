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

//! # Comparison charts
//!
//! Renders the fixed chart set for a benchmark run. For each metric (time and
//! comparison count) and each scale (linear and log):
//!
//! - one combined chart with every algorithm × data type series, and
//! - one chart per data type with one series per algorithm.
//!
//! Charts are written as HTML, plus SVG when the `svg` feature is enabled.
//! Points from runs that failed verification are overlaid as red triangles.

use crate::error::ReportError;
use crate::ingest::BenchmarkTable;
use crate::series::{Sample, Series};
#[cfg(feature = "svg")]
use charming::ImageRenderer;
use charming::{
    Chart, HtmlRenderer,
    component::{Axis, Legend, Title},
    element::{AxisType, ItemStyle, LineStyle, NameLocation, Symbol},
    series::{Line, Scatter},
};
use std::path::{Path, PathBuf};
use tracing::debug;

const VERIFICATION_FAILED: &str = "Verification Failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Time,
    Comparisons,
}

impl Metric {
    fn value(&self, sample: &Sample) -> Option<f64> {
        match self {
            Metric::Time => sample.time_ms,
            Metric::Comparisons => sample.comparisons.map(|c| c as f64),
        }
    }

    fn file_prefix(&self) -> &'static str {
        match self {
            Metric::Time => "time",
            Metric::Comparisons => "comparisons",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Metric::Time => "Execution time",
            Metric::Comparisons => "Comparison count",
        }
    }

    fn axis_name(&self) -> &'static str {
        match self {
            Metric::Time => "time (ms)",
            Metric::Comparisons => "comparisons",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Linear,
    Log,
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotLine {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

/// Everything needed to draw one chart, independent of the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// Output file name without extension.
    pub file_stem: String,
    pub title: String,
    pub metric: Metric,
    pub scale: Scale,
    pub lines: Vec<PlotLine>,
    /// Points of runs that failed verification.
    pub failures: Vec<(f64, f64)>,
}

impl ChartData {
    /// Gather the chart for `metric` at `scale`, restricted to one data type,
    /// or combined over all data types when `data_type` is `None`.
    ///
    /// Log charts drop non-positive values, which have no place on a log axis.
    pub fn collect(
        table: &BenchmarkTable,
        metric: Metric,
        scale: Scale,
        data_type: Option<&str>,
    ) -> Self {
        let mut lines = Vec::new();
        let mut failures = Vec::new();
        let mut add = |name: String, series: &Series| {
            let plottable = |s: &&Sample| {
                metric
                    .value(s)
                    .is_some_and(|v| scale == Scale::Linear || v > 0.0)
            };
            let point = |s: &Sample| (s.size as f64, metric.value(s).unwrap_or_default());
            let points: Vec<(f64, f64)> =
                series.samples().iter().filter(plottable).map(point).collect();
            if points.is_empty() {
                return;
            }
            failures.extend(series.unverified().filter(plottable).map(point));
            lines.push(PlotLine { name, points });
        };

        for algorithm in table.algorithms() {
            match data_type {
                Some(dt) => {
                    if let Some(series) = table.series(algorithm, dt) {
                        add(algorithm.to_string(), series);
                    }
                }
                None => {
                    for dt in table.data_types() {
                        if let Some(series) = table.series(algorithm, dt) {
                            add(format!("{algorithm} / {dt}"), series);
                        }
                    }
                }
            }
        }

        let scope = data_type.unwrap_or("all data types");
        let mut title = format!("{} for {scope}", metric.title());
        let mut file_stem = format!(
            "{}_{}",
            metric.file_prefix(),
            data_type.map(file_fragment).unwrap_or_else(|| "combined".into())
        );
        if scale == Scale::Log {
            title.push_str(" (log scale)");
            file_stem.push_str("_log");
        }
        ChartData {
            file_stem,
            title,
            metric,
            scale,
            lines,
            failures,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn to_chart(&self) -> Chart {
        let y_axis_type = match self.scale {
            Scale::Linear => AxisType::Value,
            Scale::Log => AxisType::Log,
        };
        let mut chart = Chart::new()
            .background_color("white")
            .title(Title::new().text(self.title.clone()))
            .x_axis(
                Axis::new()
                    .type_(AxisType::Value)
                    .name("data size (N)")
                    .name_location(NameLocation::Middle)
                    .name_gap(25),
            )
            .y_axis(
                Axis::new()
                    .type_(y_axis_type)
                    .name(self.metric.axis_name())
                    .name_location(NameLocation::Middle)
                    .name_gap(80),
            );
        let mut legends = vec![];
        for line in &self.lines {
            let data: Vec<Vec<f64>> = line.points.iter().map(|(x, y)| vec![*x, *y]).collect();
            chart = chart.series(
                Line::new()
                    .name(line.name.clone())
                    .data(data)
                    .line_style(LineStyle::new().width(2)),
            );
            legends.push(line.name.clone());
        }
        if !self.failures.is_empty() {
            let data: Vec<Vec<f64>> = self.failures.iter().map(|(x, y)| vec![*x, *y]).collect();
            chart = chart.series(
                Scatter::new()
                    .name(VERIFICATION_FAILED)
                    .data(data)
                    .symbol(Symbol::Triangle)
                    .symbol_size(15.0)
                    .item_style(ItemStyle::new().color("red")),
            );
            legends.push(VERIFICATION_FAILED.to_string());
        }
        // Leave room under the title so the legend doesn't overlap it.
        chart.legend(Legend::new().data(legends).top("8%").left("center"))
    }
}

/// Data type names as they appear in file names.
pub fn file_fragment(data_type: &str) -> String {
    data_type.replace([' ', '/'], "_")
}

/// All charts for a benchmark run, in output order.
pub fn chart_set(table: &BenchmarkTable) -> Vec<ChartData> {
    let mut charts = Vec::new();
    for metric in [Metric::Time, Metric::Comparisons] {
        for scale in [Scale::Linear, Scale::Log] {
            charts.push(ChartData::collect(table, metric, scale, None));
        }
    }
    for data_type in table.data_types() {
        for metric in [Metric::Time, Metric::Comparisons] {
            for scale in [Scale::Linear, Scale::Log] {
                charts.push(ChartData::collect(table, metric, scale, Some(data_type)));
            }
        }
    }
    charts
}

/// Render every non-empty chart into `output_dir`, returning the written
/// HTML files.
pub fn render_charts(
    table: &BenchmarkTable,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, ReportError> {
    std::fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();
    for data in chart_set(table) {
        if data.is_empty() {
            debug!(chart = %data.file_stem, "nothing to plot");
            continue;
        }
        let chart = data.to_chart();
        let plot_file = output_dir.join(&data.file_stem).with_extension("html");
        HtmlRenderer::new(data.title.clone(), 1000, 800).save(&chart, &plot_file)?;
        #[cfg(feature = "svg")]
        {
            let plot_file = plot_file.with_extension("svg");
            ImageRenderer::new(1000, 800).save(&chart, &plot_file)?;
        }
        debug!(file = %plot_file.display(), "wrote chart");
        written.push(plot_file);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> BenchmarkTable {
        let csv = "Algorithm,DataType,DataSize,Time_ms,Comparisons,Verified\n\
                   Quick,Random Strings,100,0.5,700,true\n\
                   Quick,Random Strings,1000,0.0,9000,false\n\
                   Radix,Random Strings,100,0.2,0,true\n\
                   Radix,Sorted,1000,1.5,0,true\n";
        BenchmarkTable::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn fixed_chart_set() {
        let stems: Vec<String> = chart_set(&table()).into_iter().map(|c| c.file_stem).collect();
        assert_eq!(
            stems,
            vec![
                "time_combined",
                "time_combined_log",
                "comparisons_combined",
                "comparisons_combined_log",
                "time_Random_Strings",
                "time_Random_Strings_log",
                "comparisons_Random_Strings",
                "comparisons_Random_Strings_log",
                "time_Sorted",
                "time_Sorted_log",
                "comparisons_Sorted",
                "comparisons_Sorted_log",
            ]
        );
    }

    #[test]
    fn linear_chart_keeps_zero_but_skips_missing() {
        let data = ChartData::collect(&table(), Metric::Time, Scale::Linear, Some("Random Strings"));
        assert_eq!(
            data.lines,
            vec![
                PlotLine {
                    name: "Quick".into(),
                    points: vec![(100.0, 0.5), (1000.0, 0.0)],
                },
                PlotLine {
                    name: "Radix".into(),
                    points: vec![(100.0, 0.2)],
                },
            ]
        );
        assert_eq!(data.failures, vec![(1000.0, 0.0)]);
    }

    #[test]
    fn log_chart_drops_non_positive_values() {
        let data = ChartData::collect(&table(), Metric::Time, Scale::Log, Some("Random Strings"));
        assert_eq!(data.lines[0].points, vec![(100.0, 0.5)]);
        assert!(data.failures.is_empty());

        // Radix never counts comparisons, so it has no log comparison line.
        let comparisons =
            ChartData::collect(&table(), Metric::Comparisons, Scale::Log, Some("Sorted"));
        assert!(comparisons.is_empty());
    }

    #[test]
    fn combined_chart_names_every_series() {
        let data = ChartData::collect(&table(), Metric::Time, Scale::Linear, None);
        let names: Vec<&str> = data.lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Quick / Random Strings", "Radix / Random Strings", "Radix / Sorted"]
        );
        assert_eq!(data.title, "Execution time for all data types");
    }

    #[test]
    fn renders_html_files() {
        let dir = tempfile::tempdir().unwrap();
        let written = render_charts(&table(), dir.path()).unwrap();
        // Only comparisons_Sorted_log is empty.
        assert_eq!(written.len(), 11);
        assert!(dir.path().join("time_Sorted.html").is_file());
        assert!(!dir.path().join("comparisons_Sorted_log.html").exists());
    }
}
