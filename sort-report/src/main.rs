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

use clap::Parser;
use itertools::Itertools;
use sort_report::{
    BenchmarkTable, ComplexityEstimator, ComplexityReport, ReportError, Thresholds, plot,
    report::write_unverified_warning,
};
use std::{fs, io, path::PathBuf};
use tracing::{Level, info};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry};

#[derive(Parser, Debug)]
#[command(
    name = "sort-report",
    about = "Chart sorting benchmark results and estimate their complexity",
    version
)]
struct Args {
    /// Benchmark results CSV
    #[arg(default_value = "sort_performance.csv", env = "SORT_REPORT_CSV")]
    csv: PathBuf,

    /// The output directory, created if it does not exist
    #[arg(long, default_value = "tmp/sort-report", env = "SORT_REPORT_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Skip chart rendering
    #[arg(long, env = "SORT_REPORT_NO_PLOTS")]
    no_plots: bool,

    /// Largest coefficient of variation of time / (N ln N) still read as O(N log N)
    #[arg(long, default_value_t = 0.3, env = "SORT_REPORT_CV_THRESHOLD")]
    cv_threshold: f64,

    #[arg(short, long, env = "SORT_REPORT_VERBOSE", help = "Enable verbose progress output")]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    if let Err(e) = run_main(args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run_main(args: Args) -> Result<(), ReportError> {
    let table = BenchmarkTable::from_path(&args.csv)?;
    info!("Algorithms: {}", table.algorithms().join(", "));
    info!("Data types: {}", table.data_types().join(", "));

    write_unverified_warning(io::stdout().lock(), table.unverified_runs())?;

    fs::create_dir_all(&args.output_dir)?;
    if !args.no_plots {
        let plot_dir = args.output_dir.join("plot");
        let written = plot::render_charts(&table, &plot_dir)?;
        println!(
            "\n{} charts written to {}/*.{{html,svg}}",
            written.len(),
            plot_dir.display()
        );
    }

    let estimator = ComplexityEstimator::new(Thresholds {
        cv_max: args.cv_threshold,
        ..Thresholds::default()
    });
    let report = ComplexityReport::build(&table, &estimator);
    report.write_text(io::stdout().lock())?;

    let json_file = args.output_dir.join("complexity_report.json");
    fs::write(&json_file, report.to_json()?)?;
    println!("\nComplexity report written to: {}", json_file.display());
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_filter(Targets::new().with_default(level)),
        )
        .try_init()
        .ok();
}
