//! Run reports: plain-text summary tables and JSON export.
//!
//! The JSON document carries everything a chart front-end needs (histogram
//! and CDF series per method, plus the method-aligned axis per environment).

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use strateval_core::{
    AggregateResult, AlignedSeries, ConfidenceInterval, Environment, Method, NoiseConfig, Summary,
};

/// Statistics and series for one method in one environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodReport {
    pub method: Method,
    pub summary: Summary,

    /// Ascending (utility, count) pairs
    pub histogram: Vec<(f64, u64)>,

    /// Ascending (utility, cumulative probability) pairs
    pub cdf: Vec<(f64, f64)>,
}

/// All methods of one environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentReport {
    pub environment: Environment,
    pub methods: Vec<MethodReport>,
    pub aligned: AlignedSeries,
}

/// Complete run export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunExport {
    /// Trials per (environment, method)
    pub total_iterations: u64,

    /// Noise used for the run
    pub noise: NoiseConfig,

    /// Master seed (0 = unseeded)
    pub seed: u64,

    pub environments: Vec<EnvironmentReport>,
}

impl RunExport {
    /// Builds the export from a completed run.
    pub fn new(result: &AggregateResult, noise: NoiseConfig, seed: u64) -> Self {
        let environments = Environment::all()
            .into_iter()
            .map(|environment| EnvironmentReport {
                environment,
                methods: Method::all()
                    .into_iter()
                    .map(|method| {
                        let cell = result.cell(environment, method);
                        MethodReport {
                            method,
                            summary: cell.summary(),
                            histogram: cell.histogram.series(),
                            cdf: cell.histogram.cdf(),
                        }
                    })
                    .collect(),
                aligned: result.aligned_series(environment),
            })
            .collect();

        Self {
            total_iterations: result.trials(),
            noise,
            seed,
            environments,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = self.to_json_pretty()?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

fn format_value(value: f64) -> String {
    format!("{:.4}", value)
}

fn format_interval(ci: &ConfidenceInterval) -> String {
    format!("{:.4} to {:.4}", ci.lower, ci.upper)
}

/// Renders the summary table for one environment.
///
/// ```text
/// Urban Environment
///            | SOP                 | ML                  | CF-A*
/// Mean       | 6.9125              | ...
/// ```
pub fn render_table(result: &AggregateResult, env: Environment) -> String {
    let summaries = Method::all().map(|m| result.summary(env, m));

    let mut rows: Vec<(String, [String; 3])> = vec![
        ("Mean".into(), summaries.map(|s| format_value(s.mean))),
        ("Median".into(), summaries.map(|s| format_value(s.median))),
        ("Std Dev".into(), summaries.map(|s| format_value(s.std_dev))),
    ];
    for k in 0..3 {
        rows.push((
            format!("{}σ CI", k + 1),
            summaries.map(|s| format_interval(&s.intervals[k])),
        ));
    }

    let width = rows
        .iter()
        .flat_map(|(_, cells)| cells.iter().map(|c| c.chars().count()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "{} Environment", env.title());
    let _ = write!(out, "{:<10}", "");
    for method in Method::all() {
        let _ = write!(out, " | {:<width$}", method.column_label(), width = width);
    }
    out.push('\n');
    for (label, cells) in &rows {
        let _ = write!(out, "{:<10}", label);
        for cell in cells {
            let _ = write!(out, " | {:<width$}", cell, width = width);
        }
        out.push('\n');
    }
    out
}

/// Renders the tables of all environments.
pub fn render_tables(result: &AggregateResult) -> String {
    Environment::all()
        .into_iter()
        .map(|env| render_table(result, env))
        .collect::<Vec<_>>()
        .join("\n")
}
