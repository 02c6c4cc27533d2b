//! Output formatting for different formats.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::str::FromStr;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use whoisbatch_core::{Classification, Outcome, ResolutionResult};
use whoisbatch_pipeline::BatchReport;

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed tables with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// YAML output
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "table" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => anyhow::bail!(
                "Unknown output format: {s}\n\
                 Valid formats: pretty, json, csv, yaml"
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// One flattened line of output
#[derive(Debug, Tabled, Serialize)]
struct ResultRow {
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Organization")]
    organization: String,
    #[tabled(rename = "Country")]
    country_code: String,
    #[tabled(skip)]
    country_name: String,
    #[tabled(rename = "Type")]
    classification: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(skip)]
    links: String,
}

impl From<&ResolutionResult> for ResultRow {
    fn from(result: &ResolutionResult) -> Self {
        Self {
            target: result.target.clone(),
            organization: result.organization.clone().unwrap_or_else(|| "N/A".into()),
            country_code: result.country_code.clone().unwrap_or_else(|| "N/A".into()),
            country_name: result.country_name.clone().unwrap_or_else(|| "N/A".into()),
            classification: result.classification.label().to_string(),
            status: result.outcome.to_string(),
            links: result
                .links
                .iter()
                .map(|l| l.url.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Write a finished batch to stdout in `format`
pub fn print_report(report: &BatchReport, format: OutputFormat) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&report.results)?)?;
        }
        OutputFormat::Yaml => {
            write!(out, "{}", serde_yaml::to_string(&report.results)?)?;
        }
        OutputFormat::Csv => write_csv(&mut out, &report.results)?,
        OutputFormat::Pretty => print_pretty(&mut out, report)?,
    }
    Ok(())
}

fn write_csv(out: impl Write, results: &[ResolutionResult]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for result in results {
        writer.serialize(ResultRow::from(result))?;
    }
    writer.flush()?;
    Ok(())
}

fn print_pretty(out: &mut impl Write, report: &BatchReport) -> Result<()> {
    if report.results.is_empty() {
        writeln!(out, "{}", "No results.".dimmed())?;
    } else {
        let rows: Vec<ResultRow> = report.results.iter().map(ResultRow::from).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        writeln!(out, "{table}")?;
    }

    writeln!(out)?;
    writeln!(out, "{}", "Summary".bold())?;
    for (label, count) in classification_summary(&report.results) {
        writeln!(out, "  {:<22} {count}", format!("{label}:"))?;
    }

    let failed = report
        .results
        .iter()
        .filter(|r| matches!(r.outcome, Outcome::Failed { .. }))
        .count();
    writeln!(
        out,
        "  {:<22} {}",
        "Errors:",
        if failed > 0 { failed.to_string().red().to_string() } else { "0".to_string() }
    )?;
    writeln!(out, "  {:<22} {:.1}s", "Elapsed:", report.progress.elapsed.as_secs_f64())?;

    if report.cancelled {
        writeln!(out)?;
        writeln!(
            out,
            "{} cancelled with {} target(s) unresolved",
            "Warning:".yellow().bold(),
            report.unresolved.len()
        )?;
        for target in report.unresolved.iter().take(10) {
            writeln!(out, "  {target}")?;
        }
        if report.unresolved.len() > 10 {
            writeln!(out, "  ... and {} more", report.unresolved.len() - 10)?;
        }
    }
    Ok(())
}

/// Count of successful results per classification, in a fixed order
fn classification_summary(results: &[ResolutionResult]) -> Vec<(&'static str, usize)> {
    const ORDER: [Classification; 6] = [
        Classification::Standard,
        Classification::HostingDatacenter,
        Classification::NamedVpnProxy,
        Classification::TorExit,
        Classification::CdnProxy,
        Classification::PrivateRelay,
    ];

    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for result in results.iter().filter(|r| r.outcome.is_success()) {
        if let Some(idx) = ORDER.iter().position(|c| *c == result.classification) {
            *counts.entry(idx).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(idx, count)| (ORDER[idx].label(), count))
        .collect()
}
