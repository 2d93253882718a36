//! The one-shot load, report, visualize flow behind the CLI.

use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::{dtype_counts, Analyzer, DescribeMode, SummaryReport};
use crate::config::{EdaConfig, PlotConfig};
use crate::error::EdaError;
use crate::io::{prepare_output_dir, CsvFormat, DatasetReader, ReportWriter};
use crate::models::Dataset;
use crate::visualization::{
    print_columns, print_describe, print_head, print_info, print_missing_counts, print_shape,
    print_unique_counts, render_boxplot, render_correlation_heatmap, render_histograms,
    BoxplotRenderer, BOXPLOT_FILE, HEATMAP_FILE, HISTOGRAM_FILE,
};

pub const NO_NUMERIC_NOTICE: &str = "(No numeric columns found; skipping numeric plots.)";

/// What a completed run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Absolute output directory
    pub output_dir: PathBuf,
    /// Every file written, reports first then images
    pub artifacts: Vec<PathBuf>,
    /// True when the dataset had no numeric columns
    pub plots_skipped: bool,
    pub describe_mode: DescribeMode,
    /// `None` when no boxplot was drawn
    pub boxplot_renderer: Option<BoxplotRenderer>,
}

/// Images written by [`visualize`].
#[derive(Debug, Clone, Default)]
pub struct Visuals {
    pub images: Vec<PathBuf>,
    pub skipped: bool,
    pub boxplot_renderer: Option<BoxplotRenderer>,
}

/// Load the configured input. Nothing is created on disk.
pub fn load(config: &EdaConfig) -> Result<Dataset, EdaError> {
    if !config.input.exists() {
        return Err(EdaError::InputNotFound(config.input.clone()));
    }
    CsvFormat.read(&config.input)
}

/// Print every console section and persist the tabular reports.
pub fn report(
    dataset: &Dataset,
    out_dir: &Path,
    head_rows: usize,
) -> Result<(SummaryReport, Vec<PathBuf>), EdaError> {
    let summary = Analyzer::new(dataset).summary_report()?;

    print_head(dataset, head_rows);
    print_shape(summary.shape);
    print_info(
        &summary.name,
        dataset.num_rows(),
        &summary.dtypes,
        &dtype_counts(dataset),
    );
    print_describe(&summary.describe);
    print_columns(&summary.columns);
    print_missing_counts(&summary.missing);
    print_unique_counts(&summary.unique);

    let written = ReportWriter::new(out_dir).write_all(&summary)?;
    info!(files = written.len(), mode = ?summary.describe_mode, "reports written");
    Ok((summary, written))
}

/// Render histograms, the correlation heatmap and the boxplot for the
/// numeric columns. Prints a notice and writes nothing when there are none.
pub fn visualize(dataset: &Dataset, out_dir: &Path, plots: &PlotConfig) -> Result<Visuals, EdaError> {
    let analyzer = Analyzer::new(dataset);
    if !analyzer.has_numeric_columns() {
        println!("\n{NO_NUMERIC_NOTICE}");
        info!("no numeric columns; plots skipped");
        return Ok(Visuals {
            skipped: true,
            ..Visuals::default()
        });
    }

    let mut visuals = Visuals::default();

    let histograms = out_dir.join(HISTOGRAM_FILE);
    render_histograms(&analyzer.histograms(plots.bins), &histograms, plots)?;
    visuals.images.push(histograms);

    let heatmap = out_dir.join(HEATMAP_FILE);
    render_correlation_heatmap(&analyzer.correlation(), &heatmap, plots)?;
    visuals.images.push(heatmap);

    let box_stats = analyzer.box_stats();
    if box_stats.is_empty() {
        warn!("numeric columns hold no values; boxplot skipped");
    } else {
        let boxplot = out_dir.join(BOXPLOT_FILE);
        visuals.boxplot_renderer = Some(render_boxplot(&box_stats, &boxplot, plots)?);
        visuals.images.push(boxplot);
    }

    Ok(visuals)
}

/// Run the whole flow: load, create the output directory, report, visualize.
pub fn run(config: &EdaConfig) -> Result<RunSummary, EdaError> {
    config.plots.validate()?;
    let dataset = load(config)?;
    let out_dir = prepare_output_dir(&config.output_dir)?;

    let (summary, mut artifacts) = report(&dataset, &out_dir, config.head_rows)?;
    let visuals = visualize(&dataset, &out_dir, &config.plots)?;
    artifacts.extend(visuals.images);

    let output_dir = std::fs::canonicalize(&out_dir)?;
    println!(
        "\n{} {}",
        "All reports/plots saved to:".bold().cyan(),
        output_dir.display()
    );

    Ok(RunSummary {
        output_dir,
        artifacts,
        plots_skipped: visuals.skipped,
        describe_mode: summary.describe_mode,
        boxplot_renderer: visuals.boxplot_renderer,
    })
}
