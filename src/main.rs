use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use csv_eda_analyzer::{
    analysis::{dtype_counts, Analyzer},
    config::{EdaConfig, DEFAULT_INPUT},
    io,
    pipeline,
    visualization::format_dtype_tally,
};

#[derive(Parser)]
#[command(
    name = "eda-analyzer",
    about = "CSV exploratory data analysis - console summaries, report tables and plots",
    version,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args)]
struct RunArgs {
    /// Path to the input CSV file [default: WineQT.csv]
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory for reports and plots [default: outputs]
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full report and write all reports and plots (the default)
    Run(RunArgs),

    /// Display a quick summary of the dataset without writing files
    Summary {
        /// Path to the input CSV file
        #[arg(short, long, default_value = DEFAULT_INPUT)]
        input: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: RunArgs) -> Result<EdaConfig> {
    let mut config = match &args.config {
        Some(path) => EdaConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EdaConfig::default(),
    };
    if let Some(input) = args.input {
        config.input = input;
    }
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }
    Ok(config)
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        None => {
            let config = build_config(cli.run)?;
            pipeline::run(&config)?;
        }

        Some(Commands::Run(args)) => {
            let config = build_config(args)?;
            pipeline::run(&config)?;
        }

        Some(Commands::Summary { input, json }) => {
            let dataset = io::read_csv(&input)?;
            let report = Analyzer::new(&dataset).summary_report()?;

            if json {
                println!("{}", report.to_json()?);
                return Ok(());
            }

            let missing_total: usize = report.missing.iter().map(|m| m.missing_count).sum();
            println!("\n{}", "Quick Summary".bold().cyan());
            println!("{}", "=".repeat(40));
            println!("  Name:           {}", report.name);
            println!("  Rows:           {}", report.shape.0);
            println!("  Columns:        {}", report.shape.1);
            println!("  Dtypes:         {}", format_dtype_tally(&dtype_counts(&dataset)));
            println!("  Missing cells:  {missing_total}");
            println!("  Duplicate rows: {}", report.duplicate_rows);
        }
    }

    Ok(())
}
