//! CLI entry point for the Irish climate dashboard batch jobs.
//!
//! Provides subcommands for building the preaggregated data, preparing the station
//! points cache and exporting the county line chart as standalone HTML.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use irish_climate::{
    generate_preaggregate, generate_station_points, line_plot, load_preaggregate, write_html,
    DataPaths, LineData, ReferenceConfig, Statistic,
};
use log::info;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "irish-climate")]
#[command(about = "Batch jobs and charts for the Irish climate dashboard", long_about = None)]
struct Cli {
    /// Project directory holding `ref/` and `data/`
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Directory of reference JSON files (defaults to `<root>/ref`)
    #[arg(long, global = true)]
    ref_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate the master data to year-month level for every configured statistic
    Preaggregate {
        /// Master observations parquet file (defaults to `<root>/data/master.parquet`)
        #[arg(long)]
        master: Option<PathBuf>,

        /// Existing parquet file to overwrite with the result
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Prepare the projected station points of every station in the master data
    Stations {
        /// Master observations parquet file (defaults to `<root>/data/master.parquet`)
        #[arg(long)]
        master: Option<PathBuf>,

        /// Station metadata CSV (defaults to `<root>/data/stations.csv`)
        #[arg(long)]
        stations_csv: Option<PathBuf>,

        /// Existing file to overwrite with the points cache; omit for a dry run
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export the county line chart as a standalone HTML page
    LinePlot {
        /// Measurement column (defaults to the first configured column)
        #[arg(short, long)]
        column: Option<String>,

        /// Statistic (defaults to the first configured statistic)
        #[arg(short, long)]
        stat: Option<Statistic>,

        /// Aggregation level (defaults to the first configured level)
        #[arg(short, long)]
        agg_level: Option<String>,

        /// County to draw, repeatable (defaults to every configured county)
        #[arg(long = "county")]
        counties: Vec<String>,

        /// Preaggregated parquet file (defaults to `<root>/data/preaggregate_data.parquet`)
        #[arg(long)]
        preaggregate: Option<PathBuf>,

        /// HTML file to write
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let paths = DataPaths::new(&cli.root);
    let ref_dir = cli.ref_dir.unwrap_or_else(|| paths.reference_dir.clone());

    match cli.command {
        Commands::Preaggregate { master, output } => {
            let config = ReferenceConfig::load(&ref_dir)?;
            let master = master.unwrap_or(paths.master_data);
            let output = output.unwrap_or(paths.preaggregate_data);
            let rows = generate_preaggregate(&master, &output, &config)
                .with_context(|| format!("Preaggregation of {} failed", master.display()))?;
            info!("Done: {} rows", rows);
        }
        Commands::Stations {
            master,
            stations_csv,
            output,
        } => {
            let master = master.unwrap_or(paths.master_data);
            let stations_csv = stations_csv.unwrap_or(paths.stations);
            let points = generate_station_points(&master, &stations_csv, output.as_deref())
                .with_context(|| {
                    format!("Station points from {} failed", stations_csv.display())
                })?;
            info!("Done: {} station points", points.len());
        }
        Commands::LinePlot {
            column,
            stat,
            agg_level,
            counties,
            preaggregate,
            output,
        } => {
            let config = ReferenceConfig::load(&ref_dir)?;
            let column = column.unwrap_or_else(|| config.default_column().to_string());
            let statistic = stat.unwrap_or_else(|| config.default_statistic());
            let agg_level = agg_level.unwrap_or_else(|| config.default_agg_level().to_string());
            let selection: Vec<String> = if counties.is_empty() {
                config.counties().into_iter().map(String::from).collect()
            } else {
                counties
            };

            let preaggregate_path = preaggregate.unwrap_or(paths.preaggregate_data);
            let preaggregate = load_preaggregate(&preaggregate_path)?;
            let data = LineData::from_preaggregate(&preaggregate, statistic, &agg_level, &config)?;
            let plot = line_plot(&data, &column, statistic, &agg_level, &selection, &config)?;
            write_html(&plot, &output)?;
            info!(
                "Wrote {} line plot of {} {} to {}",
                agg_level,
                statistic,
                column,
                output.display()
            );
        }
    }
    Ok(())
}
