use anyhow::{Context, Result};
use clap::Parser;
use sparkify_etl::config::{CliConfig, EtlConfig, FileConfig};
use sparkify_etl::pipeline::DatasetSummary;
use sparkify_etl::{Pipeline, SqliteWarehouse};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "sparkify-etl")]
#[command(about = "Load song and activity log data into the song-play warehouse")]
struct CliArgs {
    /// Path to a TOML config file. Its values override the command line.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite warehouse database file.
    #[clap(long)]
    pub db_path: Option<PathBuf>,

    /// Root directory of the song metadata files.
    #[clap(long)]
    pub song_data: Option<PathBuf>,

    /// Root directory of the activity log files.
    #[clap(long)]
    pub log_data: Option<PathBuf>,

    /// Skip files with invalid records instead of aborting the run.
    #[clap(long)]
    pub skip_bad_files: bool,

    /// Drop and recreate the warehouse tables before loading.
    #[clap(long)]
    pub reset_schema: bool,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            song_data_dir: self.song_data.clone(),
            log_data_dir: self.log_data.clone(),
            skip_bad_files: self.skip_bad_files,
            reset_schema: self.reset_schema,
        }
    }
}

fn log_dataset_summary(name: &str, summary: &DatasetSummary) {
    info!(
        "{}: {}/{} files loaded, {} records",
        name, summary.files_processed, summary.files_found, summary.totals.records
    );
    if summary.files_skipped > 0 {
        warn!("{}: {} files skipped", name, summary.files_skipped);
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = EtlConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Opening warehouse database at {:?}...", config.db_path);
    let warehouse = if config.reset_schema {
        SqliteWarehouse::open_reset(&config.db_path)?
    } else {
        SqliteWarehouse::open(&config.db_path)?
    };

    let mut pipeline = Pipeline::new(warehouse, config);
    info!(
        "Loading songs from {:?} and activity logs from {:?}",
        pipeline.config().song_data_dir,
        pipeline.config().log_data_dir
    );
    let summary = pipeline.run()?;

    log_dataset_summary("Song data", &summary.songs);
    log_dataset_summary("Log data", &summary.logs);
    let totals = summary.logs.totals;
    if totals.unmatched_songplays > 0 {
        info!(
            "{} of {} song plays have no matching song in the catalog",
            totals.unmatched_songplays, totals.songplays
        );
    }

    let warehouse = pipeline.into_warehouse();
    let counts = warehouse.get_counts()?;
    info!("Warehouse contains:");
    info!("  {} songs", counts.songs);
    info!("  {} artists", counts.artists);
    info!("  {} users", counts.users);
    info!("  {} time buckets", counts.time_buckets);
    info!("  {} song plays", counts.songplays);

    warehouse.close()?;
    Ok(())
}
