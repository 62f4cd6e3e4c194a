use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::error::Result;
use crate::logging;
use crate::models::DatasetSummary;
use crate::processors::IntegrityChecker;
use crate::query::dates::{parse_compact_date, trailing_window_start};
use crate::query::WeatherQueryEngine;
use crate::readers::DatasetLoader;
use crate::store::InMemoryStore;
use crate::utils::progress::ProgressReporter;
use crate::writers::{JsonWriter, ParquetWriter};
use std::io::Write;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub compact: bool,
    pub quiet: bool,
}

pub async fn run(cli: Cli) -> Result<()> {
    let settings = resolve_settings(&cli)?;
    logging::init(&settings.logging, cli.verbose)?;

    let output = OutputOptions {
        compact: cli.compact,
        quiet: cli.quiet,
    };

    let stdout = std::io::stdout();
    execute(&cli.command, &settings, output, &mut stdout.lock()).await
}

/// Settings file and environment, overridden by explicit command-line flags
fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;

    if let Some(path) = &cli.measurements {
        settings.data.measurements_path = path.clone();
    }
    if let Some(path) = &cli.stations {
        settings.data.stations_path = path.clone();
    }
    if let Some(workers) = cli.max_workers {
        settings.data.max_workers = Some(workers);
    }
    if cli.mmap {
        settings.data.use_mmap = true;
    }
    if let Some(path) = &cli.log_file {
        settings.logging.log_file = Some(path.clone());
    }

    Ok(settings)
}

/// Load the dataset named by `settings` and run one command, writing its
/// output to `out`. Malformed arguments fail before anything is read.
pub async fn execute<W: Write>(
    command: &Commands,
    settings: &Settings,
    output: OutputOptions,
    out: &mut W,
) -> Result<()> {
    check_arguments(command)?;

    let store = Arc::new(load_store(settings, output.quiet).await?);
    let engine = WeatherQueryEngine::new(store);
    let json = JsonWriter::new().with_pretty(!output.compact);

    match command {
        Commands::Precipitation => {
            let readings = engine.trailing_precipitation()?;
            info!(rows = readings.len(), "Precipitation query complete");
            json.write(&readings, &mut *out)?;
        }

        Commands::Stations => {
            let stations = engine.list_stations()?;
            info!(stations = stations.len(), "Station query complete");
            json.write(&stations, &mut *out)?;
        }

        Commands::Tobs => {
            let readings = engine.trailing_temperatures_for_most_active_station()?;
            info!(rows = readings.len(), "Temperature observation query complete");
            json.write(&readings, &mut *out)?;
        }

        Commands::Stats { start, end } => {
            let stats = engine.temperature_stats_from_strings(start, end.as_deref())?;
            info!("{}", stats.summary());
            json.write(&stats, &mut *out)?;
        }

        Commands::Info => {
            let summary = summarize(&engine)?;
            json.write(&summary, &mut *out)?;
        }

        Commands::Validate { max_listed } => {
            let checker = IntegrityChecker::with_max_listed(*max_listed);
            let report = checker.check_store(engine.store());

            writeln!(out, "{}", checker.generate_summary(&report))?;
            if report.is_clean() {
                writeln!(out, "All data passed validation checks")?;
            } else {
                warn!(violations = report.violations.len(), "Dataset has integrity violations");
                writeln!(out, "Found {} validation issues", report.violations.len())?;
            }
        }

        Commands::Export {
            output_file,
            compression,
            row_group_size,
        } => {
            let writer = ParquetWriter::new()
                .with_compression(compression)?
                .with_row_group_size(*row_group_size);

            if let Some(parent) = output_file.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }

            writer.write_observations(engine.store().observations(), output_file)?;
            let file_info = writer.get_file_info(output_file)?;
            writeln!(out, "{}", file_info.summary())?;
        }
    }

    Ok(())
}

fn check_arguments(command: &Commands) -> Result<()> {
    if let Commands::Stats { start, end } = command {
        parse_compact_date(start)?;
        if let Some(end) = end {
            parse_compact_date(end)?;
        }
    }
    Ok(())
}

async fn load_store(settings: &Settings, quiet: bool) -> Result<InMemoryStore> {
    let loader = DatasetLoader::new(
        &settings.data.measurements_path,
        &settings.data.stations_path,
    )
    .with_max_workers(settings.max_workers())
    .with_mmap(settings.data.use_mmap)
    .with_stations_delimiter(settings.stations_delimiter()?)
    .with_read_batch_size(settings.data.read_batch_size);

    info!(
        measurements = %loader.measurements_path().display(),
        stations = %loader.stations_path().display(),
        "Loading dataset"
    );

    let progress = ProgressReporter::new_spinner("Loading weather dataset...", quiet);
    let store = loader.load().await?;
    progress.finish_and_clear();

    Ok(store)
}

fn summarize(engine: &WeatherQueryEngine<InMemoryStore>) -> Result<DatasetSummary> {
    let store = engine.store();
    let (first_date, last_date) = store.date_range().unzip();

    let (most_active_station, most_active_observations) = if store.observation_count() == 0 {
        (None, None)
    } else {
        let (station, count) = engine.most_active_station()?;
        (Some(station), Some(count))
    };

    Ok(DatasetSummary {
        stations: store.station_count(),
        observations: store.observation_count(),
        first_date,
        last_date,
        trailing_window_start: last_date.map(trailing_window_start).transpose()?,
        most_active_station,
        most_active_observations,
    })
}
