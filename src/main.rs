use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use mvdb::constants::{DEFAULT_CONFIG_PATH, RELEASE_CANDIDATE_SUFFIX};
use mvdb::observability::{self, metrics};
use mvdb::storage::{Storage, YamlFileStorage};
use mvdb::{
    filter_by_group, Config, DuplicatePolicy, MergeEvent, MovieRecord, Pipeline, PipelineResult,
};

#[derive(Parser)]
#[command(name = "mvdb")]
#[command(about = "Movie collection spreadsheet to inventory catalog builder")]
#[command(version = "0.1.0")]
struct Cli {
    /// Reference config (boutique labels, genres, sort key and barcode overrides)
    #[arg(long, global = true, env = "MVDB_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Write a Prometheus text snapshot of run metrics to this file
    #[arg(long, global = true)]
    metrics_file: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a new catalog from a spreadsheet
    Import {
        /// Spreadsheet to import
        #[arg(long)]
        csv: PathBuf,
        /// Catalog file to write
        #[arg(long)]
        output: PathBuf,
        /// Also write the identifier -> UPC table here
        #[arg(long)]
        barcodes: Option<PathBuf>,
    },
    /// Merge a spreadsheet into an existing catalog
    Add {
        /// Spreadsheet with the new movies
        #[arg(long)]
        csv: PathBuf,
        /// Existing catalog
        #[arg(long)]
        catalog: PathBuf,
        /// Where to write the merged catalog (defaults to <catalog>.rc)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Replace existing entries instead of skipping duplicates
        #[arg(long)]
        overwrite: bool,
        /// Also write the identifier -> UPC table here
        #[arg(long)]
        barcodes: Option<PathBuf>,
    },
    /// Re-apply sort key overrides to an existing catalog
    Refresh {
        /// Existing catalog
        #[arg(long)]
        catalog: PathBuf,
        /// Where to write the re-sorted catalog (defaults to <catalog>.rc)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print a one-line summary of every movie, optionally limited to a group
    List {
        /// Catalog to read
        #[arg(long)]
        catalog: PathBuf,
        /// Only movies carrying this group tag
        #[arg(long)]
        group: Option<String>,
    },
}

fn release_candidate(catalog: &Path) -> PathBuf {
    let mut name = catalog.as_os_str().to_owned();
    name.push(RELEASE_CANDIDATE_SUFFIX);
    PathBuf::from(name)
}

fn print_result(result: &PipelineResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("\n📊 Results for {}:", result.command);
    println!("   Rows read: {}", result.rows_read);
    println!("   Inserted: {}", result.inserted);
    println!("   Overwritten: {}", result.overwritten);
    println!("   Duplicates skipped: {}", result.skipped);
    if result.command == "refresh" {
        println!("   Sort keys refreshed: {}", result.sort_keys_refreshed);
    }
    println!("   Records written: {}", result.records_written);
    println!("   Output file: {}", result.output);
    if let Some(barcodes) = &result.barcode_file {
        println!("   Barcode file: {}", barcodes);
    }

    let skipped: Vec<&str> = result
        .events
        .iter()
        .filter_map(|event| match event {
            MergeEvent::DuplicateSkipped { title, .. } => Some(title.as_str()),
            _ => None,
        })
        .collect();
    if !skipped.is_empty() {
        println!("\n⚠️  Duplicates skipped:");
        for title in skipped {
            println!("   - {}", title);
        }
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.metrics_file.is_some() {
        metrics::init().map_err(|e| anyhow::anyhow!("{}", e))?;
    }

    match cli.command {
        Commands::Import { csv, output, barcodes } => {
            let config = Config::load(&cli.config)?;
            let pipeline = Pipeline::new(config.reference_tables());
            let output = YamlFileStorage::new(output);

            let result = pipeline
                .import(&csv, &output, barcodes.as_deref())
                .with_context(|| format!("Import of '{}' failed", csv.display()))?;
            print_result(&result, cli.json)?;
        }
        Commands::Add { csv, catalog, output, overwrite, barcodes } => {
            let config = Config::load(&cli.config)?;
            let pipeline = Pipeline::new(config.reference_tables());
            let output = output.unwrap_or_else(|| release_candidate(&catalog));
            let existing = YamlFileStorage::new(catalog);
            let output = YamlFileStorage::new(output);

            let result = pipeline
                .add(
                    &csv,
                    &existing,
                    &output,
                    DuplicatePolicy::from_overwrite(overwrite),
                    barcodes.as_deref(),
                )
                .with_context(|| format!("Adding '{}' failed", csv.display()))?;
            print_result(&result, cli.json)?;
            if !cli.json {
                println!(
                    "\nCompare '{}' with '{}' before replacing it.",
                    output.describe(),
                    existing.describe()
                );
            }
        }
        Commands::Refresh { catalog, output } => {
            let config = Config::load(&cli.config)?;
            let pipeline = Pipeline::new(config.reference_tables());
            let output = output.unwrap_or_else(|| release_candidate(&catalog));
            let existing = YamlFileStorage::new(catalog);
            let output = YamlFileStorage::new(output);

            let result = pipeline
                .refresh(&existing, &output)
                .context("Sort key refresh failed")?;
            print_result(&result, cli.json)?;
        }
        Commands::List { catalog, group } => {
            let movies = YamlFileStorage::new(catalog).load()?;
            let mut total = 0;
            let entries: Box<dyn Iterator<Item = (&String, &MovieRecord)>> =
                match group.as_deref() {
                    Some(group) => Box::new(filter_by_group(&movies, group)),
                    None => Box::new(movies.iter()),
                };
            for (_, movie) in entries {
                println!("{}", movie.marquee());
                total += 1;
            }
            println!("\nTotal number of titles: {}", total);
        }
    }

    if let Some(path) = &cli.metrics_file {
        metrics::write_to_file(path)
            .with_context(|| format!("Writing metrics to '{}' failed", path.display()))?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    observability::init_logging();

    let cli = Cli::parse();
    info!("mvdb starting");

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}
