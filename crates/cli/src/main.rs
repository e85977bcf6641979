//! tabdedup CLI
//!
//! Remove duplicate rows from tabular datasets and inject synthetic
//! duplicates for testing

mod config;
mod report;

use anyhow::{ensure, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::{Path, PathBuf};
use tabdedup_core::hash::table_fingerprint;
use tabdedup_core::{ExactDeduplicator, InjectionRequest, KeepPolicy, Table, DEFAULT_SEED};
use tabdedup_formats::{load_iris, open_table, write_table};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use config::DemoConfig;

#[derive(Parser)]
#[command(name = "tabdedup")]
#[command(version, about = "Tabular duplicate removal and injection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output statistics in JSON format
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Inject duplicates into a reference table, then remove them again
    Demo {
        /// Demo config file (YAML or TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Table file to use instead of the embedded Iris dataset
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Number of duplicate rows to inject
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        duplicates: Option<i64>,

        /// Seed for the duplicate sampler
        #[arg(short, long)]
        seed: Option<u64>,

        /// Sample source rows with replacement
        #[arg(long)]
        allow_repeats: bool,

        /// Which duplicate survives: first, last or none
        #[arg(short, long)]
        keep: Option<KeepPolicy>,

        /// Keep the Iris class label column
        #[arg(long)]
        with_target: bool,
    },

    /// Remove duplicate rows from a table file
    Dedup {
        /// Input file (JSONL or CSV)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Which duplicate survives: first, last or none
        #[arg(short, long, default_value = "first")]
        keep: KeepPolicy,

        /// Also write the removed rows to this file
        #[arg(long)]
        removed: Option<PathBuf>,

        /// Show statistics without writing output
        #[arg(long)]
        dry_run: bool,
    },

    /// Append randomly resampled rows to a table file
    Inject {
        /// Input file (JSONL or CSV)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Number of duplicate rows to inject
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        count: i64,

        /// Seed for the duplicate sampler
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Sample source rows with replacement
        #[arg(long)]
        allow_repeats: bool,
    },

    /// Inspect a table file
    Inspect {
        /// Path to the table file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Number of rows to show
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Count rows and columns in a table file
    Count {
        /// Path to the table file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_ansi(!cli.json) // Disable colors if JSON output
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let outcome = match cli.command {
        Commands::Demo {
            config,
            input,
            duplicates,
            seed,
            allow_repeats,
            keep,
            with_target,
        } => {
            DemoConfig::load_or_default(config.as_deref()).and_then(|mut demo| {
                if input.is_some() {
                    demo.dataset.path = input;
                }
                if let Some(count) = duplicates {
                    demo.injection.count = count;
                }
                if let Some(seed) = seed {
                    demo.injection.seed = seed;
                }
                if let Some(keep) = keep {
                    demo.deduplication.keep = keep.to_string();
                }
                demo.injection.allow_repeats |= allow_repeats;
                demo.dataset.with_target |= with_target;

                run_demo(&demo, cli.json)
            })
        }
        Commands::Dedup {
            input,
            output,
            keep,
            removed,
            dry_run,
        } => dedup_file(&input, &output, keep, removed.as_deref(), dry_run, cli.json),
        Commands::Inject {
            input,
            output,
            count,
            seed,
            allow_repeats,
        } => inject_file(&input, &output, count, seed, allow_repeats, cli.json),
        Commands::Inspect { input, limit } => inspect_table(&input, limit),
        Commands::Count { input } => count_table(&input, cli.json),
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    };

    if let Err(e) = &outcome {
        error!("{:#}", e);
    }
    outcome
}

fn run_demo(demo: &DemoConfig, json_output: bool) -> Result<()> {
    let keep = demo.deduplication.keep_policy()?;

    let table = match &demo.dataset.path {
        Some(path) => open_table(path)?,
        None => load_iris(demo.dataset.with_target)?,
    };

    if !json_output {
        println!("=== Duplicate Removal Demo ===");
        println!("Original dataset shape: {}", report::format_shape(table.shape()));
    }

    let injection = InjectionRequest::new(&table, demo.injection.count)
        .with_seed(demo.injection.seed)
        .with_repeats(demo.injection.allow_repeats)
        .execute()?;
    let augmented = &injection.table;

    if !json_output {
        println!(
            "Dataset with duplicates shape: {}",
            report::format_shape(augmented.shape())
        );
    }

    let result = ExactDeduplicator::new(keep)
        .with_report(demo.deduplication.report)
        .run(augmented)?;

    ensure!(
        result.cleaned_row_count <= table.row_count(),
        "cleaned table has {} rows, more than the {} original rows",
        result.cleaned_row_count,
        table.row_count()
    );

    if json_output {
        let report = serde_json::json!({
            "original_shape": [table.row_count(), table.column_count()],
            "augmented_shape": [augmented.row_count(), augmented.column_count()],
            "injected": injection.injected_count(),
            "seed": demo.injection.seed,
            "allow_repeats": demo.injection.allow_repeats,
            "augmented_fingerprint": format!("{:016x}", table_fingerprint(augmented)),
            "keep": keep.as_str(),
            "duplicates_found": result.duplicates_found,
            "cleaned_shape": [result.cleaned_row_count, result.cleaned.column_count()],
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Cleaned dataset shape: {}",
            report::format_shape(result.cleaned.shape())
        );
        println!("=== Demo completed successfully! ===");
    }

    Ok(())
}

fn dedup_file(
    input: &Path,
    output: &Path,
    keep: KeepPolicy,
    removed: Option<&Path>,
    dry_run: bool,
    json_output: bool,
) -> Result<()> {
    info!("Starting deduplication");
    info!("  Input: {:?}", input);
    if !dry_run {
        info!("  Output: {:?}", output);
    }
    info!("  Keep: {}", keep);

    let table = open_table(input)?;
    let result = ExactDeduplicator::new(keep).with_report(true).run(&table)?;

    if !dry_run {
        write_table(output, &result.cleaned)?;
        if let Some(removed_path) = removed {
            let removed_rows = result.removed_rows(&table)?;
            write_table(removed_path, &removed_rows)?;
            info!("  Removed rows: {:?}", removed_path);
        }
    }

    let written = if dry_run { None } else { Some(output) };
    if json_output {
        let report = report::dedup_json(input, written, &result);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report::print_summary_report(input, written, &result);
    }

    Ok(())
}

fn inject_file(
    input: &Path,
    output: &Path,
    count: i64,
    seed: u64,
    allow_repeats: bool,
    json_output: bool,
) -> Result<()> {
    info!("Injecting {} duplicates into {:?} (seed {})", count, input, seed);

    let table = open_table(input)?;
    let injection = InjectionRequest::new(&table, count)
        .with_seed(seed)
        .with_repeats(allow_repeats)
        .execute()?;

    write_table(output, &injection.table)?;

    let fingerprint = format!("{:016x}", table_fingerprint(&injection.table));
    if json_output {
        let report = serde_json::json!({
            "input": input.to_string_lossy(),
            "output": output.to_string_lossy(),
            "original_rows": table.row_count(),
            "injected": injection.injected_count(),
            "total_rows": injection.table.row_count(),
            "seed": seed,
            "allow_repeats": allow_repeats,
            "fingerprint": fingerprint,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Original rows: {}", report::format_with_commas(table.row_count()));
        println!("Injected rows: {}", report::format_with_commas(injection.injected_count()));
        println!("Total rows:    {}", report::format_with_commas(injection.table.row_count()));
        println!("Fingerprint:   {}", fingerprint);
    }

    Ok(())
}

fn inspect_table(input: &Path, limit: usize) -> Result<()> {
    info!("Inspecting table: {:?}", input);

    let table = open_table(input)?;
    println!("Columns: {}", table.columns().join(", "));
    print_rows(&table, limit);

    info!(
        "Showed {} of {} rows",
        limit.min(table.row_count()),
        table.row_count()
    );
    Ok(())
}

fn print_rows(table: &Table, limit: usize) {
    for (label, row) in table.iter().take(limit) {
        let cells: Vec<String> = row.values().iter().map(|v| v.to_string()).collect();
        println!("Row #{}: {}", label, cells.join(", "));
    }
}

fn count_table(input: &Path, json_output: bool) -> Result<()> {
    info!("Counting rows in: {:?}", input);

    let table = open_table(input)?;
    if json_output {
        let report = serde_json::json!({
            "rows": table.row_count(),
            "columns": table.column_count(),
        });
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("Total rows: {}", report::format_with_commas(table.row_count()));
        println!("Columns:    {}", table.column_count());
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}
