//! CLI tool for the copy-bandwidth sweep driver (csweep)

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use colored::Colorize;
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use std::time::Duration;

#[cfg(feature = "cli")]
use copysweeplib::{
    plot_series, read_records, run_sweep, PlotConfig, SizeRange, Sweep, SweepConfig,
    SweepReport, SweepVariant,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "csweep")]
#[command(about = "Drive a GPU copy benchmark across a size sweep, record the results, and plot the bandwidth curve", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Run a sweep against the measurement executable and record the results
    Run {
        /// Path to the measurement executable (omit when using --config)
        executable: Option<PathBuf>,

        /// Load the whole run description from a TOML preset instead of flags
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// First transfer size in the sweep (MB)
        #[arg(long, default_value_t = 8)]
        start: u64,

        /// Sweep upper bound, exclusive (MB)
        #[arg(long, default_value_t = 1024)]
        stop: u64,

        /// Stride between sizes (MB)
        #[arg(long, default_value_t = 128)]
        step: u64,

        /// Explicit comma-separated size list, overriding start/stop/step
        #[arg(long, value_delimiter = ',')]
        sizes: Option<Vec<u64>>,

        /// Argument shape and store column convention
        #[arg(long, value_enum, default_value_t = SweepVariant::LinearCopy)]
        variant: SweepVariant,

        /// Mode flag forwarded to the executable (linear-copy shape only)
        #[arg(long, default_value_t = 0)]
        mode: u64,

        /// Repetitions per size
        #[arg(short, long, default_value_t = 8)]
        reps: u32,

        /// Pacing delay before each invocation, in milliseconds
        #[arg(long, default_value_t = 10)]
        delay_ms: u64,

        /// Record store path
        #[arg(short, long, default_value = "bandwidth_results.csv")]
        out: PathBuf,

        /// Report format (json or text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Render a recorded store as a bandwidth-vs-size chart
    Plot {
        /// Record store to read
        store: PathBuf,

        /// Column convention supplying default field indices
        #[arg(long, value_enum, default_value_t = SweepVariant::LinearCopy)]
        variant: SweepVariant,

        /// Column parsed as the x value (default: the variant's size column)
        #[arg(long)]
        x_field: Option<usize>,

        /// Column parsed as the y value (default: the variant's bandwidth column)
        #[arg(long)]
        y_field: Option<usize>,

        /// Output image path (.svg renders vector output, anything else a bitmap)
        #[arg(short, long, default_value = "bandwidth_plot.png")]
        out: PathBuf,

        /// Chart title
        #[arg(long)]
        title: Option<String>,
    },
    /// Dump a recorded store: header line plus raw records, no aggregation
    Show {
        /// Record store to read
        store: PathBuf,

        /// Output format (json or text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Sweep preset helpers
    Config {
        #[command(subcommand)]
        action: ConfigSubcommand,
    },
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Print a sample sweep preset to stdout
    Sample,
}

#[cfg(feature = "cli")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            executable,
            config,
            start,
            stop,
            step,
            sizes,
            variant,
            mode,
            reps,
            delay_ms,
            out,
            format,
        } => {
            let (exe, variant, sweep, pacing, out) = if let Some(config_path) = config {
                let preset = SweepConfig::from_toml_file(&config_path.to_string_lossy())?;
                let sweep = preset.build_sweep()?;
                (
                    preset.executable.clone(),
                    preset.variant,
                    sweep,
                    preset.pacing(),
                    preset.store.clone(),
                )
            } else {
                let exe = executable.ok_or(
                    "an executable path is required unless --config is given",
                )?;
                let sweep = match sizes {
                    Some(sizes) => Sweep::from_sizes(variant, &sizes, mode, reps)?,
                    None => Sweep::from_range(
                        variant,
                        SizeRange::new(start, stop, step)?,
                        mode,
                        reps,
                    )?,
                };
                (exe, variant, sweep, Duration::from_millis(delay_ms), out)
            };
            handle_run(&exe, &sweep, variant, &out, pacing, &format)?;
        }

        Commands::Plot {
            store,
            variant,
            x_field,
            y_field,
            out,
            title,
        } => {
            handle_plot(&store, variant, x_field, y_field, out, title)?;
        }

        Commands::Show { store, format } => {
            handle_show(&store, &format)?;
        }

        Commands::Config { action } => match action {
            ConfigSubcommand::Sample => {
                print!("{}", SweepConfig::sample_toml());
            }
        },
    }

    Ok(())
}

/// Run the sweep and print the report. Individual run failures are part of
/// a normal completion; only configuration errors exit non-zero.
#[cfg(feature = "cli")]
fn handle_run(
    executable: &PathBuf,
    sweep: &Sweep,
    variant: SweepVariant,
    out: &PathBuf,
    pacing: Duration,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "{} {} points x {} repetitions ({} variant) -> {}",
        "[sweep]".cyan(),
        sweep.len(),
        sweep.repetitions(),
        variant,
        out.display()
    );

    let report = run_sweep(executable, sweep, variant, out, pacing)?;
    print_report(&report, format)?;
    Ok(())
}

#[cfg(feature = "cli")]
fn print_report(report: &SweepReport, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let elapsed = report.finished_at - report.started_at;
    println!(
        "{} {} of {} runs recorded in {}s",
        "[done]".green(),
        report.succeeded,
        report.attempted,
        elapsed.num_seconds()
    );
    for failure in &report.failures {
        println!(
            "{} point {} run {}: {}",
            "[fail]".red(),
            failure.point,
            failure.repetition,
            failure.error
        );
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn handle_plot(
    store: &PathBuf,
    variant: SweepVariant,
    x_field: Option<usize>,
    y_field: Option<usize>,
    out: PathBuf,
    title: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let x = x_field.unwrap_or_else(|| variant.size_field());
    let y = y_field.unwrap_or_else(|| variant.bandwidth_field());

    let mut config = PlotConfig {
        output: out,
        ..PlotConfig::default()
    };
    if let Some(title) = title {
        config.title = title;
    }

    let series = plot_series(store, x, y, &config)?;
    println!(
        "{} {} points (columns {} and {}) -> {}",
        "[plot]".green(),
        series.len(),
        x,
        y,
        config.output.display()
    );
    Ok(())
}

#[cfg(feature = "cli")]
fn handle_show(store: &PathBuf, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (header, records) = read_records(store)?;

    if format == "json" {
        let dump = serde_json::json!({
            "header": header,
            "records": records,
        });
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }

    println!("{}", header.dimmed());
    for record in &records {
        println!("{}", record.join(","));
    }
    println!(
        "{} {} records",
        "[store]".cyan(),
        records.len()
    );
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI features not enabled. Please compile with --features cli");
    std::process::exit(1);
}
