use std::{fs, path::PathBuf, process};

use clap::Parser as _;
use log::{LevelFilter, error, info};
use tercet::{
    avec::SentinelPolicy,
    export::export_csv,
    session::{Options, Parser, Recording},
};

#[derive(clap::Parser, Debug)]
#[command(
    name = "tercet",
    version = env!("CARGO_PKG_VERSION"),
    about = "Decode a measurement buffer file and export its levels to CSV",
    long_about = None,
)]
struct Cli {
    /// Buffer file to decode
    input: PathBuf,
    /// Directory for exported CSV files
    #[arg(short, long, default_value = "output")]
    output: PathBuf,
    /// Log nonzero sample sentinels instead of failing
    #[arg(long)]
    lenient: bool,
    /// Only print the summary, without exporting
    #[arg(long)]
    no_export: bool,
    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
    /// Log every scanned record
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => LevelFilter::Error,
        (_, true) => LevelFilter::Debug,
        _ => LevelFilter::Info,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp_secs()
        .init();

    let policy = if cli.lenient {
        SentinelPolicy::Lenient
    } else {
        SentinelPolicy::Strict
    };

    let parser = Parser::new(Options { policy });

    let recording = match parser.load(&cli.input) {
        Ok(r) => r,
        Err(e) => {
            error!("Failed to decode {}: {e}", cli.input.display());
            process::exit(1);
        }
    };

    print_summary(&recording);

    if cli.no_export {
        return;
    }

    if let Err(e) = fs::create_dir_all(&cli.output) {
        error!("Failed to create {}: {e}", cli.output.display());
        process::exit(1);
    }

    match export_csv(&recording.grid, &cli.output) {
        Ok(()) => info!("Exported to {}", cli.output.display()),
        Err(e) => {
            error!("Export failed: {e}");
            process::exit(1);
        }
    }
}

fn print_summary(recording: &Recording) {
    let meta = recording.meta;

    info!("  Samples       : {}", meta.sample_count);
    info!("  Step          : {} ms", meta.step_millis);

    for channel in 0..recording.grid.shape()[0] {
        let Ok(main) = recording.query("main", channel, false) else {
            continue;
        };

        let (min, max) = main
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        if main.is_empty() {
            info!("  Channel {channel}     : no samples");
        } else {
            info!("  Channel {channel}     : {min:.1} to {max:.1} dB");
        }
    }
}
