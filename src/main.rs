/*!
 * Command-line interface for treeclip
 */

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use treeclip::clipboard::copy_to_clipboard;
use treeclip::config::{Args, Config, Destination};
use treeclip::error::{Result, ResultExt, TreeClipError};
use treeclip::exporter::{ExportOptions, Exporter};
use treeclip::report::{ExportReport, Reporter};
use treeclip::utils::count_files;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "treeclip", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("export failed: {:?}", e);
            eprintln!("Error copying file tree: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    // Create and validate configuration
    let mut config = Config::from_args(args)?;
    let selections = config.selections()?;
    config.validate()?;

    let progress = if config.quiet {
        ProgressBar::hidden()
    } else {
        let progress = ProgressBar::new(count_files(&selections, &config.filter));
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        progress.enable_steady_tick(Duration::from_millis(100));
        progress.set_prefix("📄 Exporting");
        progress
    };

    // Exports are single-threaded: sibling reads interleave on one thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| TreeClipError::Config(format!("Failed to start runtime: {}", e)))?;

    let exporter = Exporter::new(ExportOptions::from(&config)).with_progress(progress.clone());

    let start_time = Instant::now();
    let result = runtime
        .block_on(exporter.export(&selections))
        .and_then(|output| deliver(&config.destination, &output).map(|()| output));
    let duration = start_time.elapsed();

    progress.finish_and_clear();

    let report = result.as_ref().ok().map(|output| ExportReport {
        destination: config.destination.clone(),
        duration,
        output_bytes: output.len(),
        stats: exporter.stats(),
        cache: exporter.cache().stats(),
    });

    exporter.shutdown();
    result?;

    info!("export delivered to {}", config.destination);
    if config.quiet {
        return Ok(());
    }

    if config.destination == Destination::Clipboard {
        eprintln!("File tree copied to clipboard!");
    }
    if let Some(report) = report {
        Reporter::new().print_report(&report);
    }

    Ok(())
}

/// Hand the finished export to its destination
fn deliver(destination: &Destination, output: &str) -> Result<()> {
    match destination {
        Destination::Clipboard => {
            copy_to_clipboard(output)?;
        }
        Destination::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .and_then(|()| stdout.flush())
                .with_path(Path::new("<stdout>"))?;
        }
        Destination::File(path) => {
            fs::write(path, output).with_path(path)?;
        }
    }

    Ok(())
}
