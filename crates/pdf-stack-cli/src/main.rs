use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pdf_async_runtime::{CancellationFlag, PdfCommand, PdfUpdate, worker_task};
use pdf_stack::{CombineOptions, PairingPlan};
use std::path::PathBuf;
use tokio::sync::mpsc;

mod logger;

#[derive(Parser)]
#[command(name = "pdfstack", about = "Stack PDF pages two to a sheet", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine each input PDF into a stacked PDF
    Combine {
        /// Input PDF file(s) - each is processed independently
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Directory for the combined files
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// JSON options file; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Report progress every N pairs
        #[arg(long)]
        progress_interval: Option<usize>,

        /// Write content streams uncompressed
        #[arg(long)]
        no_compress: bool,

        /// Fail on pages whose size differs from the first page
        #[arg(long)]
        strict_page_size: bool,

        /// Suffix appended to each output file stem
        #[arg(long)]
        suffix: Option<String>,

        /// Show statistics only, don't generate PDFs
        #[arg(long)]
        stats_only: bool,
    },

    /// Print the pairing plan for a page count (1-based page numbers)
    Plan {
        /// Number of source pages
        #[arg(long)]
        pages: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::StderrLogger::from_verbosity(cli.verbose)
        .init()
        .context("Failed to install logger")?;

    match cli.command {
        Commands::Plan { pages } => {
            let plan = PairingPlan::for_page_count(pages);
            println!("{} pages → {} pairs", pages, plan.len());
            for (n, pair) in plan.iter().enumerate() {
                println!(
                    "  {:>4}: top {:>5}  bottom {:>5}",
                    n + 1,
                    pair.top + 1,
                    pair.bottom + 1
                );
            }
        }

        Commands::Combine {
            input,
            output_dir,
            config,
            progress_interval,
            no_compress,
            strict_page_size,
            suffix,
            stats_only,
        } => {
            let mut options = match config {
                Some(path) => CombineOptions::load(&path)
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => CombineOptions::default(),
            };
            if let Some(interval) = progress_interval {
                options.progress_interval = interval;
            }
            if no_compress {
                options.compress_streams = false;
            }
            if strict_page_size {
                options.strict_page_size = true;
            }
            if let Some(suffix) = suffix {
                options.output_suffix = suffix;
            }
            options.validate()?;

            let commands = if stats_only {
                input
                    .into_iter()
                    .map(|input_path| PdfCommand::CalculateStats { input_path })
                    .collect()
            } else {
                vec![PdfCommand::CombineFiles {
                    input_paths: input,
                    output_dir,
                    options,
                }]
            };

            let failed = run_worker(commands).await;
            if failed > 0 {
                bail!("{} document(s) failed", failed);
            }
        }
    }

    Ok(())
}

/// Run commands on the worker, printing updates. Returns the failure count.
async fn run_worker(commands: Vec<PdfCommand>) -> usize {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let cancel = CancellationFlag::new();

    let ctrl_c_flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Interrupted; stopping after the current document");
            ctrl_c_flag.cancel();
        }
    });

    let worker = tokio::spawn(worker_task(command_rx, update_tx, cancel));
    for command in commands {
        let _ = command_tx.send(command);
    }
    let _ = command_tx.send(PdfCommand::Shutdown);

    let mut failed = 0;
    while let Some(update) = update_rx.recv().await {
        match update {
            PdfUpdate::Progress {
                document,
                current,
                total,
            } => {
                log::info!("[{}] {}/{}", document + 1, current, total);
            }
            PdfUpdate::DocumentComplete {
                source_name,
                output_name,
                pair_count,
                elapsed_seconds,
                ..
            } => {
                println!(
                    "{} → {} ({} pairs, {:.2}s)",
                    source_name, output_name, pair_count, elapsed_seconds
                );
            }
            PdfUpdate::DocumentFailed {
                source_name,
                message,
                ..
            } => {
                failed += 1;
                eprintln!("{}: {}", source_name, message);
            }
            PdfUpdate::BatchComplete {
                succeeded,
                failed: batch_failed,
                elapsed_seconds,
            } => {
                println!(
                    "Done: {} succeeded, {} failed in {:.2}s",
                    succeeded, batch_failed, elapsed_seconds
                );
            }
            PdfUpdate::StatsCalculated { source_name, stats } => {
                println!("{}:", source_name);
                println!("  Source pages: {}", stats.source_pages);
                println!("  Pairs: {}", stats.pairs);
                println!("  Output pages: {}", stats.output_pages);
                println!("  Unpaired pages: {}", stats.unpaired_pages);
            }
            PdfUpdate::Error { message } => {
                failed += 1;
                eprintln!("Error: {}", message);
            }
        }
    }

    if let Err(e) = worker.await {
        log::error!("Worker task failed: {}", e);
        failed += 1;
    }
    failed
}
