//! Sequential batch processing with per-document isolation
//!
//! Every document gets its own outcome. A failure is reported and the
//! batch moves on to the next document.

use crate::{CancellationFlag, PdfUpdate};
use pdf_stack::{
    CombineOptions, ProcessingResult, StackError, combine_pdf, load_pdf_bytes, output_file_name,
    save_pdf_bytes,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    Combine(#[from] StackError),
    #[error("Cancelled before processing")]
    Cancelled,
}

/// One input document held in memory
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// Original file name, used to derive the output name
    pub name: String,
    pub bytes: Vec<u8>,
}

/// What a successfully combined document produced.
///
/// The output bytes themselves travel once, in `PdfUpdate::DocumentComplete`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentSummary {
    pub pair_count: usize,
    pub elapsed: Duration,
}

impl DocumentSummary {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Result of one document in a batch
#[derive(Debug)]
pub struct BatchOutcome {
    pub source_name: String,
    pub output_name: String,
    pub result: Result<DocumentSummary, BatchError>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Combine every item in order, one at a time.
///
/// `cancel` is checked before each document; documents not started are
/// returned as `BatchError::Cancelled`.
pub async fn run_batch(
    items: Vec<BatchItem>,
    options: &CombineOptions,
    cancel: &CancellationFlag,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) -> Vec<BatchOutcome> {
    let start = Instant::now();
    let mut outcomes = Vec::with_capacity(items.len());

    for (document, item) in items.into_iter().enumerate() {
        let output_name = output_file_name(&item.name, &options.output_suffix);
        let result = if cancel.is_cancelled() {
            Err(BatchError::Cancelled)
        } else {
            combine_one(document, item.bytes, options, update_tx).await
        };

        let result = report(document, &item.name, &output_name, result, update_tx);
        outcomes.push(BatchOutcome {
            source_name: item.name,
            output_name,
            result,
        });
    }

    report_batch(&outcomes, start, update_tx);
    outcomes
}

/// Combine files from disk, writing each output into `output_dir`.
///
/// Read and write failures count against the document they belong to.
pub async fn run_file_batch(
    input_paths: &[PathBuf],
    output_dir: &Path,
    options: &CombineOptions,
    cancel: &CancellationFlag,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) -> Vec<BatchOutcome> {
    let start = Instant::now();
    let mut outcomes = Vec::with_capacity(input_paths.len());

    for (document, path) in input_paths.iter().enumerate() {
        let source_name = path.display().to_string();
        let output_name = output_file_name(path, &options.output_suffix);

        let result = if cancel.is_cancelled() {
            Err(BatchError::Cancelled)
        } else {
            combine_file(document, path, &output_dir.join(&output_name), options, update_tx).await
        };

        let result = report(document, &source_name, &output_name, result, update_tx);
        outcomes.push(BatchOutcome {
            source_name,
            output_name,
            result,
        });
    }

    report_batch(&outcomes, start, update_tx);
    outcomes
}

async fn combine_one(
    document: usize,
    bytes: Vec<u8>,
    options: &CombineOptions,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) -> Result<ProcessingResult, BatchError> {
    let progress_tx = update_tx.clone();
    let result = combine_pdf(bytes, options, move |current, total| {
        let _ = progress_tx.send(PdfUpdate::Progress {
            document,
            current,
            total,
        });
    })
    .await?;
    Ok(result)
}

async fn combine_file(
    document: usize,
    input: &Path,
    output: &Path,
    options: &CombineOptions,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) -> Result<ProcessingResult, BatchError> {
    let bytes = load_pdf_bytes(input).await?;
    let result = combine_one(document, bytes, options, update_tx).await?;
    save_pdf_bytes(&result.bytes, output).await?;
    log::info!("Wrote {}", output.display());
    // Already on disk; the update carries no copy
    Ok(ProcessingResult {
        bytes: Vec::new(),
        ..result
    })
}

/// Send the document's update, handing its output bytes to the receiver
fn report(
    document: usize,
    source_name: &str,
    output_name: &str,
    result: Result<ProcessingResult, BatchError>,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) -> Result<DocumentSummary, BatchError> {
    match result {
        Ok(processed) => {
            let summary = DocumentSummary {
                pair_count: processed.pair_count,
                elapsed: processed.elapsed,
            };
            let _ = update_tx.send(PdfUpdate::DocumentComplete {
                document,
                source_name: source_name.to_string(),
                output_name: output_name.to_string(),
                pair_count: summary.pair_count,
                elapsed_seconds: summary.elapsed_seconds(),
                bytes: processed.bytes,
            });
            Ok(summary)
        }
        Err(e) => {
            log::warn!("Failed to combine {}: {}", source_name, e);
            let _ = update_tx.send(PdfUpdate::DocumentFailed {
                document,
                source_name: source_name.to_string(),
                message: e.to_string(),
            });
            Err(e)
        }
    }
}

fn report_batch(
    outcomes: &[BatchOutcome],
    start: Instant,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
    let _ = update_tx.send(PdfUpdate::BatchComplete {
        succeeded,
        failed: outcomes.len() - succeeded,
        elapsed_seconds: start.elapsed().as_secs_f64(),
    });
}
