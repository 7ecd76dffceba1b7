use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

mod batch;
mod worker;

pub use batch::{
    BatchError, BatchItem, BatchOutcome, DocumentSummary, run_batch, run_file_batch,
};
pub use worker::worker_task;

// Re-export types from library crates
pub use pdf_stack::{CombineOptions, CombineStatistics, ProcessingResult};

/// Commands sent from the caller to the worker
#[derive(Debug)]
pub enum PdfCommand {
    /// Combine in-memory documents; results arrive as `DocumentComplete` updates
    CombineBatch {
        items: Vec<BatchItem>,
        options: CombineOptions,
    },
    /// Combine files, writing `{stem}{suffix}.pdf` into `output_dir`
    CombineFiles {
        input_paths: Vec<PathBuf>,
        output_dir: PathBuf,
        options: CombineOptions,
    },
    CalculateStats {
        input_path: PathBuf,
    },
    Shutdown,
}

/// Updates sent from worker to the caller
#[derive(Debug, Clone)]
pub enum PdfUpdate {
    Progress {
        document: usize,
        current: usize,
        total: usize,
    },
    DocumentComplete {
        document: usize,
        source_name: String,
        output_name: String,
        pair_count: usize,
        elapsed_seconds: f64,
        /// Output bytes for in-memory batches; empty when written to disk
        bytes: Vec<u8>,
    },
    DocumentFailed {
        document: usize,
        source_name: String,
        message: String,
    },
    BatchComplete {
        succeeded: usize,
        failed: usize,
        elapsed_seconds: f64,
    },
    StatsCalculated {
        source_name: String,
        stats: CombineStatistics,
    },
    Error {
        message: String,
    },
}

/// Shared flag that stops a batch before its next document
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
