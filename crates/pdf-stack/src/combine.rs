//! End-to-end processing of one document: bytes in, bytes out

use crate::compose::compose;
use crate::options::CombineOptions;
use crate::plan::PairingPlan;
use crate::source::SourceDocument;
use crate::types::*;
use std::time::Instant;

/// Combine one PDF held in memory.
///
/// Opens the source, plans the pairs, composes and serializes. The source is
/// released before serialization starts.
pub fn combine_bytes<F>(
    bytes: &[u8],
    options: &CombineOptions,
    progress: F,
) -> Result<ProcessingResult>
where
    F: FnMut(usize, usize),
{
    options.validate()?;
    let start = Instant::now();

    let source = SourceDocument::from_bytes(bytes)?;
    let plan = PairingPlan::for_page_count(source.page_count());
    log::debug!(
        "Planned {} pairs from {} pages",
        plan.len(),
        source.page_count()
    );

    let output = compose(source, &plan, options, progress)?;
    let bytes = output.to_bytes()?;

    let elapsed = start.elapsed();
    log::debug!(
        "Combined {} pairs into {} bytes in {:.2}s",
        output.page_count(),
        bytes.len(),
        elapsed.as_secs_f64()
    );

    Ok(ProcessingResult {
        pair_count: output.page_count(),
        elapsed,
        bytes,
    })
}

/// Combine one PDF on the blocking thread pool.
///
/// The progress callback runs on the blocking thread.
pub async fn combine_pdf<F>(
    bytes: Vec<u8>,
    options: &CombineOptions,
    progress: F,
) -> Result<ProcessingResult>
where
    F: FnMut(usize, usize) + Send + 'static,
{
    options.validate()?;
    let options = options.clone();

    tokio::task::spawn_blocking(move || combine_bytes(&bytes, &options, progress)).await?
}
