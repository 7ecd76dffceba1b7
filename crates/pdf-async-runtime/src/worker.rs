use crate::batch::{run_batch, run_file_batch};
use crate::{CancellationFlag, PdfCommand, PdfUpdate};
use pdf_stack::{SourceDocument, calculate_statistics, load_pdf_bytes};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Async worker task that processes PDF commands and sends updates.
///
/// Runs until `Shutdown` arrives or every command sender is dropped.
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<PdfCommand>,
    update_tx: mpsc::UnboundedSender<PdfUpdate>,
    cancel: CancellationFlag,
) {
    while let Some(cmd) = command_rx.recv().await {
        match cmd {
            PdfCommand::CombineBatch { items, options } => {
                log::debug!("Combining batch of {} documents", items.len());
                run_batch(items, &options, &cancel, &update_tx).await;
            }
            PdfCommand::CombineFiles {
                input_paths,
                output_dir,
                options,
            } => {
                log::debug!(
                    "Combining {} files into {}",
                    input_paths.len(),
                    output_dir.display()
                );
                if let Err(e) = tokio::fs::create_dir_all(&output_dir).await {
                    let _ = update_tx.send(PdfUpdate::Error {
                        message: format!(
                            "Failed to create output directory {}: {e}",
                            output_dir.display()
                        ),
                    });
                    continue;
                }
                run_file_batch(&input_paths, &output_dir, &options, &cancel, &update_tx).await;
            }
            PdfCommand::CalculateStats { input_path } => {
                handle_calculate_stats(input_path, &update_tx).await;
            }
            PdfCommand::Shutdown => {
                log::debug!("Worker shutting down");
                break;
            }
        }
    }
}

async fn handle_calculate_stats(input_path: PathBuf, update_tx: &mpsc::UnboundedSender<PdfUpdate>) {
    let source_name = input_path.display().to_string();

    let page_count = match load_pdf_bytes(&input_path).await {
        Ok(bytes) => tokio::task::spawn_blocking(move || {
            SourceDocument::from_bytes(&bytes).map(|source| source.page_count())
        })
        .await
        .map_err(pdf_stack::StackError::from)
        .and_then(|r| r),
        Err(e) => Err(e),
    };

    let update = match page_count {
        Ok(pages) => PdfUpdate::StatsCalculated {
            source_name,
            stats: calculate_statistics(pages),
        },
        Err(e) => PdfUpdate::Error {
            message: format!("Failed to read {source_name}: {e}"),
        },
    };
    let _ = update_tx.send(update);
}
