use crate::plan::pair_count;
use crate::types::*;

/// Calculate statistics for combining a document of `source_pages` pages
pub fn calculate_statistics(source_pages: usize) -> CombineStatistics {
    let pairs = pair_count(source_pages);

    // Each pair consumes two distinct source pages
    let unpaired_pages = source_pages - pairs * 2;

    CombineStatistics {
        source_pages,
        pairs,
        output_pages: pairs,
        unpaired_pages,
    }
}
