use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StackError {
    #[error("Source document unreadable: {0}")]
    SourceUnreadable(String),
    #[error("Plan references page index {index} but the source has {page_count} pages")]
    PlanIndexOutOfRange { index: usize, page_count: usize },
    #[error("Page {page} is {found:?}pt but page 0 is {expected:?}pt")]
    PageSizeMismatch {
        page: usize,
        expected: (f32, f32),
        found: (f32, f32),
    },
    #[error("Failed to serialize output: {0}")]
    SerializationFailure(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, StackError>;

/// Page box of a source page, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    /// Lower-left corner of the box (usually 0, 0)
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            width,
            height,
        }
    }

    /// Build from a `[minX minY maxX maxY]` box
    pub fn from_box(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    /// Size of a stacked output page: same width, twice the height
    pub fn stacked(self) -> (f32, f32) {
        (self.width, self.height * 2.0)
    }

    /// Whether two sizes agree within `tolerance` points on both axes
    pub fn matches(&self, other: &PageSize, tolerance: f32) -> bool {
        (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }
}

/// Outcome of combining one source document
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    /// Number of stacked output pages
    pub pair_count: usize,
    /// Wall time from opening the source to the serialized output
    pub elapsed: Duration,
    /// Serialized output PDF
    pub bytes: Vec<u8>,
}

impl ProcessingResult {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Statistics about a combine run, computed from the page count alone
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombineStatistics {
    /// Total number of source pages
    pub source_pages: usize,
    /// Number of (top, bottom) pairs in the plan
    pub pairs: usize,
    /// Output page count (one per pair)
    pub output_pages: usize,
    /// Source pages that do not appear in any pair
    pub unpaired_pages: usize,
}
