mod combine;
mod compose;
pub mod constants;
mod io;
mod options;
mod plan;
pub mod render;
mod source;
mod stats;
mod types;

pub use combine::{combine_bytes, combine_pdf};
pub use compose::{OutputDocument, compose};
pub use io::{load_pdf_bytes, output_file_name, save_pdf_bytes};
pub use options::*;
pub use plan::{PagePair, PairingPlan, pair_count};
pub use source::SourceDocument;
pub use stats::calculate_statistics;
pub use types::*;
