//! Shared constants for page stacking
//!
//! This module centralizes magic numbers and constants used throughout
//! planning, composition and output naming.

// =============================================================================
// Pairing
// =============================================================================

/// Source pages per block of the pairing pattern
pub const BLOCK_SIZE: usize = 4;

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

/// Two page sizes closer than this (points) count as equal
pub const PAGE_SIZE_TOLERANCE_PT: f32 = 0.01;

// =============================================================================
// Output
// =============================================================================

/// PDF version written to the output document
pub const OUTPUT_PDF_VERSION: &str = "1.7";

/// Suffix appended to the source file stem
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_Combinado";

/// Report progress every this many pairs (plus the first and the last)
pub const DEFAULT_PROGRESS_INTERVAL: usize = 5;

/// Upper bound when walking `/Parent` links for inherited page attributes
pub const MAX_INHERITANCE_DEPTH: usize = 32;
