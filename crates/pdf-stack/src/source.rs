//! Source document handle
//!
//! A `SourceDocument` owns the parsed input and is consumed by the
//! compositor, so the parsed object graph is freed as soon as composition
//! returns, whether it succeeded or not.

use crate::render::get_page_size;
use crate::types::*;
use lopdf::{Document, ObjectId};

/// A parsed input PDF with its page list resolved
pub struct SourceDocument {
    document: Document,
    page_ids: Vec<ObjectId>,
    page_size: PageSize,
}

impl SourceDocument {
    /// Parse `bytes` and resolve the page list.
    ///
    /// Fails with `SourceUnreadable` when the bytes don't parse or the
    /// document has no pages.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let document =
            Document::load_mem(bytes).map_err(|e| StackError::SourceUnreadable(e.to_string()))?;
        Self::from_document(document)
    }

    /// Wrap an already parsed document
    pub fn from_document(document: Document) -> Result<Self> {
        let page_ids: Vec<ObjectId> = document.get_pages().values().copied().collect();

        let first_page = *page_ids
            .first()
            .ok_or_else(|| StackError::SourceUnreadable("document has no pages".to_string()))?;

        let page_size = get_page_size(&document, first_page).map_err(|e| {
            StackError::SourceUnreadable(format!("cannot read first page: {}", e))
        })?;

        log::debug!(
            "Opened source: {} pages, {}x{}pt",
            page_ids.len(),
            page_size.width,
            page_size.height
        );

        Ok(Self {
            document,
            page_ids,
            page_size,
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Size of page 0, used for every output canvas
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Object id of the page at `index`
    pub fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.page_ids
            .get(index)
            .copied()
            .ok_or(StackError::PlanIndexOutOfRange {
                index,
                page_count: self.page_ids.len(),
            })
    }

    /// Size of the page at `index`
    pub fn size_of(&self, index: usize) -> Result<PageSize> {
        get_page_size(&self.document, self.page_id(index)?)
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }
}

impl Drop for SourceDocument {
    fn drop(&mut self) {
        log::trace!("Releasing source document ({} pages)", self.page_ids.len());
    }
}
