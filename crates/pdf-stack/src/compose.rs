//! Page composition - stacking source pages two to an output page
//!
//! The compositor takes ownership of the source document. Every object the
//! output needs is deep-copied into it, so the source is dropped when
//! `compose` returns and the output stands alone.

use crate::constants::{OUTPUT_PDF_VERSION, PAGE_SIZE_TOLERANCE_PT};
use crate::options::CombineOptions;
use crate::plan::PairingPlan;
use crate::render::{CopyCache, Overlay, render_stacked_page};
use crate::source::SourceDocument;
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// A finished stacked document, ready to serialize
#[derive(Debug, Clone)]
pub struct OutputDocument {
    document: Document,
    page_count: usize,
    page_size: (f32, f32),
    compress_streams: bool,
}

impl OutputDocument {
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Size of every output page (width, height) in points
    pub fn page_size(&self) -> (f32, f32) {
        self.page_size
    }

    /// Borrow the underlying document, e.g. for inspection in tests
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Serialize to PDF bytes.
    ///
    /// Works on a copy, so the output can be serialized any number of times
    /// with identical results.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = self.document.clone();
        doc.prune_objects();
        doc.renumber_objects();
        if self.compress_streams {
            doc.compress();
        }

        let mut writer = Vec::new();
        doc.save_to(&mut writer)
            .map_err(|e| StackError::SerializationFailure(e.to_string()))?;
        Ok(writer)
    }
}

/// Builds the output page tree one stacked page at a time
struct OutputBuilder {
    document: Document,
    pages_tree_id: ObjectId,
    page_refs: Vec<Object>,
    cache: CopyCache,
}

impl OutputBuilder {
    fn new() -> Self {
        let mut document = Document::with_version(OUTPUT_PDF_VERSION);
        let pages_tree_id = document.new_object_id();
        Self {
            document,
            pages_tree_id,
            page_refs: Vec::new(),
            cache: CopyCache::new(),
        }
    }

    fn push_page(
        &mut self,
        source: &Document,
        top: &Overlay,
        bottom: &Overlay,
        canvas: PageSize,
    ) -> Result<()> {
        let page_id = render_stacked_page(
            &mut self.document,
            source,
            top,
            bottom,
            canvas,
            self.pages_tree_id,
            &mut self.cache,
        )?;
        self.page_refs.push(Object::Reference(page_id));
        Ok(())
    }

    /// Write the page tree and catalog
    fn finish(mut self, canvas: PageSize, compress_streams: bool) -> OutputDocument {
        let page_count = self.page_refs.len();
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(self.page_refs)),
            ("Count", Object::Integer(page_count as i64)),
        ]);
        self.document
            .objects
            .insert(self.pages_tree_id, Object::Dictionary(pages_dict));

        let catalog_id = self.document.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_tree_id)),
        ]));
        self.document.trailer.set("Root", catalog_id);

        OutputDocument {
            document: self.document,
            page_count,
            page_size: canvas.stacked(),
            compress_streams,
        }
    }
}

/// Stack the source pages named by `plan`, one output page per pair.
///
/// The plan is checked against the source before any page is created. On
/// error nothing is returned, and both the source and the partial output are
/// dropped. `progress` receives `(completed, total)` at the cadence set by
/// `options.progress_interval`.
pub fn compose<F>(
    source: SourceDocument,
    plan: &PairingPlan,
    options: &CombineOptions,
    mut progress: F,
) -> Result<OutputDocument>
where
    F: FnMut(usize, usize),
{
    let page_count = source.page_count();
    plan.validate(page_count)?;

    let canvas = source.page_size();
    let total = plan.len();
    let mut builder = OutputBuilder::new();

    for (i, pair) in plan.iter().enumerate() {
        let top = overlay_for(&source, pair.top, canvas, options)?;
        let bottom = overlay_for(&source, pair.bottom, canvas, options)?;

        log::trace!("Stacking page {} over page {}", pair.top, pair.bottom);
        builder.push_page(source.document(), &top, &bottom, canvas)?;

        let completed = i + 1;
        if options.should_report(completed, total) {
            progress(completed, total);
        }
    }

    drop(source);

    Ok(builder.finish(canvas, options.compress_streams))
}

/// Resolve a source page and apply the page-size policy
fn overlay_for(
    source: &SourceDocument,
    index: usize,
    canvas: PageSize,
    options: &CombineOptions,
) -> Result<Overlay> {
    let page_id = source.page_id(index)?;
    let size = source.size_of(index)?;

    if !size.matches(&canvas, PAGE_SIZE_TOLERANCE_PT) {
        if options.strict_page_size {
            return Err(StackError::PageSizeMismatch {
                page: index,
                expected: (canvas.width, canvas.height),
                found: (size.width, size.height),
            });
        }
        log::warn!(
            "Page {} is {}x{}pt, expected {}x{}pt; placing unscaled",
            index,
            size.width,
            size.height,
            canvas.width,
            canvas.height
        );
    }

    Ok(Overlay { page_id, size })
}
