//! Output page rendering
//!
//! Each output page is a blank canvas twice the height of a source page
//! with two overlays: the bottom page in the lower half, the top page in
//! the upper half.

use crate::types::{PageSize, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::xobject::{CopyCache, create_page_xobject};

/// Name of the lower-half XObject in the page resources
const BOTTOM_XOBJECT: &str = "Bottom";

/// Name of the upper-half XObject in the page resources
const TOP_XOBJECT: &str = "Top";

/// One half of a stacked page
pub struct Overlay {
    /// Source page object id
    pub page_id: ObjectId,
    /// The source page's own box, used to cancel a non-zero origin
    pub size: PageSize,
}

/// Render a stacked output page and add it to `output`.
///
/// `canvas` is the page 0 size of the source; the new page is
/// `canvas.width × 2·canvas.height`. Overlays are translated only.
pub fn render_stacked_page(
    output: &mut Document,
    source: &Document,
    top: &Overlay,
    bottom: &Overlay,
    canvas: PageSize,
    parent_pages_id: ObjectId,
    cache: &mut CopyCache,
) -> Result<ObjectId> {
    let (page_width, page_height) = canvas.stacked();

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(page_width),
            Object::Real(page_height),
        ]),
    );

    let mut content_ops = Vec::with_capacity(2);
    let mut xobjects = Dictionary::new();

    // Bottom first; the halves don't overlap so order only fixes the stream layout
    for (name, overlay, y_offset) in [
        (BOTTOM_XOBJECT, bottom, 0.0),
        (TOP_XOBJECT, top, canvas.height),
    ] {
        let xobject_id =
            create_page_xobject(output, source, overlay.page_id, overlay.size, cache)?;
        xobjects.set(name.as_bytes(), Object::Reference(xobject_id));
        content_ops.push(placement_command(name, overlay.size, y_offset));
    }

    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let content = content_ops.join("");
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    Ok(output.add_object(page_dict))
}

/// Content stream command placing an XObject at `(0, y_offset)`.
///
/// The XObject's BBox starts at the source box origin, so the translation
/// subtracts it to land the box's lower-left corner on the target.
fn placement_command(xobject_name: &str, size: PageSize, y_offset: f32) -> String {
    let tx = 0.0 - size.min_x;
    let ty = y_offset - size.min_y;
    format!("q 1 0 0 1 {} {} cm /{} Do Q\n", tx, ty, xobject_name)
}
