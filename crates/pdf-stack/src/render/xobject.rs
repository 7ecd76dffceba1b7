//! XObject creation for page overlays
//!
//! This module wraps source PDF pages as Form XObjects copied into the
//! output document, so they can be placed with a transformation matrix.

use crate::constants::{DEFAULT_PAGE_DIMENSIONS, MAX_INHERITANCE_DEPTH};
use crate::types::{PageSize, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Maps source object ids to their copies in the output document
pub type CopyCache = HashMap<ObjectId, ObjectId>;

// =============================================================================
// XObject Creation
// =============================================================================

/// Create a Form XObject in `output` from a source page.
///
/// The XObject's BBox is the page's resolved MediaBox (`bbox`), so placing it
/// with a pure translation reproduces the page unscaled. Referenced resources
/// are copied through `cache`, which lets several overlays of the same
/// document share fonts and images.
pub fn create_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    bbox: PageSize,
    cache: &mut CopyCache,
) -> Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?;

    let content_data = get_page_content(source, page_dict)?;

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set("BBox", bbox_array(bbox));
    xobject_dict.set("FormType", Object::Integer(1));

    if let Some(resources) = inherited_attribute(source, page_dict, b"Resources") {
        xobject_dict.set(
            "Resources",
            copy_object_deep(output, source, resources, cache)?,
        );
    }

    Ok(output.add_object(Stream::new(xobject_dict, content_data)))
}

/// BBox built from plain numbers; never carries references into the source
fn bbox_array(size: PageSize) -> Object {
    Object::Array(vec![
        Object::Real(size.min_x),
        Object::Real(size.min_y),
        Object::Real(size.min_x + size.width),
        Object::Real(size.min_y + size.height),
    ])
}

// =============================================================================
// Page Tree Inheritance
// =============================================================================

/// Look up a page attribute, following `/Parent` for inheritable keys.
fn inherited_attribute<'a>(
    doc: &'a Document,
    page_dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = page_dict;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        if let Ok(value) = current.get(key) {
            return resolve(doc, value);
        }
        let parent_id = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        current = doc.get_dictionary(parent_id).ok()?;
    }
    None
}

/// Follow a single reference, if `obj` is one
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

// =============================================================================
// Page Content Extraction
// =============================================================================

/// Get the content stream data from a page.
///
/// References to objects missing from the file count as null, so they
/// contribute no content.
fn get_page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()), // No content = blank page
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id) {
            // Contents may point at an array of streams
            Ok(Object::Array(arr)) => get_concatenated_content_streams(doc, arr),
            Ok(Object::Stream(stream)) => decoded_content(stream),
            _ => Ok(Vec::new()),
        },
        Object::Array(arr) => get_concatenated_content_streams(doc, arr),
        _ => Ok(Vec::new()),
    }
}

/// Concatenate multiple content streams, skipping dangling references
fn get_concatenated_content_streams(doc: &Document, refs: &[Object]) -> Result<Vec<u8>> {
    let mut result = Vec::new();

    for obj in refs {
        let Object::Reference(id) = obj else {
            continue;
        };
        match doc.get_object(*id) {
            Ok(Object::Stream(stream)) => {
                result.extend_from_slice(&decoded_content(stream)?);
                result.push(b'\n');
            }
            Ok(_) => {}
            Err(_) => log::debug!("Skipping missing content stream {} {}", id.0, id.1),
        }
    }

    Ok(result)
}

/// Stream bytes with every filter removed.
///
/// Unfiltered streams are returned as stored. A filter that cannot be decoded
/// is an error: the XObject is written without `/Filter`, so encoded bytes
/// would be unreadable.
fn decoded_content(stream: &Stream) -> Result<Vec<u8>> {
    if stream.dict.has(b"Filter") {
        Ok(stream.decompressed_content()?)
    } else {
        Ok(stream.content.clone())
    }
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object from source to output document, following references.
///
/// Uses a cache to avoid copying the same object multiple times. The id is
/// reserved before recursing so reference cycles (e.g. `/Parent` links inside
/// annotations) terminate. A reference to an object missing from the source
/// is copied as `null`.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut CopyCache,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            let Ok(referenced) = source.get_object(*id) else {
                log::debug!("Dangling reference {} {} copied as null", id.0, id.1);
                return Ok(Object::Null);
            };

            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            let copied = copy_object_deep(output, source, referenced, cache)?;
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => Ok(Object::Stream(Stream {
            dict: copy_dictionary(output, source, &stream.dict, cache)?,
            content: stream.content.clone(),
            allows_compression: stream.allows_compression,
            start_position: None,
        })),
        // Primitive types: just clone
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut CopyCache,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(new_dict)
}

// =============================================================================
// Page Dimensions
// =============================================================================

/// Get a page's MediaBox as a `PageSize`, honoring inheritance.
///
/// Pages without a usable box fall back to US Letter.
pub fn get_page_size(doc: &Document, page_id: ObjectId) -> Result<PageSize> {
    let page_dict = doc.get_dictionary(page_id)?;

    let coords: Option<Vec<f32>> = inherited_attribute(doc, page_dict, b"MediaBox")
        .and_then(|obj| obj.as_array().ok())
        .filter(|mb| mb.len() == 4)
        .and_then(|mb| mb.iter().map(|o| extract_number(resolve(doc, o)?)).collect());

    Ok(match coords.as_deref() {
        Some(&[x0, y0, x1, y1]) => {
            // Boxes may be written with corners in any order
            PageSize::from_box(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
        }
        _ => PageSize::new(DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1),
    })
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
