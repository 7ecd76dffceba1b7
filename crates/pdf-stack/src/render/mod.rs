//! PDF rendering for stacked output pages
//!
//! - Wrapping source pages as Form XObjects
//! - Building the doubled-height output pages
//! - Deep copying PDF objects between documents

mod page;
mod xobject;

pub use page::{Overlay, render_stacked_page};
pub use xobject::{CopyCache, copy_object_deep, create_page_xobject, get_page_size};
