//! # markform
//!
//! A flow layout engine for plain-text form documents. Source text with
//! inline field placeholders (`{{text:name}}`, `{{checkbox:agree}}`,
//! underscore runs, ...) goes in; an ordered sequence of page-addressed
//! placement operations comes out, ready for any renderer that can draw
//! text, rules, and interactive controls.
//!
//! The pipeline:
//!
//! 1. [`field::extract`] — scan the raw text for placeholders, producing
//!    [`field::FieldDescriptor`]s ordered by source offset
//! 2. [`block`] — classify each physical line into a block kind and attach
//!    the descriptors whose placeholders it carries
//! 3. [`layout`] — walk the blocks with a single cursor, checking the page
//!    boundary before every atomic placement, and buffer the op sequence
//! 4. [`render`] — replay the buffered plan into a [`render::FormCanvas`]
//!    backend, degrading unsupported fields to visible text
//!
//! [`export`] is the reverse direction: filled-form value sets back out to
//! spreadsheets.
//!
//! ```
//! use markform::compose;
//!
//! let plan = compose("# Contact\n\nName: {{text:name:250}}");
//! assert_eq!(plan.page_count, 1);
//! ```

pub mod block;
pub mod error;
pub mod export;
pub mod field;
pub mod font;
pub mod layout;
pub mod render;
pub mod text;

pub use error::{MarkformError, Result};
pub use field::{FieldDescriptor, FieldKind};
pub use font::FontContext;
pub use layout::{FlowLayout, LayoutPlan, PageMetrics, PlacementOp};

/// Lay out a source document on US Letter pages with the built-in font
/// metrics.
pub fn compose(text: &str) -> LayoutPlan {
    compose_with(text, PageMetrics::letter())
}

/// Lay out a source document on custom page geometry.
pub fn compose_with(text: &str, page: PageMetrics) -> LayoutPlan {
    let fonts = FontContext::new();
    let fields = field::extract::extract_fields(text);
    let blocks = block::classify(text, &fields);
    FlowLayout::new(&fonts, page).layout(&blocks)
}

/// Lay out a source document and serialize the plan as pretty JSON.
pub fn compose_to_json(text: &str) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&compose(text))
}
