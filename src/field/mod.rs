//! # Field Model
//!
//! Parsed representations of interactive-field placeholders and the
//! footprint estimates the layout engine uses to place them.
//!
//! A [`FieldDescriptor`] is created once by the extractor per placeholder
//! match and is immutable afterward. Descriptors are totally ordered by
//! their source span start, which is the only cross-pattern ordering signal
//! once fields leave the raw text.

pub mod extract;

use serde::{Deserialize, Serialize};

use crate::layout::PageMetrics;

/// Default width in points for text-like fields without an explicit width.
pub const DEFAULT_FIELD_WIDTH: f64 = 150.0;

/// Default width in points for a textarea without an explicit width.
pub const DEFAULT_TEXTAREA_WIDTH: f64 = 400.0;

/// Default visible line count for a textarea.
pub const DEFAULT_TEXTAREA_LINES: u32 = 3;

/// Height in points of a single-line field box.
pub const FIELD_BOX_HEIGHT: f64 = 12.0;

/// What kind of interactive control a placeholder denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    Email,
    Number,
    Date,
    Textarea,
    Checkbox,
    Radio,
    Dropdown,
}

/// Start/end byte offsets of a placeholder in the raw document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

/// One parsed interactive-field placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub kind: FieldKind,
    /// Identifier carried into the placed control. Uniqueness is not
    /// enforced; duplicates are preserved and flagged by the extractor.
    pub name: String,
    pub span: SourceSpan,
    /// The exact literal matched in the source, delimiters included.
    pub placeholder: String,
    /// Explicit width for text-like kinds and textareas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Visible line count for textareas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_count: Option<u32>,
    /// Ordered options for radio and dropdown kinds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldDescriptor {
    /// Width for text-like kinds, falling back to the default.
    pub fn text_width(&self) -> f64 {
        self.width.unwrap_or(DEFAULT_FIELD_WIDTH)
    }

    /// Visible line count for textareas, falling back to the default.
    pub fn lines(&self) -> u32 {
        self.line_count.unwrap_or(DEFAULT_TEXTAREA_LINES)
    }

    /// Estimate the on-page footprint of this field before placement.
    ///
    /// The engine checks this estimate against remaining space so a field
    /// never has to be torn back out after a failed placement.
    pub fn footprint(&self, page: &PageMetrics) -> Footprint {
        match self.kind {
            FieldKind::Text | FieldKind::Email | FieldKind::Number | FieldKind::Date => {
                Footprint::inline(self.text_width(), page.line_height)
            }
            FieldKind::Checkbox => Footprint::inline(17.0, page.line_height),
            FieldKind::Dropdown => Footprint {
                width: 150.0,
                height: page.line_height,
                caption: None,
                // One extra line stays reserved below the cursor after placement.
                trailing_gap: page.line_height,
            },
            FieldKind::Radio => {
                if self.options.len() > 2 {
                    // Too many options for inline buttons: rendered as a
                    // dropdown substitute with an instruction line above.
                    Footprint {
                        width: 300.0,
                        height: page.line_height,
                        caption: Some("Select one:"),
                        trailing_gap: page.line_height,
                    }
                } else {
                    Footprint {
                        width: 200.0,
                        height: page.line_height,
                        caption: None,
                        trailing_gap: if self.options.len() == 2 {
                            // Instructional caption under a two-option pair.
                            page.line_height / 2.0
                        } else {
                            0.0
                        },
                    }
                }
            }
            FieldKind::Textarea => Footprint {
                width: self.width.unwrap_or(DEFAULT_TEXTAREA_WIDTH),
                height: f64::from(self.lines()) * page.line_height + 8.0,
                caption: None,
                trailing_gap: 0.0,
            },
        }
    }
}

/// Estimated width/height a field will occupy once placed.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub width: f64,
    /// Vertical space the control itself needs.
    pub height: f64,
    /// Instruction line drawn above the control, when one is needed.
    pub caption: Option<&'static str>,
    /// Extra vertical space consumed below the cursor after placement.
    pub trailing_gap: f64,
}

impl Footprint {
    fn inline(width: f64, line_height: f64) -> Self {
        Footprint {
            width,
            height: line_height,
            caption: None,
            trailing_gap: 0.0,
        }
    }

    /// Total vertical space the placement needs, caption line included.
    pub fn total_height(&self, line_height: f64) -> f64 {
        let caption = if self.caption.is_some() { line_height } else { 0.0 };
        caption + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PageMetrics;

    fn field(kind: FieldKind) -> FieldDescriptor {
        FieldDescriptor {
            kind,
            name: "f".to_string(),
            span: SourceSpan { start: 0, end: 0 },
            placeholder: String::new(),
            width: None,
            line_count: None,
            options: vec![],
        }
    }

    #[test]
    fn text_default_width() {
        let page = PageMetrics::letter();
        let fp = field(FieldKind::Text).footprint(&page);
        assert_eq!(fp.width, 150.0);
        assert_eq!(fp.height, page.line_height);
    }

    #[test]
    fn textarea_height_formula() {
        let page = PageMetrics::letter();
        let mut f = field(FieldKind::Textarea);
        f.line_count = Some(5);
        let fp = f.footprint(&page);
        assert_eq!(fp.height, 5.0 * page.line_height + 8.0);
        assert_eq!(fp.width, 400.0);
    }

    #[test]
    fn radio_three_options_is_dropdown_substitute() {
        let page = PageMetrics::letter();
        let mut f = field(FieldKind::Radio);
        f.options = vec!["A".into(), "B".into(), "C".into()];
        let fp = f.footprint(&page);
        assert_eq!(fp.width, 300.0);
        assert_eq!(fp.caption, Some("Select one:"));
        assert_eq!(fp.total_height(page.line_height), 2.0 * page.line_height);
    }

    #[test]
    fn radio_two_options_reserves_caption_halfline() {
        let page = PageMetrics::letter();
        let mut f = field(FieldKind::Radio);
        f.options = vec!["Yes".into(), "No".into()];
        let fp = f.footprint(&page);
        assert_eq!(fp.width, 200.0);
        assert_eq!(fp.trailing_gap, page.line_height / 2.0);
    }
}
