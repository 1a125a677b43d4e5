//! # Text Measurement
//!
//! The host text-measurement facility. The layout engine never guesses at
//! character widths: every wrap decision goes through [`FontContext`], which
//! resolves a [`FontWeight`] to the matching advance-width table.

pub mod metrics;

use serde::{Deserialize, Serialize};

/// The two faces the engine sets text in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

impl FontWeight {
    /// The PostScript name a PDF-style renderer would select.
    pub fn face_name(&self) -> &'static str {
        match self {
            FontWeight::Regular => "Helvetica",
            FontWeight::Bold => "Helvetica-Bold",
        }
    }
}

/// Shared measurement context used by the layout engine.
///
/// Stateless today (the metrics tables are built in), but every measurement
/// goes through it so a renderer with real font access can slot in richer
/// metrics without touching the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontContext;

impl FontContext {
    pub fn new() -> Self {
        Self
    }

    /// Advance width of a single character in points.
    pub fn char_width(&self, ch: char, weight: FontWeight, font_size: f64) -> f64 {
        match weight {
            FontWeight::Regular => metrics::regular_width(ch, font_size),
            FontWeight::Bold => metrics::bold_width(ch, font_size),
        }
    }

    /// Width of a string in points.
    pub fn measure_string(&self, text: &str, weight: FontWeight, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, weight, font_size)).sum()
    }
}
