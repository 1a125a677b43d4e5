//! # Inline Run Splitter
//!
//! Splits a text fragment into ordered style runs around `**...**` emphasis
//! spans. Text outside a span is regular; text inside is emphasized with the
//! delimiters stripped. Concatenating all run texts in order reconstructs
//! the fragment with the delimiters removed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::font::FontWeight;

/// The closing delimiter is the nearest subsequent `**` not immediately
/// followed by another `*`. A single embedded `*` inside the span is
/// allowed, which is what `(?:\*[^*]+)*` encodes: a lone `*` must be
/// followed by at least one non-`*` character, so it can neither open nor
/// sit against the closing delimiter.
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+(?:\*[^*]+)*)\*\*").unwrap());

/// Style of a maximal single-style span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunStyle {
    Regular,
    Emphasized,
}

impl RunStyle {
    /// The face a renderer sets this run in.
    pub fn weight(&self) -> FontWeight {
        match self {
            RunStyle::Regular => FontWeight::Regular,
            RunStyle::Emphasized => FontWeight::Bold,
        }
    }
}

/// A maximal span of text sharing one style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineRun {
    pub style: RunStyle,
    pub text: String,
}

impl InlineRun {
    fn regular(text: &str) -> Self {
        InlineRun { style: RunStyle::Regular, text: text.to_string() }
    }

    fn emphasized(text: &str) -> Self {
        InlineRun { style: RunStyle::Emphasized, text: text.to_string() }
    }
}

/// Split `fragment` into ordered style runs.
///
/// Handles zero, one, or many emphasis spans. An opener with no closing
/// delimiter is literal text, not a span. Empty input yields no runs.
pub fn split_runs(fragment: &str) -> Vec<InlineRun> {
    let mut runs = Vec::new();
    let mut last_end = 0;

    for caps in EMPHASIS.captures_iter(fragment) {
        let whole = caps.get(0).unwrap();
        if whole.start() > last_end {
            runs.push(InlineRun::regular(&fragment[last_end..whole.start()]));
        }
        runs.push(InlineRun::emphasized(caps.get(1).unwrap().as_str()));
        last_end = whole.end();
    }

    if last_end < fragment.len() {
        runs.push(InlineRun::regular(&fragment[last_end..]));
    }

    runs
}

/// Does the fragment contain at least one complete emphasis span?
pub fn has_emphasis(fragment: &str) -> bool {
    EMPHASIS.is_match(fragment)
}

/// Strip emphasis delimiters, keeping the span contents.
pub fn strip_emphasis(fragment: &str) -> String {
    split_runs(fragment).into_iter().map(|r| r.text).collect()
}
