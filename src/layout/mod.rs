//! # Flow Layout Engine
//!
//! The heart of markform. Consumes classified blocks in document order,
//! drives a single mutable [`LayoutCursor`], and emits an ordered sequence
//! of placement operations: text runs at coordinates, interactive fields at
//! coordinates, page breaks.
//!
//! Every layout decision is made with the page boundary as a hard
//! constraint. Before each atomic placement — a run, a word, a field — the
//! engine asks the page-break policy whether the exact height that
//! placement needs still fits; if not, it breaks first and retries at the
//! top of the new page. Nothing is placed and then torn back out: a word is
//! never split across a wrap (unless it is wider than the whole content
//! area, in which case it is hard-broken character by character), and a
//! field, once chosen, is always placed in full on one page.
//!
//! The cursor walk per block:
//!
//! - `AtLineStart`: x reset to the left margin at the start of every block
//! - `PlacingRun`: drawing within the current line, advancing x
//! - `Wrapped`: x reset, y advanced by one line height
//! - `PageBroken`: y reset to the top margin, page index incremented
//!
//! Coordinates are top-down: `y` is the distance from the page top and
//! grows as content flows. A PDF-style consumer flips with
//! `page_height - y`.

pub mod page_break;

use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockKind};
use crate::field::{FieldDescriptor, FieldKind, Footprint, FIELD_BOX_HEIGHT};
use crate::font::{FontContext, FontWeight};
use crate::text::{split_runs, strip_emphasis};

/// Body text size in points.
pub const BODY_SIZE: f64 = 10.0;

/// Page geometry the engine lays out into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetrics {
    pub width: f64,
    pub height: f64,
    /// Uniform margin on all four edges.
    pub margin: f64,
    pub line_height: f64,
}

impl PageMetrics {
    /// US Letter with one-inch margins and a 14 pt line grid.
    pub fn letter() -> Self {
        PageMetrics { width: 612.0, height: 792.0, margin: 72.0, line_height: 14.0 }
    }

    pub fn left(&self) -> f64 {
        self.margin
    }

    /// Right content boundary.
    pub fn right(&self) -> f64 {
        self.width - self.margin
    }

    pub fn top(&self) -> f64 {
        self.margin
    }

    /// Last usable vertical offset.
    pub fn bottom(&self) -> f64 {
        self.height - self.margin
    }

    pub fn content_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self::letter()
    }
}

/// Mutable page/position state driving placement. One instance per
/// document, owned exclusively by the engine; documents laid out in
/// parallel each get their own.
#[derive(Debug, Clone, Copy)]
pub struct LayoutCursor {
    pub page_index: usize,
    /// Distance from the page top; grows within a page, reset on break.
    pub y: f64,
    /// Reset to the left margin at the start of every block.
    pub x: f64,
}

/// One atomic, ordered output instruction for the external renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PlacementOp {
    DrawText { text: String, x: f64, y: f64, weight: FontWeight, size: f64 },
    /// Horizontal rule stroke spanning `x0..x1` at `y`.
    DrawRule { x0: f64, x1: f64, y: f64 },
    PlaceField { field: FieldDescriptor, x: f64, y: f64, width: f64, height: f64 },
    PageBreak,
}

/// The engine's buffered output: the full op sequence plus the page count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPlan {
    pub page: PageMetrics,
    pub page_count: usize,
    pub ops: Vec<PlacementOp>,
}

/// The flow layout engine. Single-threaded, synchronous: a pure sequential
/// state-walk over the block list.
pub struct FlowLayout<'a> {
    fonts: &'a FontContext,
    page: PageMetrics,
    cursor: LayoutCursor,
    ops: Vec<PlacementOp>,
}

impl<'a> FlowLayout<'a> {
    pub fn new(fonts: &'a FontContext, page: PageMetrics) -> Self {
        FlowLayout {
            fonts,
            page,
            cursor: LayoutCursor { page_index: 0, y: page.top(), x: page.left() },
            ops: Vec::new(),
        }
    }

    /// Lay out `blocks` in document order and return the buffered plan.
    pub fn layout(mut self, blocks: &[Block]) -> LayoutPlan {
        for block in blocks {
            self.place_block(block);
        }
        LayoutPlan {
            page: self.page,
            page_count: self.cursor.page_index + 1,
            ops: self.ops,
        }
    }

    fn place_block(&mut self, block: &Block) {
        self.cursor.x = self.page.left();
        let lh = self.page.line_height;

        match block.kind {
            BlockKind::Blank => {
                self.cursor.y += lh;
                if page_break::needs_break(self.cursor.y, 0.0, self.page.bottom()) {
                    self.break_page();
                }
            }
            BlockKind::Rule => {
                self.ensure_space(2.0 * lh);
                self.ops.push(PlacementOp::DrawRule {
                    x0: self.page.left(),
                    x1: self.page.right(),
                    y: self.cursor.y + lh / 2.0,
                });
                self.cursor.y += lh;
            }
            BlockKind::Heading1 => self.heading(block.raw[2..].trim(), 16.0, 2.0 * lh),
            BlockKind::Heading2 => self.heading(block.raw[3..].trim(), 14.0, 2.0 * lh),
            BlockKind::Heading3 => self.heading(block.raw[4..].trim(), 12.0, lh),
            BlockKind::WholeBold => {
                let text = strip_emphasis(block.raw.trim());
                let text = text.trim();
                if !text.is_empty() {
                    self.ensure_space(lh);
                    self.flow_segments(&[(text.to_string(), FontWeight::Bold)], BODY_SIZE);
                    self.advance_line();
                }
            }
            BlockKind::Bulleted => self.bullet(block.raw[2..].trim()),
            BlockKind::FieldBearing => self.field_line(block),
            BlockKind::Plain => {
                self.ensure_space(lh);
                self.flow_fragment(block.raw.trim());
                self.advance_line();
            }
        }

        // Cosmetic: one extra line of spacing so the heading two lines down
        // doesn't sit tight against this block.
        if block.heading_follows_blank {
            self.cursor.y += lh;
        }
    }

    // ── Text blocks ─────────────────────────────────────────────────

    fn heading(&mut self, text: &str, size: f64, reserve: f64) {
        if text.is_empty() {
            return;
        }
        self.ensure_space(reserve);
        self.flow_segments(&[(text.to_string(), FontWeight::Bold)], size);
        self.advance_line();
        // Trailing half-line under every heading level.
        self.cursor.y += self.page.line_height / 2.0;
    }

    fn bullet(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.ensure_space(self.page.line_height);
        self.ops.push(PlacementOp::DrawText {
            text: "\u{2022}".to_string(),
            x: self.page.left(),
            y: self.cursor.y,
            weight: FontWeight::Regular,
            size: BODY_SIZE,
        });
        self.cursor.x = self.page.left() + 20.0;
        self.flow_fragment(text);
        // Exactly one full line-height after a bullet, regardless of how
        // many times the text wrapped.
        self.advance_line();
    }

    // ── Field-bearing blocks ────────────────────────────────────────

    fn field_line(&mut self, block: &Block) {
        if block.fields.iter().any(|f| f.kind == FieldKind::Textarea) {
            // Textareas force a dedicated vertical block and take precedence
            // over all other field handling for the line.
            self.textarea_line(block);
            return;
        }
        if block.fields.len() == 1 && block.fields[0].kind == FieldKind::Checkbox {
            self.checkbox_line(block);
            return;
        }
        self.general_field_line(block);
    }

    /// General case: non-textarea fields, left to right by source order,
    /// interleaved with the literal text around them.
    fn general_field_line(&mut self, block: &Block) {
        let lh = self.page.line_height;
        self.ensure_space(lh);

        let mut work = block.raw.as_str();
        let mut gap_below = 0.0f64;

        for field in &block.fields {
            let Some(pos) = work.find(field.placeholder.as_str()) else {
                continue;
            };

            let before = &work[..pos];
            if !before.is_empty() {
                let width = self.measure_fragment(before, BODY_SIZE);
                if self.cursor.x + width > self.page.right() {
                    self.advance_line();
                    self.ensure_space(lh);
                }
                self.flow_fragment(before);
            }

            // A field is never split across lines: wrap first if its
            // estimated footprint would overflow.
            let footprint = field.footprint(&self.page);
            if self.cursor.x + footprint.width > self.page.right() {
                self.advance_line();
                self.ensure_space(lh);
            }
            let placed = self.place_inline_field(field, &footprint);
            self.cursor.x += placed;
            gap_below = gap_below.max(footprint.trailing_gap);

            work = &work[pos + field.placeholder.len()..];
        }

        if !work.trim().is_empty() {
            let mut trailing = work.to_string();
            if !trailing.starts_with([' ', '.', ',', ';', ':', '!', '?', ')']) {
                trailing.insert(0, ' ');
            }
            let width = self.measure_fragment(&trailing, BODY_SIZE);
            if self.cursor.x + width > self.page.right() {
                self.advance_line();
                self.ensure_space(lh);
                self.flow_fragment(trailing.trim());
            } else {
                self.flow_fragment(&trailing);
            }
        }

        self.advance_line();
        self.cursor.y += gap_below;
    }

    /// A lone checkbox stays on the same visual line as its label text.
    fn checkbox_line(&mut self, block: &Block) {
        let lh = self.page.line_height;
        let field = &block.fields[0];
        let pos = match block.raw.find(field.placeholder.as_str()) {
            Some(p) => p,
            None => return,
        };
        let before = &block.raw[..pos];
        let after = &block.raw[pos + field.placeholder.len()..];

        self.ensure_space(lh);
        if !before.trim().is_empty() {
            self.flow_fragment(before);
        }
        let footprint = field.footprint(&self.page);
        let placed = self.place_inline_field(field, &footprint);
        self.cursor.x += placed;
        if !after.trim().is_empty() {
            // Trailing text wraps normally after the checkbox's x-offset.
            self.flow_fragment(&format!(" {}", after.trim()));
        }
        self.advance_line();
    }

    /// Each textarea is processed independently: leading label text, then
    /// the field as a dedicated vertical block, then trailing text on a new
    /// line. Non-textarea placeholders on the same line stay literal.
    fn textarea_line(&mut self, block: &Block) {
        let lh = self.page.line_height;
        let mut work = block.raw.as_str();

        for field in block.fields.iter().filter(|f| f.kind == FieldKind::Textarea) {
            let Some(pos) = work.find(field.placeholder.as_str()) else {
                continue;
            };
            let before = &work[..pos];
            if !before.trim().is_empty() {
                self.ensure_space(lh);
                self.cursor.x = self.page.left();
                self.flow_fragment(before.trim());
                self.advance_line();
            }

            let footprint = field.footprint(&self.page);
            self.ensure_space(footprint.height);
            self.ops.push(PlacementOp::PlaceField {
                field: field.clone(),
                x: self.page.left(),
                y: self.cursor.y,
                width: footprint.width,
                height: footprint.height,
            });
            // The full estimated height is consumed; the next block begins
            // strictly below it.
            self.cursor.y += footprint.height;
            self.cursor.x = self.page.left();

            work = &work[pos + field.placeholder.len()..];
        }

        if !work.trim().is_empty() {
            self.ensure_space(lh);
            self.cursor.x = self.page.left();
            self.flow_fragment(work.trim());
            self.advance_line();
        }
    }

    /// Place a non-textarea field at the cursor. Returns the placed width
    /// the cursor advances by.
    fn place_inline_field(&mut self, field: &FieldDescriptor, footprint: &Footprint) -> f64 {
        let lh = self.page.line_height;
        self.ensure_space(footprint.total_height(lh));

        if let Some(caption) = footprint.caption {
            self.ops.push(PlacementOp::DrawText {
                text: caption.to_string(),
                x: self.cursor.x,
                y: self.cursor.y,
                weight: FontWeight::Regular,
                size: BODY_SIZE,
            });
            self.cursor.y += lh;
        }

        let placed_width = self.placed_width(field, footprint);
        self.ops.push(PlacementOp::PlaceField {
            field: field.clone(),
            x: self.cursor.x,
            y: self.cursor.y,
            width: footprint.width,
            height: control_height(field, lh),
        });
        placed_width
    }

    /// Actual width consumed on the line. Inline radio pairs size to their
    /// labels; everything else consumes its estimated width.
    fn placed_width(&self, field: &FieldDescriptor, footprint: &Footprint) -> f64 {
        if field.kind == FieldKind::Radio && field.options.len() <= 2 {
            field
                .options
                .iter()
                .map(|opt| 18.0 + self.fonts.measure_string(opt, FontWeight::Regular, BODY_SIZE) + 20.0)
                .sum()
        } else {
            footprint.width
        }
    }

    // ── Inline text flow ────────────────────────────────────────────

    /// Split a fragment into style runs and flow them from the cursor.
    fn flow_fragment(&mut self, fragment: &str) {
        let segments: Vec<(String, FontWeight)> = split_runs(fragment)
            .into_iter()
            .map(|run| (run.text, run.style.weight()))
            .collect();
        self.flow_segments(&segments, BODY_SIZE);
    }

    /// Width of a fragment with emphasis measured in the bold face.
    fn measure_fragment(&self, fragment: &str, size: f64) -> f64 {
        split_runs(fragment)
            .iter()
            .map(|run| self.fonts.measure_string(&run.text, run.style.weight(), size))
            .sum()
    }

    /// Flow styled segments from the cursor, wrapping at word boundaries.
    ///
    /// A segment that fits in the remaining width is drawn raw, preserving
    /// its spacing. One that doesn't is word-wrapped; a single word wider
    /// than the whole content area is hard-broken character by character,
    /// filling each line to capacity.
    fn flow_segments(&mut self, segments: &[(String, FontWeight)], size: f64) {
        let lh = self.page.line_height;
        let left = self.page.left();
        let right = self.page.right();

        for (text, weight) in segments {
            let weight = *weight;
            let raw_width = self.fonts.measure_string(text, weight, size);
            if self.cursor.x + raw_width <= right {
                if !text.is_empty() {
                    self.push_text(text.clone(), weight, size);
                    self.cursor.x += raw_width;
                }
                continue;
            }

            let mut pending = String::new();
            let mut pending_x = self.cursor.x;
            for word in text.split_whitespace() {
                let mid_line = self.cursor.x > left;
                let candidate = if mid_line { format!(" {word}") } else { word.to_string() };
                let width = self.fonts.measure_string(&candidate, weight, size);

                if self.cursor.x + width > right {
                    if !pending.is_empty() {
                        self.ops.push(PlacementOp::DrawText {
                            text: std::mem::take(&mut pending),
                            x: pending_x,
                            y: self.cursor.y,
                            weight,
                            size,
                        });
                    }
                    if self.cursor.x > left {
                        self.advance_line();
                        self.ensure_space(lh);
                    }
                    pending_x = self.cursor.x;

                    let word_width = self.fonts.measure_string(word, weight, size);
                    if word_width > self.page.content_width() {
                        self.hard_break_word(word, weight, size);
                        pending_x = self.cursor.x;
                    } else {
                        pending.push_str(word);
                        self.cursor.x += word_width;
                    }
                } else {
                    pending.push_str(&candidate);
                    self.cursor.x += width;
                }
            }
            if !pending.is_empty() {
                self.ops.push(PlacementOp::DrawText {
                    text: pending,
                    x: pending_x,
                    y: self.cursor.y,
                    weight,
                    size,
                });
            }
        }
    }

    /// Character-by-character split of a word wider than the content area.
    /// Fills each line to capacity; every emitted line is nonempty.
    fn hard_break_word(&mut self, word: &str, weight: FontWeight, size: f64) {
        let lh = self.page.line_height;
        let right = self.page.right();
        let mut chars = word.chars().peekable();

        while chars.peek().is_some() {
            let mut segment = String::new();
            let mut width = 0.0;
            while let Some(&ch) = chars.peek() {
                let cw = self.fonts.char_width(ch, weight, size);
                if !segment.is_empty() && self.cursor.x + width + cw > right {
                    break;
                }
                segment.push(ch);
                width += cw;
                chars.next();
            }
            self.push_text(segment, weight, size);
            self.cursor.x += width;
            if chars.peek().is_some() {
                self.advance_line();
                self.ensure_space(lh);
            }
        }
    }

    fn push_text(&mut self, text: String, weight: FontWeight, size: f64) {
        self.ops.push(PlacementOp::DrawText {
            text,
            x: self.cursor.x,
            y: self.cursor.y,
            weight,
            size,
        });
    }

    // ── Cursor transitions ──────────────────────────────────────────

    /// `Wrapped`: x reset, y advanced by one line height.
    fn advance_line(&mut self) {
        self.cursor.y += self.page.line_height;
        self.cursor.x = self.page.left();
    }

    /// Break the page first if `needed` points of height no longer fit.
    fn ensure_space(&mut self, needed: f64) {
        if page_break::needs_break(self.cursor.y, needed, self.page.bottom()) {
            self.break_page();
        }
    }

    /// `PageBroken`: y reset to the top margin, page index incremented.
    fn break_page(&mut self) {
        self.ops.push(PlacementOp::PageBreak);
        self.cursor.y = self.page.top();
        self.cursor.page_index += 1;
    }
}

/// Height in points of the placed control box.
fn control_height(field: &FieldDescriptor, line_height: f64) -> f64 {
    match field.kind {
        FieldKind::Textarea => f64::from(field.lines()) * line_height + 8.0,
        FieldKind::Dropdown => 14.0,
        FieldKind::Radio if field.options.len() > 2 => 14.0,
        _ => FIELD_BOX_HEIGHT,
    }
}
