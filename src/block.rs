//! # Block Classifier
//!
//! Classifies each physical line of the source document into a block kind
//! using ordered line-prefix rules, attaches the field descriptors whose
//! spans start in the line, and runs the one-blank lookahead that cushions
//! headings with an extra line of spacing.

use crate::field::FieldDescriptor;
use crate::text;

/// The classified kind of one physical input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Blank,
    Rule,
    Heading1,
    Heading2,
    Heading3,
    /// A `**...**` span covering the entire trimmed line.
    WholeBold,
    Bulleted,
    FieldBearing,
    Plain,
}

impl BlockKind {
    pub fn is_heading(&self) -> bool {
        matches!(self, BlockKind::Heading1 | BlockKind::Heading2 | BlockKind::Heading3)
    }
}

/// One classified physical line. Ordering is document order and is
/// load-bearing: it is the only ordering signal left once fields are
/// extracted.
#[derive(Debug, Clone)]
pub struct Block {
    pub kind: BlockKind,
    pub raw: String,
    /// Descriptors whose placeholder occurs in this line, in source order.
    pub fields: Vec<FieldDescriptor>,
    /// Set when the line after this block is blank and the line after that
    /// is a heading: the engine inserts one extra line of spacing so the
    /// heading doesn't sit tight against this block.
    pub heading_follows_blank: bool,
}

/// Split `text` into lines and classify each one.
///
/// Field-to-block matching is positional: each descriptor attaches to the
/// line its source span starts on. A duplicated placeholder literal
/// therefore lands one descriptor per occurrence, on the occurrence's own
/// line, never two on the first line that happens to contain the text.
pub fn classify(text: &str, fields: &[FieldDescriptor]) -> Vec<Block> {
    let segments: Vec<&str> = text.split('\n').collect();
    let mut blocks: Vec<Block> = Vec::with_capacity(segments.len());
    let mut offset = 0usize;

    for (i, segment) in segments.iter().copied().enumerate() {
        let line_start = offset;
        let line_end = line_start + segment.len();
        offset = line_end + 1;
        if i + 1 == segments.len() && segment.is_empty() {
            // A trailing newline does not open an extra blank line.
            break;
        }
        let line = segment.strip_suffix('\r').unwrap_or(segment);

        let line_fields: Vec<FieldDescriptor> = fields
            .iter()
            .filter(|f| f.span.start >= line_start && f.span.start < line_end)
            .cloned()
            .collect();

        // A heading or bullet reading outranks the field match; the
        // descriptors stay attached but only field-bearing blocks place
        // them.
        let kind = classify_line(line, !line_fields.is_empty());
        blocks.push(Block {
            kind,
            raw: line.to_string(),
            fields: line_fields,
            heading_follows_blank: false,
        });
    }

    // One line of lookahead: blank, then (skipping exactly that one blank) a
    // heading or whole-line-bold. Exactly one extra line-height, applied by
    // the engine after the flagged block.
    for i in 0..blocks.len() {
        if !matches!(blocks[i].kind, BlockKind::FieldBearing | BlockKind::Plain) {
            continue;
        }
        let blank_next = blocks.get(i + 1).is_some_and(|b| b.kind == BlockKind::Blank);
        let heading_after = blocks
            .get(i + 2)
            .is_some_and(|b| b.kind.is_heading() || b.kind == BlockKind::WholeBold);
        if blank_next && heading_after {
            blocks[i].heading_follows_blank = true;
        }
    }

    blocks
}

/// First match wins: blank → rule → headings → whole-bold → bulleted →
/// field-bearing → plain.
fn classify_line(line: &str, has_fields: bool) -> BlockKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return BlockKind::Blank;
    }
    if is_rule(trimmed) {
        return BlockKind::Rule;
    }
    if line.starts_with("# ") {
        return BlockKind::Heading1;
    }
    if line.starts_with("## ") {
        return BlockKind::Heading2;
    }
    if line.starts_with("### ") {
        return BlockKind::Heading3;
    }
    if trimmed.len() > 4
        && trimmed.starts_with("**")
        && trimmed.ends_with("**")
        && text::has_emphasis(trimmed)
    {
        return BlockKind::WholeBold;
    }
    if line.starts_with("- ") || line.starts_with("* ") {
        return BlockKind::Bulleted;
    }
    if has_fields {
        return BlockKind::FieldBearing;
    }
    BlockKind::Plain
}

/// Three or more identical rule characters. Underscore runs of four or more
/// are synthetic text-field placeholders, so for `_` only the exact `___`
/// form reads as a rule.
fn is_rule(trimmed: &str) -> bool {
    if trimmed == "___" {
        return true;
    }
    if trimmed.len() < 3 {
        return false;
    }
    let mut chars = trimmed.chars();
    let first = chars.next().unwrap();
    (first == '-' || first == '*') && chars.all(|c| c == first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::extract::extract_fields;

    fn kinds(text: &str) -> Vec<BlockKind> {
        let fields = extract_fields(text);
        classify(text, &fields).iter().map(|b| b.kind).collect()
    }

    #[test]
    fn heading_levels() {
        assert_eq!(
            kinds("# One\n## Two\n### Three"),
            vec![BlockKind::Heading1, BlockKind::Heading2, BlockKind::Heading3]
        );
    }

    #[test]
    fn rules_and_near_rules() {
        assert_eq!(kinds("---"), vec![BlockKind::Rule]);
        assert_eq!(kinds("*****"), vec![BlockKind::Rule]);
        assert_eq!(kinds("___"), vec![BlockKind::Rule]);
        assert_eq!(kinds("--"), vec![BlockKind::Plain]);
        assert_eq!(kinds("-*-"), vec![BlockKind::Plain]);
    }

    #[test]
    fn long_underscore_run_is_field_bearing_not_rule() {
        let line = "_".repeat(38);
        assert_eq!(kinds(&line), vec![BlockKind::FieldBearing]);
    }

    #[test]
    fn whole_bold_requires_full_line() {
        assert_eq!(kinds("**All bold**"), vec![BlockKind::WholeBold]);
        assert_eq!(kinds("**partial** tail"), vec![BlockKind::Plain]);
    }

    #[test]
    fn bullets() {
        assert_eq!(kinds("- item\n* item"), vec![BlockKind::Bulleted, BlockKind::Bulleted]);
    }

    #[test]
    fn field_bearing_line_collects_descriptors_in_order() {
        let text = "A {{text:a}} B {{checkbox:b}}";
        let fields = extract_fields(text);
        let blocks = classify(text, &fields);
        assert_eq!(blocks[0].kind, BlockKind::FieldBearing);
        assert_eq!(blocks[0].fields.len(), 2);
        assert_eq!(blocks[0].fields[0].name, "a");
        assert_eq!(blocks[0].fields[1].name, "b");
    }

    #[test]
    fn duplicate_literal_claims_first_then_next_line() {
        let text = "{{text:a}}\nagain {{text:a}}";
        let fields = extract_fields(text);
        let blocks = classify(text, &fields);
        assert_eq!(blocks[0].fields.len(), 1);
        assert_eq!(blocks[1].fields.len(), 1);
        assert_eq!(blocks[0].fields[0].span.start, 0);
        assert!(blocks[1].fields[0].span.start > 0);
    }

    #[test]
    fn substring_underscore_runs_attach_to_their_own_lines() {
        // The short run is a substring of the long one; positional matching
        // must not pile both descriptors onto the first line.
        let text = format!("Sign: {}\nDate: {}", "_".repeat(38), "_".repeat(12));
        let fields = extract_fields(&text);
        assert_eq!(fields.len(), 2);
        let blocks = classify(&text, &fields);
        assert_eq!(blocks[0].fields.len(), 1);
        assert_eq!(blocks[1].fields.len(), 1);
        assert_eq!(blocks[0].fields[0].name, "field_1");
        assert_eq!(blocks[1].fields[0].name, "field_2");
    }

    #[test]
    fn lookahead_sets_flag_across_exactly_one_blank() {
        let text = "some text\n\n# Heading";
        let fields = extract_fields(text);
        let blocks = classify(text, &fields);
        assert!(blocks[0].heading_follows_blank);
    }

    #[test]
    fn lookahead_rejects_two_blanks() {
        let text = "some text\n\n\n# Heading";
        let fields = extract_fields(text);
        let blocks = classify(text, &fields);
        assert!(!blocks[0].heading_follows_blank);
    }

    #[test]
    fn lookahead_applies_to_whole_bold_too() {
        let text = "Name: {{text:n}}\n\n**Section**";
        let fields = extract_fields(text);
        let blocks = classify(text, &fields);
        assert_eq!(blocks[0].kind, BlockKind::FieldBearing);
        assert!(blocks[0].heading_follows_blank);
    }
}
