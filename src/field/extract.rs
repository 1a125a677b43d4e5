//! # Placeholder Extractor
//!
//! Scans raw document text for `{{kind:...}}` field markers and runs of
//! four-or-more underscores, producing [`FieldDescriptor`]s ordered by
//! source offset. Anything `{{...}}`-shaped that doesn't match the grammar
//! is left alone as literal text: extraction fails open, never errors.
//!
//! Patterns are applied in specificity order, not source order. The
//! four-parameter textarea form (`{{textarea:name:LINES:WIDTH}}`) overlaps
//! the two-parameter form, so it must be tried first; a claimed-span check
//! keeps later, less specific patterns off text an earlier pattern already
//! consumed.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{FieldDescriptor, FieldKind, SourceSpan, DEFAULT_FIELD_WIDTH};

static TEXTAREA_LINES_WIDTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{textarea:([^}:]+):(\d+):(\d+)\}\}").unwrap());
static TEXTAREA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{textarea:([^}:]+)(?::(\d+))?\}\}").unwrap());
static TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{text:([^}:]+)(?::(\d+))?\}\}").unwrap());
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{email:([^}:]+)(?::(\d+))?\}\}").unwrap());
static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{number:([^}:]+)(?::(\d+))?\}\}").unwrap());
static DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{date:([^}:]+)(?::(\d+))?\}\}").unwrap());
static CHECKBOX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{checkbox:([^}]+)\}\}").unwrap());
static RADIO: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{radio:([^}:]+):([^}]+)\}\}").unwrap());
static DROPDOWN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{dropdown:([^}:]+):([^}]+)\}\}").unwrap());
static UNDERLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"_{4,}").unwrap());

/// Extract all field descriptors from `text`, sorted by span start.
///
/// Duplicate field names and duplicate placeholder literals are legal; both
/// are flagged with a warning so document authors notice.
pub fn extract_fields(text: &str) -> Vec<FieldDescriptor> {
    let mut fields: Vec<FieldDescriptor> = Vec::new();
    let mut claimed: Vec<(usize, usize)> = Vec::new();

    let claim = |claimed: &mut Vec<(usize, usize)>, start: usize, end: usize| -> bool {
        if claimed.iter().any(|&(s, e)| start < e && s < end) {
            return false;
        }
        claimed.push((start, end));
        true
    };

    // Most specific first: the 4-parameter textarea form overlaps the
    // 2-parameter one.
    for m in TEXTAREA_LINES_WIDTH.captures_iter(text) {
        let whole = m.get(0).unwrap();
        if !claim(&mut claimed, whole.start(), whole.end()) {
            continue;
        }
        fields.push(FieldDescriptor {
            kind: FieldKind::Textarea,
            name: m[1].to_string(),
            span: span_of(whole),
            placeholder: whole.as_str().to_string(),
            width: Some(m[3].parse::<f64>().unwrap_or(DEFAULT_FIELD_WIDTH)),
            line_count: m[2].parse().ok(),
            options: vec![],
        });
    }

    for m in TEXTAREA.captures_iter(text) {
        let whole = m.get(0).unwrap();
        if !claim(&mut claimed, whole.start(), whole.end()) {
            continue;
        }
        // The bare numeric argument is a line count; explicit widths need
        // the three-argument form.
        fields.push(FieldDescriptor {
            kind: FieldKind::Textarea,
            name: m[1].to_string(),
            span: span_of(whole),
            placeholder: whole.as_str().to_string(),
            width: None,
            line_count: m.get(2).and_then(|g| g.as_str().parse().ok()),
            options: vec![],
        });
    }

    for (re, kind) in [
        (&TEXT, FieldKind::Text),
        (&EMAIL, FieldKind::Email),
        (&NUMBER, FieldKind::Number),
        (&DATE, FieldKind::Date),
    ] {
        for m in re.captures_iter(text) {
            let whole = m.get(0).unwrap();
            if !claim(&mut claimed, whole.start(), whole.end()) {
                continue;
            }
            fields.push(FieldDescriptor {
                kind,
                name: m[1].to_string(),
                span: span_of(whole),
                placeholder: whole.as_str().to_string(),
                width: m.get(2).and_then(|g| g.as_str().parse().ok()),
                line_count: None,
                options: vec![],
            });
        }
    }

    for m in CHECKBOX.captures_iter(text) {
        let whole = m.get(0).unwrap();
        if !claim(&mut claimed, whole.start(), whole.end()) {
            continue;
        }
        fields.push(FieldDescriptor {
            kind: FieldKind::Checkbox,
            name: m[1].to_string(),
            span: span_of(whole),
            placeholder: whole.as_str().to_string(),
            width: None,
            line_count: None,
            options: vec![],
        });
    }

    for (re, kind) in [(&RADIO, FieldKind::Radio), (&DROPDOWN, FieldKind::Dropdown)] {
        for m in re.captures_iter(text) {
            let whole = m.get(0).unwrap();
            if !claim(&mut claimed, whole.start(), whole.end()) {
                continue;
            }
            fields.push(FieldDescriptor {
                kind,
                name: m[1].to_string(),
                span: span_of(whole),
                placeholder: whole.as_str().to_string(),
                width: None,
                line_count: None,
                options: m[2].split(',').map(|o| o.trim().to_string()).collect(),
            });
        }
    }

    for m in UNDERLINES.find_iter(text) {
        if !claim(&mut claimed, m.start(), m.end()) {
            continue;
        }
        fields.push(FieldDescriptor {
            kind: FieldKind::Text,
            name: format!("field_{}", fields.len() + 1),
            span: SourceSpan { start: m.start(), end: m.end() },
            placeholder: m.as_str().to_string(),
            width: Some(DEFAULT_FIELD_WIDTH),
            line_count: None,
            options: vec![],
        });
    }

    // The only place cross-pattern ordering is established.
    fields.sort_by_key(|f| f.span.start);

    warn_duplicates(&fields);
    fields
}

fn span_of(m: regex::Match<'_>) -> SourceSpan {
    SourceSpan { start: m.start(), end: m.end() }
}

fn warn_duplicates(fields: &[FieldDescriptor]) {
    let mut names: HashMap<&str, usize> = HashMap::new();
    let mut literals: HashMap<&str, usize> = HashMap::new();
    for f in fields {
        *names.entry(f.name.as_str()).or_insert(0) += 1;
        *literals.entry(f.placeholder.as_str()).or_insert(0) += 1;
    }
    for (name, count) in names {
        if count > 1 {
            log::warn!("field name {name:?} appears {count} times; values will not be merged");
        }
    }
    for (literal, count) in literals {
        if count > 1 {
            log::warn!("placeholder {literal:?} appears {count} times; each occurrence attaches to a separate line");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_with_and_without_width() {
        let fields = extract_fields("{{text:name}} and {{text:email:250}}");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "name");
        assert_eq!(fields[0].text_width(), 150.0);
        assert_eq!(fields[1].name, "email");
        assert_eq!(fields[1].text_width(), 250.0);
        assert!(fields[0].span.start < fields[1].span.start);
    }

    #[test]
    fn sorted_by_offset_across_patterns() {
        let text = "{{checkbox:agree}} {{text:who}} {{dropdown:pick:A,B}}";
        let fields = extract_fields(text);
        let kinds: Vec<_> = fields.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![FieldKind::Checkbox, FieldKind::Text, FieldKind::Dropdown]);
        for f in &fields {
            assert_eq!(&text[f.span.start..f.span.end], f.placeholder);
        }
    }

    #[test]
    fn textarea_two_arg_is_line_count() {
        let fields = extract_fields("{{textarea:comments:5}}");
        assert_eq!(fields[0].kind, FieldKind::Textarea);
        assert_eq!(fields[0].lines(), 5);
        assert_eq!(fields[0].width, None);
    }

    #[test]
    fn textarea_four_param_form_wins() {
        let fields = extract_fields("{{textarea:comments:6:500}}");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].lines(), 6);
        assert_eq!(fields[0].width, Some(500.0));
    }

    #[test]
    fn textarea_bare_defaults_to_three_lines() {
        let fields = extract_fields("{{textarea:notes}}");
        assert_eq!(fields[0].lines(), 3);
    }

    #[test]
    fn radio_options_are_trimmed() {
        let fields = extract_fields("{{radio:pick:A, B ,C}}");
        assert_eq!(fields[0].options, vec!["A", "B", "C"]);
    }

    #[test]
    fn underscore_run_becomes_synthetic_text_field() {
        let line = "_".repeat(38);
        let fields = extract_fields(&line);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].kind, FieldKind::Text);
        assert_eq!(fields[0].name, "field_1");
        assert_eq!(fields[0].text_width(), 150.0);
    }

    #[test]
    fn short_underscore_run_is_ignored() {
        assert!(extract_fields("___").is_empty());
    }

    #[test]
    fn unmatched_braces_fail_open() {
        assert!(extract_fields("{{bogus:thing}} {{text}}").is_empty());
    }

    #[test]
    fn duplicate_literals_both_extracted() {
        let fields = extract_fields("{{text:a}}\n{{text:a}}");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, fields[1].name);
    }
}
