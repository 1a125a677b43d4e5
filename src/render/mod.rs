//! # Render Boundary
//!
//! The seam between the layout engine and whatever actually draws pages.
//! The engine emits a [`LayoutPlan`](crate::layout::LayoutPlan); a
//! [`FormCanvas`] implementation consumes it op by op via [`replay`].
//!
//! Backends declare up front which field kinds they can realize as native
//! interactive controls. The replay loop queries that capability before
//! each field placement and substitutes a visible-text fallback for
//! anything unsupported, instead of letting the backend fail mid-field.

use crate::field::{FieldDescriptor, FieldKind};
use crate::font::FontWeight;
use crate::layout::{LayoutPlan, PlacementOp, BODY_SIZE};

/// Whether a backend can realize a field kind as a native control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSupport {
    Native,
    Unsupported,
}

/// Actual size a backend gave a placed control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedSize {
    pub width: f64,
    pub height: f64,
}

/// A backend's refusal to place one field. Replay degrades that single
/// field to text and keeps going.
#[derive(Debug, Clone, thiserror::Error)]
#[error("field {name:?} could not be placed: {reason}")]
pub struct PlaceError {
    pub name: String,
    pub reason: String,
}

/// A drawing backend the layout plan replays into.
pub trait FormCanvas {
    fn draw_text(&mut self, text: &str, x: f64, y: f64, weight: FontWeight, size: f64);

    fn draw_rule(&mut self, x0: f64, x1: f64, y: f64);

    fn place_field(
        &mut self,
        field: &FieldDescriptor,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<PlacedSize, PlaceError>;

    fn start_new_page(&mut self);

    /// Capability query, answered before any placement is attempted.
    fn field_support(&self, kind: FieldKind) -> FieldSupport {
        let _ = kind;
        FieldSupport::Native
    }
}

/// Replay a buffered plan into a canvas in order.
///
/// A field the canvas doesn't support, or refuses at placement time, is
/// drawn as a bracketed-name text marker at the same position so the
/// document stays readable. Each degradation is logged.
pub fn replay(plan: &LayoutPlan, canvas: &mut impl FormCanvas) {
    for op in &plan.ops {
        match op {
            PlacementOp::DrawText { text, x, y, weight, size } => {
                canvas.draw_text(text, *x, *y, *weight, *size);
            }
            PlacementOp::DrawRule { x0, x1, y } => canvas.draw_rule(*x0, *x1, *y),
            PlacementOp::PageBreak => canvas.start_new_page(),
            PlacementOp::PlaceField { field, x, y, width, height } => {
                if canvas.field_support(field.kind) == FieldSupport::Unsupported {
                    log::warn!(
                        "backend has no native control for {:?} field {:?}; degrading to text",
                        field.kind,
                        field.name
                    );
                    fallback_text(canvas, field, *x, *y);
                    continue;
                }
                if let Err(err) = canvas.place_field(field, *x, *y, *width, *height) {
                    log::warn!("{err}; degrading to text");
                    fallback_text(canvas, field, *x, *y);
                }
            }
        }
    }
}

fn fallback_text(canvas: &mut impl FormCanvas, field: &FieldDescriptor, x: f64, y: f64) {
    canvas.draw_text(&format!("[{}]", field.name), x, y, FontWeight::Regular, BODY_SIZE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::classify;
    use crate::field::extract::extract_fields;
    use crate::font::FontContext;
    use crate::layout::{FlowLayout, PageMetrics};

    #[derive(Debug, PartialEq)]
    enum Recorded {
        Text(String),
        Rule,
        Field(String),
        NewPage,
    }

    struct Recording {
        ops: Vec<Recorded>,
        unsupported: Vec<FieldKind>,
        refuse: Vec<String>,
    }

    impl Recording {
        fn new() -> Self {
            Recording { ops: Vec::new(), unsupported: Vec::new(), refuse: Vec::new() }
        }
    }

    impl FormCanvas for Recording {
        fn draw_text(&mut self, text: &str, _x: f64, _y: f64, _weight: FontWeight, _size: f64) {
            self.ops.push(Recorded::Text(text.to_string()));
        }

        fn draw_rule(&mut self, _x0: f64, _x1: f64, _y: f64) {
            self.ops.push(Recorded::Rule);
        }

        fn place_field(
            &mut self,
            field: &FieldDescriptor,
            _x: f64,
            _y: f64,
            width: f64,
            height: f64,
        ) -> Result<PlacedSize, PlaceError> {
            if self.refuse.contains(&field.name) {
                return Err(PlaceError {
                    name: field.name.clone(),
                    reason: "refused".to_string(),
                });
            }
            self.ops.push(Recorded::Field(field.name.clone()));
            Ok(PlacedSize { width, height })
        }

        fn start_new_page(&mut self) {
            self.ops.push(Recorded::NewPage);
        }

        fn field_support(&self, kind: FieldKind) -> FieldSupport {
            if self.unsupported.contains(&kind) {
                FieldSupport::Unsupported
            } else {
                FieldSupport::Native
            }
        }
    }

    fn plan_for(text: &str) -> LayoutPlan {
        let fonts = FontContext::new();
        let fields = extract_fields(text);
        let blocks = classify(text, &fields);
        FlowLayout::new(&fonts, PageMetrics::letter()).layout(&blocks)
    }

    #[test]
    fn replay_preserves_op_order() {
        let plan = plan_for("intro\n---\nName: {{text:name}}");
        let mut canvas = Recording::new();
        replay(&plan, &mut canvas);
        assert_eq!(
            canvas.ops,
            vec![
                Recorded::Text("intro".to_string()),
                Recorded::Rule,
                Recorded::Text("Name: ".to_string()),
                Recorded::Field("name".to_string()),
            ]
        );
    }

    #[test]
    fn unsupported_kind_degrades_to_bracketed_name() {
        let plan = plan_for("{{checkbox:agree}} ok");
        let mut canvas = Recording::new();
        canvas.unsupported.push(FieldKind::Checkbox);
        replay(&plan, &mut canvas);
        assert!(canvas.ops.contains(&Recorded::Text("[agree]".to_string())));
        assert!(!canvas.ops.iter().any(|op| matches!(op, Recorded::Field(_))));
    }

    #[test]
    fn placement_refusal_degrades_only_that_field() {
        let plan = plan_for("{{text:good}} {{text:bad}}");
        let mut canvas = Recording::new();
        canvas.refuse.push("bad".to_string());
        replay(&plan, &mut canvas);
        assert!(canvas.ops.contains(&Recorded::Field("good".to_string())));
        assert!(canvas.ops.contains(&Recorded::Text("[bad]".to_string())));
    }

    #[test]
    fn page_break_reaches_the_canvas() {
        let doc = (0..120).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let plan = plan_for(&doc);
        let mut canvas = Recording::new();
        replay(&plan, &mut canvas);
        assert!(canvas.ops.contains(&Recorded::NewPage));
    }
}
