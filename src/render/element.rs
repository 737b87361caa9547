use crate::foundation::core::{DEFAULT_STROKE_WIDTH, Point, Rect, Size, Vec2};
use crate::lesson::model::{DrawingInstruction, InstructionKind};
use serde::Serialize;

const TEXT_ADVANCE_PER_EM: f64 = 0.6;
const DEFAULT_BOX: Size = Size::new(100.0, 50.0);
const DEFAULT_LINE_DELTA: Vec2 = Vec2::new(100.0, 0.0);
const DEFAULT_ARROW_DELTA: Vec2 = Vec2::new(100.0, 50.0);

/// Renderer-facing representation of one instruction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderedElement {
    /// Stable identifier, unique within one lesson.
    pub id: String,
    /// Anchor point in canvas space.
    pub origin: Point,
    /// CSS stroke (and text fill) color.
    pub stroke_color: String,
    /// Stroke width in pixels.
    pub stroke_width: u32,
    /// Kind-specific geometry.
    pub shape: ElementShape,
}

/// Kind-specific geometry of a [`RenderedElement`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementShape {
    /// Left/top-aligned text with an estimated box.
    Text {
        /// Text to draw.
        text: String,
        /// Font size in pixels.
        font_size: u32,
        /// Estimated text box.
        size: Size,
    },
    /// Straight segment from the origin to `origin + delta`.
    Line {
        /// End point relative to the origin.
        delta: Vec2,
    },
    /// Segment with an arrowhead at `origin + delta`.
    Arrow {
        /// End point relative to the origin.
        delta: Vec2,
    },
    /// Rectangle outline.
    Rectangle {
        /// Box size.
        size: Size,
    },
    /// Ellipse outline inscribed in a box.
    Ellipse {
        /// Box size.
        size: Size,
    },
}

/// Identifier for the `index`-th instruction of step `step_number`.
pub fn element_id(step_number: u32, index: usize) -> String {
    format!("s{step_number}-e{index}")
}

impl RenderedElement {
    /// Convert one instruction into its renderer representation.
    pub fn from_instruction(id: impl Into<String>, ins: &DrawingInstruction) -> Self {
        let origin = ins.position;
        let delta_or = |fallback: Vec2| ins.endpoint.map(|end| end - origin).unwrap_or(fallback);

        let shape = match ins.kind {
            InstructionKind::Text => {
                let text = ins.content.clone().unwrap_or_default();
                let em = f64::from(ins.font_size);
                let width = text.chars().count() as f64 * em * TEXT_ADVANCE_PER_EM;
                ElementShape::Text {
                    text,
                    font_size: ins.font_size,
                    size: Size::new(width, em),
                }
            }
            InstructionKind::Line => ElementShape::Line {
                delta: delta_or(DEFAULT_LINE_DELTA),
            },
            InstructionKind::Arrow => ElementShape::Arrow {
                delta: delta_or(DEFAULT_ARROW_DELTA),
            },
            InstructionKind::Rectangle => ElementShape::Rectangle {
                size: ins.size.unwrap_or(DEFAULT_BOX),
            },
            InstructionKind::Ellipse => ElementShape::Ellipse {
                size: ins.size.unwrap_or(DEFAULT_BOX),
            },
        };

        Self {
            id: id.into(),
            origin,
            stroke_color: ins.color.clone(),
            stroke_width: ins.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH),
            shape,
        }
    }

    /// Axis-aligned bounds in canvas space. Segments report at least a 1x1 box.
    pub fn bounds(&self) -> Rect {
        let size = match &self.shape {
            ElementShape::Text { size, .. }
            | ElementShape::Rectangle { size }
            | ElementShape::Ellipse { size } => *size,
            ElementShape::Line { delta } | ElementShape::Arrow { delta } => {
                let end = self.origin + *delta;
                let r = Rect::from_points(self.origin, end);
                return Rect::from_origin_size(
                    r.origin(),
                    Size::new(r.width().max(1.0), r.height().max(1.0)),
                );
            }
        };
        Rect::from_origin_size(self.origin, size)
    }
}

/// Convert a step's instructions in order, assigning deterministic ids.
pub fn elements_for_step(
    step_number: u32,
    instructions: &[DrawingInstruction],
) -> Vec<RenderedElement> {
    instructions
        .iter()
        .enumerate()
        .map(|(i, ins)| RenderedElement::from_instruction(element_id(step_number, i), ins))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/element.rs"]
mod tests;
