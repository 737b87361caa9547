use crate::foundation::core::{DEFAULT_COLOR, DEFAULT_FONT_SIZE, Point, Size};
use serde::{Deserialize, Serialize};

/// Visual directive kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructionKind {
    /// A text block; `content` holds the text.
    #[serde(alias = "equation")]
    Text,
    /// A straight line from `position` to `endpoint`.
    Line,
    /// A line with an arrowhead at `endpoint`.
    Arrow,
    /// An axis-aligned rectangle outline at `position` with `size`.
    Rectangle,
    /// An ellipse outline inscribed in the box at `position` with `size`.
    Ellipse,
}

/// Boundary representation of one instruction, as produced by the model and returned over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InstructionDef {
    #[serde(rename = "type", alias = "kind")]
    pub(crate) kind: InstructionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) content: Option<String>,
    pub(crate) x: f64,
    pub(crate) y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) end_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) end_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) font_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) stroke_width: Option<u32>,
    #[serde(
        rename = "delay",
        alias = "delayMs",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) delay: Option<u64>,
}

/// Boundary representation of one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StepDef {
    pub(crate) explanation: String,
    #[serde(alias = "instructions")]
    pub(crate) drawing_instructions: Vec<InstructionDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) step_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) total_steps: Option<u32>,
}

/// One normalized, render-safe drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "InstructionDef")]
pub struct DrawingInstruction {
    /// Directive kind.
    pub kind: InstructionKind,
    /// Text content for text-like kinds.
    pub content: Option<String>,
    /// Anchor position (top-left for text and boxes, start for lines).
    pub position: Point,
    /// Box size for rectangles and ellipses.
    pub size: Option<Size>,
    /// End point for lines and arrows.
    pub endpoint: Option<Point>,
    /// Font size in pixels.
    pub font_size: u32,
    /// CSS color string.
    pub color: String,
    /// Stroke width in pixels; renderers default it to 2.
    pub stroke_width: Option<u32>,
    /// Reveal offset relative to the start of the owning step; absent means 0.
    pub delay_ms: Option<u64>,
}

impl DrawingInstruction {
    /// Create an instruction with default styling and no optional geometry.
    pub fn new(kind: InstructionKind, position: Point) -> Self {
        Self {
            kind,
            content: None,
            position,
            size: None,
            endpoint: None,
            font_size: DEFAULT_FONT_SIZE,
            color: DEFAULT_COLOR.to_owned(),
            stroke_width: None,
            delay_ms: None,
        }
    }

    /// Create a text instruction.
    pub fn text(content: impl Into<String>, position: Point) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::new(InstructionKind::Text, position)
        }
    }

    /// Set the box size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the end point.
    pub fn with_endpoint(mut self, endpoint: Point) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Set the font size.
    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the stroke width.
    pub fn with_stroke_width(mut self, stroke_width: u32) -> Self {
        self.stroke_width = Some(stroke_width);
        self
    }

    /// Set the reveal delay.
    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    /// Effective reveal delay (absent delays count as 0).
    pub fn delay(&self) -> u64 {
        self.delay_ms.unwrap_or(0)
    }
}

impl From<DrawingInstruction> for InstructionDef {
    fn from(ins: DrawingInstruction) -> Self {
        Self {
            kind: ins.kind,
            content: ins.content,
            x: ins.position.x,
            y: ins.position.y,
            width: ins.size.map(|s| s.width),
            height: ins.size.map(|s| s.height),
            end_x: ins.endpoint.map(|p| p.x),
            end_y: ins.endpoint.map(|p| p.y),
            font_size: Some(ins.font_size),
            color: Some(ins.color),
            stroke_width: ins.stroke_width,
            delay: ins.delay_ms,
        }
    }
}

/// One explanatory unit: an explanation plus the instructions that illustrate it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "StepDef")]
pub struct Step {
    /// Narration for this step.
    pub explanation: String,
    /// Instructions in model order.
    pub instructions: Vec<DrawingInstruction>,
    /// 1-based position in the owning sequence.
    pub step_number: u32,
    /// Length of the owning sequence.
    pub total_steps: u32,
}

impl From<Step> for StepDef {
    fn from(step: Step) -> Self {
        Self {
            explanation: step.explanation,
            drawing_instructions: step.instructions.into_iter().map(Into::into).collect(),
            step_number: Some(step.step_number),
            total_steps: Some(step.total_steps),
        }
    }
}
