use crate::foundation::core::{DEFAULT_COLOR, DEFAULT_FONT_SIZE, Point, Size, Viewport};
use crate::foundation::error::{ChalkboardError, ChalkboardResult};
use crate::lesson::model::{DrawingInstruction, InstructionDef, Step, StepDef};

/// Parse raw model output into normalized steps using the default viewport.
///
/// Accepts either a bare JSON array of steps or an object of the form `{"steps": [...]}` (the
/// HTTP endpoint's response shape). Anything else is a [`ChalkboardError::MalformedResponse`].
pub fn parse_steps(raw: &str) -> ChalkboardResult<Vec<Step>> {
    parse_steps_in(raw, Viewport::default())
}

/// Parse raw model output into normalized steps, clamping positions into `viewport`.
#[tracing::instrument(skip(raw), fields(bytes = raw.len()))]
pub fn parse_steps_in(raw: &str, viewport: Viewport) -> ChalkboardResult<Vec<Step>> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| ChalkboardError::malformed(format!("response is not JSON: {e}")))?;
    parse_steps_value_in(value, viewport)
}

/// Normalize an already-decoded JSON value using the default viewport.
pub fn parse_steps_value(value: serde_json::Value) -> ChalkboardResult<Vec<Step>> {
    parse_steps_value_in(value, Viewport::default())
}

fn parse_steps_value_in(
    value: serde_json::Value,
    viewport: Viewport,
) -> ChalkboardResult<Vec<Step>> {
    let value = match value {
        serde_json::Value::Object(mut obj) if obj.contains_key("steps") => obj
            .remove("steps")
            .unwrap_or(serde_json::Value::Null),
        other => other,
    };
    let defs: Vec<StepDef> = serde_json::from_value(value)
        .map_err(|e| ChalkboardError::malformed(format!("unexpected step shape: {e}")))?;
    Ok(normalize_steps(defs, viewport))
}

/// Pure normalization pass: same length and order in, render-safe steps out.
pub(crate) fn normalize_steps(defs: Vec<StepDef>, viewport: Viewport) -> Vec<Step> {
    let total = u32::try_from(defs.len()).unwrap_or(u32::MAX);
    defs.into_iter()
        .enumerate()
        .map(|(i, def)| {
            let step_number = u32::try_from(i + 1).unwrap_or(u32::MAX);
            if def.step_number.is_some_and(|n| n != step_number)
                || def.total_steps.is_some_and(|n| n != total)
            {
                tracing::debug!(
                    claimed_number = ?def.step_number,
                    claimed_total = ?def.total_steps,
                    step_number,
                    total,
                    "renumbering step"
                );
            }
            Step {
                explanation: def.explanation,
                instructions: def
                    .drawing_instructions
                    .into_iter()
                    .map(|ins| normalize_instruction(ins, viewport))
                    .collect(),
                step_number,
                total_steps: total,
            }
        })
        .collect()
}

fn normalize_instruction(def: InstructionDef, viewport: Viewport) -> DrawingInstruction {
    let size = match (def.width, def.height) {
        (Some(w), Some(h)) => Some(Size::new(w, h)),
        _ => None,
    };
    let endpoint = match (def.end_x, def.end_y) {
        (Some(x), Some(y)) => Some(Point::new(x, y)),
        _ => None,
    };

    DrawingInstruction {
        kind: def.kind,
        content: def.content,
        position: viewport.clamp(Point::new(def.x, def.y)),
        size,
        endpoint,
        font_size: def.font_size.unwrap_or(DEFAULT_FONT_SIZE),
        color: def.color.unwrap_or_else(|| DEFAULT_COLOR.to_owned()),
        stroke_width: def.stroke_width,
        delay_ms: def.delay,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lesson/normalize.rs"]
mod tests;
