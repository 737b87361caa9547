//! Canned instruction builders for page chrome, fallbacks and simple text layouts.
//!
//! None of these pass through the viewport clamp: chrome such as the title and the step
//! indicator deliberately sits above the drawing region.

use crate::foundation::core::{Point, Rect, Size};
use crate::lesson::model::{DrawingInstruction, InstructionKind, Step};

/// Explanation carried by [`fallback_step`].
pub const FALLBACK_EXPLANATION: &str =
    "Sorry, I couldn't prepare a visual explanation for that question. Please try again.";
/// Static text drawn by [`fallback_step`].
pub const FALLBACK_TEXT: &str = "Let me help you solve this step by step...";

const BODY_COLOR: &str = "#374151";
const HEADING_COLOR: &str = "#1f2937";
const MUTED_COLOR: &str = "#4b5563";
const ACCENT_COLOR: &str = "#3b82f6";
const LINE_SPACING: f64 = 40.0;

/// The single step substituted when generation fails.
pub fn fallback_step() -> Step {
    Step {
        explanation: FALLBACK_EXPLANATION.to_owned(),
        instructions: vec![
            DrawingInstruction::text(FALLBACK_TEXT, Point::new(100.0, 200.0))
                .with_font_size(18)
                .with_color(HEADING_COLOR)
                .with_delay_ms(0),
        ],
        step_number: 1,
        total_steps: 1,
    }
}

/// Lay out free text as one text instruction per non-blank line.
///
/// Lines are trimmed and stacked 40 px apart starting at `origin`; each reveals 500 ms after the
/// previous source line (blank lines still count towards the stagger).
pub fn text_to_instructions(text: &str, origin: Point) -> Vec<DrawingInstruction> {
    let mut y = origin.y;
    let mut out = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        out.push(
            DrawingInstruction::text(line, Point::new(origin.x, y))
                .with_color(BODY_COLOR)
                .with_delay_ms(i as u64 * 500),
        );
        y += LINE_SPACING;
    }
    out
}

/// Lay out an equation followed by its solution steps, joined by down arrows.
pub fn math_walkthrough<S: AsRef<str>>(equation: &str, steps: &[S]) -> Vec<DrawingInstruction> {
    let mut y = 200.0;
    let mut out = vec![
        DrawingInstruction::text(
            format!("Original equation: {}", format_math_text(equation)),
            Point::new(100.0, y),
        )
        .with_font_size(18)
        .with_color(HEADING_COLOR)
        .with_delay_ms(0),
    ];
    y += 60.0;

    for (i, step) in steps.iter().enumerate() {
        let k = i as u64 + 1;
        out.push(
            DrawingInstruction::text(
                format!("Step {k}: {}", format_math_text(step.as_ref())),
                Point::new(120.0, y),
            )
            .with_color(MUTED_COLOR)
            .with_delay_ms(k * 1000),
        );
        if i + 1 < steps.len() {
            out.push(
                DrawingInstruction::new(InstructionKind::Arrow, Point::new(100.0, y + 25.0))
                    .with_endpoint(Point::new(100.0, y + 45.0))
                    .with_color(ACCENT_COLOR)
                    .with_stroke_width(2)
                    .with_delay_ms(k * 1000 + 500),
            );
        }
        y += 70.0;
    }
    out
}

/// Replace ASCII math spellings with their symbols.
///
/// `**` becomes `^`, `sqrt(x)` becomes `√(x)`, and whole-word names such as `pi` or `theta`
/// become their Greek/operator glyphs. Words that merely contain a name (`spin`) are kept.
pub fn format_math_text(text: &str) -> String {
    let text = text.replace("**", "^");
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();
    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            word.push(c);
            continue;
        }
        flush_word(&mut word, c == '(', &mut out);
        out.push(c);
    }
    flush_word(&mut word, false, &mut out);
    out
}

fn flush_word(word: &mut String, before_paren: bool, out: &mut String) {
    let symbol = match word.as_str() {
        "sqrt" if before_paren => Some("√"),
        "pi" => Some("π"),
        "alpha" => Some("α"),
        "beta" => Some("β"),
        "gamma" => Some("γ"),
        "theta" => Some("θ"),
        "delta" => Some("δ"),
        "sum" => Some("∑"),
        "integral" => Some("∫"),
        "infinity" => Some("∞"),
        _ => None,
    };
    out.push_str(symbol.unwrap_or(word.as_str()));
    word.clear();
}

/// Page title text at `y`.
pub fn title(text: &str, y: f64) -> DrawingInstruction {
    DrawingInstruction::text(text, Point::new(100.0, y))
        .with_font_size(20)
        .with_color(HEADING_COLOR)
}

/// "Step n of N" indicator above the drawing region.
pub fn step_indicator(step_number: u32, total_steps: u32) -> DrawingInstruction {
    DrawingInstruction::text(
        format!("Step {step_number} of {total_steps}"),
        Point::new(100.0, 150.0),
    )
    .with_color(ACCENT_COLOR)
}

/// Rectangle outline framing `rect`.
pub fn content_box(rect: Rect, color: &str) -> DrawingInstruction {
    DrawingInstruction::new(InstructionKind::Rectangle, rect.origin())
        .with_size(Size::new(rect.width(), rect.height()))
        .with_color(color)
}

/// Thin horizontal rule of `width` pixels starting at `origin`.
pub fn separator(origin: Point, width: f64, color: &str) -> DrawingInstruction {
    DrawingInstruction::new(InstructionKind::Line, origin)
        .with_endpoint(Point::new(origin.x + width, origin.y))
        .with_color(color)
        .with_stroke_width(1)
}

#[cfg(test)]
#[path = "../../tests/unit/lesson/compose.rs"]
mod tests;
