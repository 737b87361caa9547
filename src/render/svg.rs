//! SVG renderer: turns a cumulative element list into a standalone SVG document.

use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{ChalkboardError, ChalkboardResult};
use crate::render::element::{ElementShape, RenderedElement};
use crate::render::sink::{ExplanationSink, RenderSink};
use std::path::PathBuf;

const ARROW_HEAD_LEN: f64 = 10.0;
const ARROW_HEAD_HALF_WIDTH: f64 = 5.0;
const CAPTION_COLOR: &str = "#1e3a8a";

/// Render `elements` as an SVG document sized to `canvas`.
///
/// `caption`, when given, is drawn along the bottom edge (used for the current explanation).
pub fn render_svg(elements: &[RenderedElement], canvas: Canvas, caption: Option<&str>) -> String {
    let (w, h) = (canvas.width, canvas.height);
    let mut svg = String::with_capacity(256 + elements.len() * 160);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" font-family="system-ui,sans-serif">"#
    ));
    svg.push_str(&format!(r##"<rect width="{w}" height="{h}" fill="#ffffff"/>"##));

    for el in elements {
        write_element(&mut svg, el);
    }

    if let Some(caption) = caption.filter(|c| !c.is_empty()) {
        svg.push_str(&format!(
            r#"<text x="16" y="{}" fill="{CAPTION_COLOR}" font-size="14">{}</text>"#,
            f64::from(h) - 16.0,
            escape_xml(caption),
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn write_element(svg: &mut String, el: &RenderedElement) {
    let id = escape_xml(&el.id);
    let color = escape_xml(&el.stroke_color);
    let sw = el.stroke_width;
    let Point { x, y } = el.origin;
    match &el.shape {
        ElementShape::Text {
            text, font_size, ..
        } => {
            let weight = if *font_size > 16 { "600" } else { "normal" };
            svg.push_str(&format!(
                r#"<text id="{id}" x="{x}" y="{y}" fill="{color}" font-size="{font_size}" font-weight="{weight}" dominant-baseline="hanging">{}</text>"#,
                escape_xml(text),
            ));
        }
        ElementShape::Line { delta } => svg.push_str(&format!(
            r#"<line id="{id}" x1="{x}" y1="{y}" x2="{}" y2="{}" stroke="{color}" stroke-width="{sw}" stroke-linecap="round"/>"#,
            x + delta.x,
            y + delta.y,
        )),
        ElementShape::Arrow { delta } => {
            let end = el.origin + *delta;
            svg.push_str(&format!(
                r#"<g id="{id}"><line x1="{x}" y1="{y}" x2="{}" y2="{}" stroke="{color}" stroke-width="{sw}" stroke-linecap="round"/>"#,
                end.x, end.y,
            ));
            let len = delta.hypot();
            if len > f64::EPSILON {
                let dir = *delta / len;
                let normal = dir.turn_90();
                let base = end - dir * ARROW_HEAD_LEN;
                let left = base + normal * ARROW_HEAD_HALF_WIDTH;
                let right = base - normal * ARROW_HEAD_HALF_WIDTH;
                svg.push_str(&format!(
                    r#"<polygon points="{},{} {},{} {},{}" fill="{color}"/>"#,
                    end.x, end.y, left.x, left.y, right.x, right.y,
                ));
            }
            svg.push_str("</g>");
        }
        ElementShape::Rectangle { size } => svg.push_str(&format!(
            r#"<rect id="{id}" x="{x}" y="{y}" width="{}" height="{}" rx="4" fill="none" stroke="{color}" stroke-width="{sw}"/>"#,
            size.width, size.height,
        )),
        ElementShape::Ellipse { size } => svg.push_str(&format!(
            r#"<ellipse id="{id}" cx="{}" cy="{}" rx="{}" ry="{}" fill="none" stroke="{color}" stroke-width="{sw}"/>"#,
            x + size.width / 2.0,
            y + size.height / 2.0,
            size.width / 2.0,
            size.height / 2.0,
        )),
    }
}

/// Escape markup characters and drop code points XML 1.0 cannot carry.
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if c < '\u{20}' || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}

/// [`RenderSink`] that renders every tick to SVG, optionally writing numbered files.
#[derive(Debug, Default)]
pub struct SvgSink {
    canvas: Canvas,
    out_dir: Option<PathBuf>,
    caption: String,
    frames_written: usize,
    last: Option<String>,
}

impl SvgSink {
    /// Keep only the latest document in memory.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            ..Self::default()
        }
    }

    /// Additionally write `frame-0001.svg`, `frame-0002.svg`, ... into `dir`.
    pub fn writing_to(canvas: Canvas, dir: impl Into<PathBuf>) -> Self {
        Self {
            canvas,
            out_dir: Some(dir.into()),
            ..Self::default()
        }
    }

    /// The most recently rendered document.
    pub fn last_svg(&self) -> Option<&str> {
        self.last.as_deref()
    }

    /// Number of frames rendered so far.
    pub fn frames_written(&self) -> usize {
        self.frames_written
    }
}

impl RenderSink for SvgSink {
    fn replace_all(&mut self, elements: &[RenderedElement]) -> ChalkboardResult<()> {
        let svg = render_svg(elements, self.canvas, Some(&self.caption));
        if let Some(dir) = &self.out_dir {
            let path = dir.join(format!("frame-{:04}.svg", self.frames_written + 1));
            std::fs::write(&path, &svg).map_err(|e| {
                ChalkboardError::render(format!("write '{}': {e}", path.display()))
            })?;
            tracing::debug!(path = %path.display(), elements = elements.len(), "wrote frame");
        }
        self.frames_written += 1;
        self.last = Some(svg);
        Ok(())
    }
}

impl ExplanationSink for SvgSink {
    fn set_explanation(&mut self, text: &str) {
        text.clone_into(&mut self.caption);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
