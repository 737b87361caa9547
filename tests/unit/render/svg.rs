use super::*;
use crate::foundation::core::{Size, Vec2};
use crate::lesson::model::{DrawingInstruction, InstructionKind};

fn sample() -> Vec<RenderedElement> {
    let origin = Point::new(120.0, 220.0);
    let specs = [
        DrawingInstruction::text("a < b & \"c\"", origin).with_font_size(20),
        DrawingInstruction::new(InstructionKind::Line, origin),
        DrawingInstruction::new(InstructionKind::Arrow, origin)
            .with_endpoint(Point::new(220.0, 220.0)),
        DrawingInstruction::new(InstructionKind::Rectangle, origin)
            .with_size(Size::new(80.0, 40.0)),
        DrawingInstruction::new(InstructionKind::Ellipse, origin),
    ];
    specs
        .iter()
        .enumerate()
        .map(|(i, ins)| RenderedElement::from_instruction(format!("e{i}"), ins))
        .collect()
}

#[test]
fn document_parses_and_contains_every_element() {
    let svg = render_svg(&sample(), Canvas::default(), Some("Step <1>"));
    assert!(svg.starts_with("<svg"));
    assert!(svg.ends_with("</svg>"));
    for id in ["e0", "e1", "e2", "e3", "e4"] {
        assert!(svg.contains(&format!(r#"id="{id}""#)), "missing {id}");
    }
    assert!(svg.contains("a &lt; b &amp; &quot;c&quot;"));
    assert!(svg.contains("Step &lt;1&gt;"));
    assert!(svg.contains(r#"font-weight="600""#));
    // Arrow pointing +x gets its head behind the tip.
    assert!(svg.contains(r#"<polygon points="220,220 "#));
    assert!(svg.contains("210,225"));
    assert!(svg.contains("210,215"));
    assert!(svg.contains(r#"<ellipse id="e4" cx="170" cy="245" rx="50" ry="25""#));

    usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
}

#[test]
fn zero_length_arrow_has_no_head() {
    let el = RenderedElement {
        id: "z".to_owned(),
        origin: Point::new(100.0, 200.0),
        stroke_color: "#000000".to_owned(),
        stroke_width: 2,
        shape: ElementShape::Arrow { delta: Vec2::ZERO },
    };
    let svg = render_svg(&[el], Canvas::default(), None);
    assert!(!svg.contains("<polygon"));
}

#[test]
fn sink_keeps_latest_document_with_caption() {
    let mut sink = SvgSink::new(Canvas::default());
    sink.set_explanation("narration");
    sink.replace_all(&sample()[..1]).unwrap();
    sink.replace_all(&sample()).unwrap();
    assert_eq!(sink.frames_written(), 2);
    let last = sink.last_svg().unwrap();
    assert!(last.contains("narration"));
    assert!(last.contains(r#"id="e4""#));
}

#[test]
fn sink_writes_numbered_files() {
    let dir = std::path::PathBuf::from("target").join("svg_sink_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let _ = std::fs::remove_file(dir.join("frame-0001.svg"));

    let mut sink = SvgSink::writing_to(Canvas::default(), &dir);
    sink.replace_all(&sample()).unwrap();
    let written = std::fs::read_to_string(dir.join("frame-0001.svg")).unwrap();
    assert_eq!(Some(written.as_str()), sink.last_svg());
}

#[test]
fn unwritable_directory_is_a_render_failure() {
    let mut sink = SvgSink::writing_to(Canvas::default(), "target/does/not/exist/svg");
    let err = sink.replace_all(&sample()).unwrap_err();
    assert!(matches!(err, ChalkboardError::RenderCallback(_)));
    assert_eq!(sink.frames_written(), 0);
}

#[test]
fn control_characters_are_dropped_from_text() {
    let ins = DrawingInstruction::text("x\u{1}y\u{FFFF}\tz", Point::new(100.0, 200.0));
    let el = RenderedElement::from_instruction("t", &ins);
    let svg = render_svg(&[el], Canvas::default(), Some("bell\u{7}"));
    assert!(svg.contains(">xy\tz</text>"));
    assert!(svg.contains(">bell</text>"));
    usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
}
