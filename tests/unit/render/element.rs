use super::*;

#[test]
fn text_box_is_estimated_from_char_count() {
    let ins = DrawingInstruction::text("x = 2", Point::new(100.0, 200.0)).with_font_size(20);
    let el = RenderedElement::from_instruction("a", &ins);
    assert_eq!(el.stroke_width, 2);
    match el.shape {
        ElementShape::Text {
            ref text,
            font_size,
            size,
        } => {
            assert_eq!(text, "x = 2");
            assert_eq!(font_size, 20);
            assert!((size.width - 60.0).abs() < 1e-9);
            assert_eq!(size.height, 20.0);
        }
        other => panic!("unexpected shape {other:?}"),
    }
}

#[test]
fn segments_default_their_end_points() {
    let line = RenderedElement::from_instruction(
        "l",
        &DrawingInstruction::new(InstructionKind::Line, Point::new(150.0, 250.0)),
    );
    assert_eq!(
        line.shape,
        ElementShape::Line {
            delta: Vec2::new(100.0, 0.0)
        }
    );
    // A horizontal line still reports a 1px tall box.
    assert_eq!(line.bounds(), Rect::new(150.0, 250.0, 250.0, 251.0));

    let arrow = RenderedElement::from_instruction(
        "a",
        &DrawingInstruction::new(InstructionKind::Arrow, Point::new(150.0, 250.0))
            .with_endpoint(Point::new(120.0, 300.0))
            .with_stroke_width(3),
    );
    assert_eq!(
        arrow.shape,
        ElementShape::Arrow {
            delta: Vec2::new(-30.0, 50.0)
        }
    );
    assert_eq!(arrow.stroke_width, 3);
    assert_eq!(arrow.bounds(), Rect::new(120.0, 250.0, 150.0, 300.0));
}

#[test]
fn boxes_default_to_100_by_50() {
    let el = RenderedElement::from_instruction(
        "r",
        &DrawingInstruction::new(InstructionKind::Ellipse, Point::new(300.0, 300.0)),
    );
    assert_eq!(
        el.shape,
        ElementShape::Ellipse {
            size: Size::new(100.0, 50.0)
        }
    );
}

#[test]
fn step_ids_are_positional() {
    let ins = vec![
        DrawingInstruction::text("a", Point::new(100.0, 200.0)),
        DrawingInstruction::text("b", Point::new(100.0, 240.0)),
    ];
    let ids: Vec<_> = elements_for_step(3, &ins).into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["s3-e0", "s3-e1"]);
}
