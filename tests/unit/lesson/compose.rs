use super::*;

#[test]
fn fallback_is_one_step_with_one_static_text() {
    let step = fallback_step();
    assert_eq!(step.explanation, FALLBACK_EXPLANATION);
    assert_eq!((step.step_number, step.total_steps), (1, 1));
    assert_eq!(step.instructions.len(), 1);
    let ins = &step.instructions[0];
    assert_eq!(ins.kind, InstructionKind::Text);
    assert_eq!(ins.content.as_deref(), Some(FALLBACK_TEXT));
    assert_eq!(ins.position, Point::new(100.0, 200.0));
    assert_eq!(ins.delay(), 0);
}

#[test]
fn text_lines_skip_blanks_and_stagger_by_source_line() {
    let out = text_to_instructions("  first \n\n second\nthird  ", Point::new(100.0, 200.0));
    let got: Vec<_> = out
        .iter()
        .map(|i| (i.content.clone().unwrap(), i.position.y, i.delay()))
        .collect();
    assert_eq!(
        got,
        vec![
            ("first".to_owned(), 200.0, 0),
            ("second".to_owned(), 240.0, 1000),
            ("third".to_owned(), 280.0, 1500),
        ]
    );
}

#[test]
fn walkthrough_interleaves_arrows_between_steps() {
    let out = math_walkthrough("x**2 = 4", &["take sqrt(4)", "x = 2"]);
    let kinds: Vec<_> = out.iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![
            InstructionKind::Text,
            InstructionKind::Text,
            InstructionKind::Arrow,
            InstructionKind::Text,
        ]
    );
    assert_eq!(
        out[0].content.as_deref(),
        Some("Original equation: x^2 = 4")
    );
    assert_eq!(out[1].content.as_deref(), Some("Step 1: take √(4)"));
    assert_eq!(out[1].delay(), 1000);
    assert_eq!(out[2].delay(), 1500);
    assert_eq!(out[2].endpoint, Some(Point::new(100.0, 305.0)));
    assert_eq!(out[3].position, Point::new(120.0, 330.0));
}

#[test]
fn math_formatting_replaces_whole_words_only() {
    assert_eq!(format_math_text("2*pi*r"), "2*π*r");
    assert_eq!(format_math_text("spin the alpha"), "spin the α");
    assert_eq!(format_math_text("sum of sqrt(x)"), "∑ of √(x)");
    assert_eq!(format_math_text("sqrt is a word"), "sqrt is a word");
    assert_eq!(format_math_text("integral to infinity"), "∫ to ∞");
}

#[test]
fn chrome_sits_outside_the_viewport() {
    let ind = step_indicator(2, 5);
    assert_eq!(ind.content.as_deref(), Some("Step 2 of 5"));
    assert_eq!(ind.position, Point::new(100.0, 150.0));
    assert_eq!(title("Quadratics", 100.0).font_size, 20);

    let bx = content_box(Rect::new(90.0, 190.0, 390.0, 250.0), "#e5e7eb");
    assert_eq!(bx.size, Some(Size::new(300.0, 60.0)));
    let sep = separator(Point::new(100.0, 480.0), 200.0, "#d1d5db");
    assert_eq!(sep.endpoint, Some(Point::new(300.0, 480.0)));
    assert_eq!(sep.stroke_width, Some(1));
}
