use super::*;
use crate::foundation::core::Point;
use crate::lesson::model::DrawingInstruction;

fn element(id: &str) -> RenderedElement {
    RenderedElement::from_instruction(id, &DrawingInstruction::text(id, Point::new(100.0, 200.0)))
}

#[test]
fn in_memory_sink_records_in_call_order() {
    let mut sink = InMemorySink::new();
    sink.set_explanation("one");
    sink.replace_all(&[element("a")]).unwrap();
    sink.replace_all(&[element("a"), element("b")]).unwrap();
    sink.set_explanation("two");

    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].len(), 2);
    assert_eq!(sink.explanations(), ["one", "two"]);
    assert_eq!(sink.explanation(), Some("two"));
}

#[test]
fn channel_sink_forwards_and_reports_closed_receiver() {
    let (mut sink, mut rx) = ChannelSink::new();
    sink.set_explanation("hello");
    sink.replace_all(&[element("a")]).unwrap();
    assert_eq!(
        rx.try_recv().unwrap(),
        PlaybackEvent::Explanation("hello".to_owned())
    );
    assert!(matches!(rx.try_recv().unwrap(), PlaybackEvent::Frame(f) if f.len() == 1));

    drop(rx);
    let err = sink.replace_all(&[]).unwrap_err();
    assert!(matches!(err, ChalkboardError::RenderCallback(_)));
    // Explanations never fail, even without a receiver.
    sink.set_explanation("ignored");
}

#[test]
fn split_sink_routes_each_role() {
    let mut sink = SplitSink {
        renderer: InMemorySink::new(),
        narrator: InMemorySink::new(),
    };
    sink.replace_all(&[element("a")]).unwrap();
    sink.set_explanation("x");
    assert_eq!(sink.renderer.frames().len(), 1);
    assert!(sink.renderer.explanations().is_empty());
    assert_eq!(sink.narrator.explanations(), ["x"]);
    assert!(sink.narrator.frames().is_empty());
}
