use super::*;
use crate::foundation::core::{Point, Rect};
use crate::lesson::compose::{FALLBACK_EXPLANATION, FALLBACK_TEXT};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Stub {
    reply: fn() -> ChalkboardResult<String>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, String)>>,
}

impl Stub {
    fn new(reply: fn() -> ChalkboardResult<String>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl CompletionSource for Stub {
    async fn complete(&self, question: &str, subject: &str) -> ChalkboardResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((question.to_owned(), subject.to_owned()));
        (self.reply)()
    }
}

const TWO_STEPS: &str = r#"[
  {"explanation":"Write it","drawingInstructions":[{"type":"text","content":"2x+3=7","x":10,"y":900}]},
  {"explanation":"Subtract","drawingInstructions":[{"type":"text","content":"2x=4","x":100,"y":250,"delay":500}]}
]"#;

fn assert_fallback(steps: &[Step]) {
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].explanation, FALLBACK_EXPLANATION);
    assert_eq!(steps[0].instructions.len(), 1);
    assert_eq!(
        steps[0].instructions[0].content.as_deref(),
        Some(FALLBACK_TEXT)
    );
}

#[tokio::test]
async fn valid_output_is_normalized() {
    let tutor = Tutor::new(Stub::new(|| Ok(TWO_STEPS.to_owned())));
    let steps = tutor.generate("  Solve 2x+3=7 ", Some("algebra")).await.unwrap();

    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].instructions[0].position, Point::new(100.0, 500.0));
    assert_eq!((steps[1].step_number, steps[1].total_steps), (2, 2));
    assert_eq!(
        tutor.source().seen.lock().unwrap().as_slice(),
        [("Solve 2x+3=7".to_owned(), "algebra".to_owned())]
    );
}

#[tokio::test]
async fn subject_defaults_to_mathematics() {
    let tutor = Tutor::new(Stub::new(|| Ok(TWO_STEPS.to_owned())));
    tutor.generate("q", None).await.unwrap();
    tutor.generate("q", Some("   ")).await.unwrap();
    let seen = tutor.source().seen.lock().unwrap();
    assert!(seen.iter().all(|(_, s)| s == DEFAULT_SUBJECT));
}

#[tokio::test]
async fn blank_question_is_rejected_without_a_call() {
    let tutor = Tutor::new(Stub::new(|| Ok(TWO_STEPS.to_owned())));
    let err = tutor.generate(" \n\t", None).await.unwrap_err();
    assert!(matches!(err, ChalkboardError::EmptyInput(_)));
    assert_eq!(tutor.source().calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn generation_failure_falls_back_once() {
    let tutor = Tutor::new(Stub::new(|| {
        Err(ChalkboardError::generation("connection reset"))
    }));
    let steps = tutor.generate("q", None).await.unwrap();
    assert_fallback(&steps);
    assert_eq!(tutor.source().calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn malformed_output_falls_back() {
    for reply in [
        (|| Ok("I cannot draw that".to_owned())) as fn() -> ChalkboardResult<String>,
        || Ok("[]".to_owned()),
        || Ok(r#"[{"explanation":"x","drawingInstructions":[{"type":"freedraw","x":1,"y":1}]}]"#.to_owned()),
    ] {
        let tutor = Tutor::new(Stub::new(reply));
        assert_fallback(&tutor.generate("q", None).await.unwrap());
        assert_eq!(tutor.source().calls.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test]
async fn unexpected_errors_propagate() {
    let tutor = Tutor::new(Stub::new(|| {
        Err(ChalkboardError::Other(anyhow::anyhow!("bug")))
    }));
    let err = tutor.generate("q", None).await.unwrap_err();
    assert!(matches!(err, ChalkboardError::Other(_)));
}

#[tokio::test]
async fn fenced_output_is_accepted() {
    let tutor = Tutor::new(Stub::new(|| Ok(format!("```json\n{TWO_STEPS}\n```"))));
    assert_eq!(tutor.generate("q", None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn custom_viewport_clamps_generated_positions() {
    let tutor = Tutor::new(Stub::new(|| Ok(TWO_STEPS.to_owned())))
        .with_viewport(Viewport::new(Rect::new(0.0, 0.0, 50.0, 50.0)));
    let steps = tutor.generate("q", None).await.unwrap();
    assert_eq!(steps[0].instructions[0].position, Point::new(10.0, 50.0));
}

#[test]
fn code_fences_are_peeled() {
    assert_eq!(strip_code_fence("  [1] "), "[1]");
    assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
    assert_eq!(strip_code_fence("```\n{\"steps\":[]}\n```"), "{\"steps\":[]}");
    assert_eq!(strip_code_fence("```[1]```"), "[1]");
}
