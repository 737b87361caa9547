use crate::foundation::error::{ChalkboardError, ChalkboardResult};
use crate::render::element::RenderedElement;
use tokio::sync::mpsc;

/// Renderer adapter contract.
///
/// `replace_all` always receives the full cumulative element list for the current playback run;
/// there are no incremental patches. An `Err` marks the tick as failed.
pub trait RenderSink: Send {
    /// Replace everything on the drawing surface with `elements`.
    fn replace_all(&mut self, elements: &[RenderedElement]) -> ChalkboardResult<()>;
}

/// Narration contract: receives the explanation on every step transition and on reset.
pub trait ExplanationSink: Send {
    /// Show `text` as the current explanation.
    fn set_explanation(&mut self, text: &str);
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    /// Every `replace_all` payload in call order.
    pub(crate) frames: Vec<Vec<RenderedElement>>,
    /// Every explanation in call order.
    pub(crate) explanations: Vec<String>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[Vec<RenderedElement>] {
        &self.frames
    }

    /// Borrow the captured explanations.
    pub fn explanations(&self) -> &[String] {
        &self.explanations
    }

    /// Most recent explanation, if any was published.
    pub fn explanation(&self) -> Option<&str> {
        self.explanations.last().map(String::as_str)
    }
}

impl RenderSink for InMemorySink {
    fn replace_all(&mut self, elements: &[RenderedElement]) -> ChalkboardResult<()> {
        self.frames.push(elements.to_vec());
        Ok(())
    }
}

impl ExplanationSink for InMemorySink {
    fn set_explanation(&mut self, text: &str) {
        self.explanations.push(text.to_owned());
    }
}

/// Something the scheduler published.
#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackEvent {
    /// A full replacement element list.
    Frame(Vec<RenderedElement>),
    /// A new explanation.
    Explanation(String),
}

/// Forwards published frames and explanations over an unbounded channel.
///
/// Used when the consumer lives on another task (terminal output, websocket bridge).
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<PlaybackEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiving half of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl RenderSink for ChannelSink {
    fn replace_all(&mut self, elements: &[RenderedElement]) -> ChalkboardResult<()> {
        self.tx
            .send(PlaybackEvent::Frame(elements.to_vec()))
            .map_err(|_| ChalkboardError::render("frame receiver dropped"))
    }
}

impl ExplanationSink for ChannelSink {
    fn set_explanation(&mut self, text: &str) {
        if self
            .tx
            .send(PlaybackEvent::Explanation(text.to_owned()))
            .is_err()
        {
            tracing::debug!("explanation receiver dropped");
        }
    }
}

/// A sink that is both the renderer adapter and the explanation surface.
pub trait PlaybackSink: RenderSink + ExplanationSink {}

impl<T: RenderSink + ExplanationSink> PlaybackSink for T {}

/// Pairs a separate renderer and narrator into one [`PlaybackSink`].
#[derive(Debug, Default)]
pub struct SplitSink<R, E> {
    /// Receives `replace_all`.
    pub renderer: R,
    /// Receives `set_explanation`.
    pub narrator: E,
}

impl<R: RenderSink, E: Send> RenderSink for SplitSink<R, E> {
    fn replace_all(&mut self, elements: &[RenderedElement]) -> ChalkboardResult<()> {
        self.renderer.replace_all(elements)
    }
}

impl<R: Send, E: ExplanationSink> ExplanationSink for SplitSink<R, E> {
    fn set_explanation(&mut self, text: &str) {
        self.narrator.set_explanation(text);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sink.rs"]
mod tests;
