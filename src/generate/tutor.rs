use crate::foundation::core::Viewport;
use crate::foundation::error::{ChalkboardError, ChalkboardResult};
use crate::generate::client::{CompletionSource, DEFAULT_SUBJECT};
use crate::lesson::compose::fallback_step;
use crate::lesson::model::Step;
use crate::lesson::normalize::parse_steps_in;

/// Generation boundary: asks a [`CompletionSource`] for a lesson and validates the answer.
///
/// Generation and validation failures never escape: they are logged and replaced by the
/// single [`fallback_step`]. Nothing is retried.
#[derive(Debug)]
pub struct Tutor<S> {
    source: S,
    viewport: Viewport,
}

impl<S: CompletionSource> Tutor<S> {
    /// Tutor clamping into the default viewport.
    pub fn new(source: S) -> Self {
        Self {
            source,
            viewport: Viewport::default(),
        }
    }

    /// Clamp generated positions into `viewport` instead.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Produce normalized steps for `question`.
    ///
    /// A blank question is [`ChalkboardError::EmptyInput`] and no request is made. A missing or
    /// blank `subject` means [`DEFAULT_SUBJECT`].
    #[tracing::instrument(skip(self, question), fields(question_len = question.len()))]
    pub async fn generate(
        &self,
        question: &str,
        subject: Option<&str>,
    ) -> ChalkboardResult<Vec<Step>> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChalkboardError::empty_input("question is blank"));
        }
        let subject = subject
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SUBJECT);

        match self.request(question, subject).await {
            Ok(steps) => Ok(steps),
            Err(err) if err.is_recoverable_generation() => {
                tracing::error!(error = %err, "generation failed, serving fallback step");
                Ok(vec![fallback_step()])
            }
            Err(err) => Err(err),
        }
    }

    async fn request(&self, question: &str, subject: &str) -> ChalkboardResult<Vec<Step>> {
        let raw = self.source.complete(question, subject).await?;
        let steps = parse_steps_in(strip_code_fence(&raw), self.viewport)?;
        if steps.is_empty() {
            return Err(ChalkboardError::malformed("model returned no steps"));
        }
        tracing::info!(steps = steps.len(), subject, "lesson generated");
        Ok(steps)
    }
}

/// Chat models often wrap JSON in a markdown fence; peel one off if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_suffix("```").unwrap_or(body);
    // Drop the info string ("json") on the opening line.
    match body.split_once('\n') {
        Some((info, rest)) if !info.trim_start().starts_with(['[', '{']) => rest.trim(),
        _ => body.trim(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/tutor.rs"]
mod tests;
