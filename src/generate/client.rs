use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Viewport;
use crate::foundation::error::{ChalkboardError, ChalkboardResult};

/// Subject used when the caller does not name one.
pub const DEFAULT_SUBJECT: &str = "mathematics";

/// Something that turns a question into raw model output (a JSON step list, unvalidated).
///
/// Implementations report transport and API problems as
/// [`ChalkboardError::GenerationFailure`].
pub trait CompletionSource: Send + Sync {
    /// Request a step-by-step lesson for `question` in `subject`.
    fn complete(
        &self,
        question: &str,
        subject: &str,
    ) -> impl Future<Output = ChalkboardResult<String>> + Send;
}

/// Settings for [`OpenAiClient`].
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Bearer token. Never serialized.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// API root, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Chat model name.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion length cap.
    pub max_tokens: u32,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Region the prompt asks the model to stay inside.
    pub viewport: Viewport,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_owned(),
            model: "gpt-4".to_owned(),
            temperature: 0.7,
            max_tokens: 2000,
            timeout_secs: 60,
            viewport: Viewport::default(),
        }
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("viewport", &self.viewport)
            .finish()
    }
}

/// System message sent with every request.
pub fn system_prompt(viewport: Viewport) -> String {
    let b = viewport.bounds;
    format!(
        "You are an expert educational tutor who explains problems visually, one small step at a \
         time. Always answer with valid JSON only. Keep every coordinate inside the visible \
         canvas area (x: {}-{}, y: {}-{}).",
        b.x0, b.x1, b.y0, b.y1
    )
}

/// User message asking for a lesson on `question`.
pub fn user_prompt(question: &str, subject: &str, viewport: Viewport) -> String {
    let b = viewport.bounds;
    format!(
        r##"You are an expert {subject} tutor. Build a step-by-step visual solution for the question:
"{question}"

Each step needs a short explanation (two or three sentences) and the drawing instructions that
illustrate it, with explicit coordinates. Later steps build on earlier ones; prefer more steps
with simpler explanations over a few dense ones.

Layout rules:
- the canvas is about 800x600 pixels;
- content starts at y={y0} so it does not collide with the title and step indicator;
- the left margin for text is x={x0};
- keep consecutive text lines 40 to 50 pixels apart;
- equations use font sizes 18 to 24, prose uses 16;
- stay within x={x0}..{x1} and y={y0}..{y1}.

Answer with a JSON array. Each element looks like:
{{
  "explanation": "what this step shows",
  "drawingInstructions": [
    {{
      "type": "text|line|arrow|rectangle|ellipse",
      "content": "text to draw, for text only",
      "x": {x0}, "y": {y0},
      "width": 120, "height": 40,
      "endX": 300, "endY": 200,
      "fontSize": 16,
      "color": "#1f2937",
      "strokeWidth": 2,
      "delay": 0
    }}
  ],
  "stepNumber": 1,
  "totalSteps": 3
}}
width/height apply to rectangles and ellipses, endX/endY to lines and arrows, and delay is the
number of milliseconds after the step starts before the element appears. Suggested colors are
#1f2937, #3b82f6 and #dc2626.

For an equation, write the original at y={y0}, then each transformation about 50 pixels lower
in its own step."##,
        x0 = b.x0,
        x1 = b.x1,
        y0 = b.y0,
        y1 = b.y1,
    )
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

/// Chat-completions client for OpenAI-compatible APIs.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    config: GeneratorConfig,
    api_key: String,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Build a client. Fails when no API key is configured.
    pub fn new(config: GeneratorConfig) -> ChalkboardResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ChalkboardError::generation("no API key configured"))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChalkboardError::generation(format!("http client: {e}")))?;
        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    /// Settings in effect.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

impl CompletionSource for OpenAiClient {
    #[tracing::instrument(skip(self, question), fields(model = %self.config.model))]
    async fn complete(&self, question: &str, subject: &str) -> ChalkboardResult<String> {
        let viewport = self.config.viewport;
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system".to_owned(),
                    content: Some(system_prompt(viewport)),
                },
                ChatMessage {
                    role: "user".to_owned(),
                    content: Some(user_prompt(question, subject, viewport)),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChalkboardError::generation(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            let detail: String = detail.chars().take(200).collect();
            return Err(ChalkboardError::generation(format!(
                "API returned {status}: {detail}"
            )));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ChalkboardError::generation(format!("unreadable API response: {e}")))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ChalkboardError::generation("no content in model response"))?;
        tracing::debug!(bytes = content.len(), "completion received");
        Ok(content)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/client.rs"]
mod tests;
