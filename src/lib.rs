//! Chalkboard is a step-by-step drawing tutor.
//!
//! A question goes to a chat model, which answers with a list of steps. Each step pairs a short
//! explanation with drawing instructions. The crate validates that output, groups each step's
//! instructions by reveal delay and plays the lesson back as a timed, pausable animation:
//!
//! - Parse and normalize model output with [`parse_steps`]
//! - Ask for a lesson through a [`Tutor`], which substitutes [`fallback_step`] on failure
//! - Walk the lesson with a [`Scheduler`] (or a [`PlaybackDriver`] on tokio) into a
//!   [`RenderSink`] such as [`SvgSink`]
//! - Expose generation over HTTP with [`server::router`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod generate;
pub(crate) mod lesson;
pub(crate) mod playback;
pub(crate) mod render;
pub mod server;

pub use crate::foundation::core::{
    Canvas, DEFAULT_COLOR, DEFAULT_FONT_SIZE, DEFAULT_STROKE_WIDTH, MIN_GROUP_GAP, Point, Rect,
    STEP_PAUSE, Size, Vec2, Viewport,
};
pub use crate::foundation::error::{ChalkboardError, ChalkboardResult};

pub use crate::generate::client::{
    CompletionSource, DEFAULT_SUBJECT, GeneratorConfig, OpenAiClient, system_prompt, user_prompt,
};
pub use crate::generate::tutor::Tutor;
pub use crate::lesson::compose::{
    FALLBACK_EXPLANATION, FALLBACK_TEXT, content_box, fallback_step, format_math_text,
    math_walkthrough, separator, step_indicator, text_to_instructions, title,
};
pub use crate::lesson::model::{DrawingInstruction, InstructionKind, Step};
pub use crate::lesson::normalize::{parse_steps, parse_steps_in, parse_steps_value};
pub use crate::playback::driver::{PlaybackCommand, PlaybackDriver};
pub use crate::playback::groups::{DelayGroup, group_by_delay, group_gap};
pub use crate::playback::scheduler::{PlaybackOpts, PlaybackPhase, PlaybackState, Scheduler};
pub use crate::playback::timer::{ManualTimers, TimerHandle, TimerHost};
pub use crate::render::element::{ElementShape, RenderedElement, element_id, elements_for_step};
pub use crate::render::sink::{
    ChannelSink, ExplanationSink, InMemorySink, PlaybackEvent, PlaybackSink, RenderSink,
    SplitSink,
};
pub use crate::render::svg::{SvgSink, render_svg};
