//! Playback state machine.
//!
//! The scheduler walks loaded steps one delay group per tick. It never sleeps: every wait is a
//! timer armed on a [`TimerHost`], and the host reports expiry through [`Scheduler::fire`].
//! At most one timer is outstanding at any time.

use std::time::Duration;

use serde::Serialize;

use crate::foundation::core::{MIN_GROUP_GAP, STEP_PAUSE};
use crate::foundation::error::ChalkboardResult;
use crate::lesson::model::Step;
use crate::playback::groups::{DelayGroup, group_by_delay, group_gap};
use crate::playback::timer::{ManualTimers, TimerHandle, TimerHost};
use crate::render::element::RenderedElement;
use crate::render::sink::PlaybackSink;

/// Lifecycle of a [`Scheduler`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackPhase {
    /// No steps loaded.
    #[default]
    Idle,
    /// Steps loaded, nothing revealed since the last load or reset.
    Ready,
    /// A tick is armed.
    Playing,
    /// Stopped mid-sequence by `pause` or by a failed render.
    Paused,
    /// Every step has been revealed.
    Finished,
}

/// Pacing knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackOpts {
    /// Wait between a step's last group and the next step.
    pub step_pause: Duration,
    /// Floor for the wait between two groups of one step.
    pub min_group_gap: Duration,
    /// Wait between `play` and the first tick.
    pub start_delay: Duration,
}

impl Default for PlaybackOpts {
    fn default() -> Self {
        Self {
            step_pause: STEP_PAUSE,
            min_group_gap: MIN_GROUP_GAP,
            start_delay: Duration::ZERO,
        }
    }
}

/// Everything the scheduler publishes, owned by the scheduler alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PlaybackState {
    /// Current phase.
    pub phase: PlaybackPhase,
    /// Loaded steps.
    pub steps: Vec<Step>,
    /// Index of the step whose explanation is shown.
    pub current_step_index: usize,
    /// Explanation last sent to the sink.
    pub visible_explanation: String,
    /// Cumulative elements revealed during this run.
    pub accumulated: Vec<RenderedElement>,
}

impl PlaybackState {
    /// `true` while a tick is armed.
    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Cursor {
    step: usize,
    group: usize,
}

/// Timer-driven walker over a lesson.
///
/// `S` receives a full replacement element list on every revealed group and the explanation on
/// every step transition, load and reset.
#[derive(Debug)]
pub struct Scheduler<S> {
    sink: S,
    opts: PlaybackOpts,
    state: PlaybackState,
    groups: Vec<Vec<DelayGroup>>,
    cursor: Cursor,
    // Length of `accumulated` when the cursor's step was entered.
    step_base: usize,
    pending: Option<TimerHandle>,
}

impl<S: PlaybackSink> Scheduler<S> {
    /// Idle scheduler publishing into `sink`.
    pub fn new(sink: S, opts: PlaybackOpts) -> Self {
        Self {
            sink,
            opts,
            state: PlaybackState::default(),
            groups: Vec::new(),
            cursor: Cursor::default(),
            step_base: 0,
            pending: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> PlaybackPhase {
        self.state.phase
    }

    /// Published state.
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Pacing in effect.
    pub fn opts(&self) -> PlaybackOpts {
        self.opts
    }

    /// The single outstanding timer, if any.
    pub fn pending(&self) -> Option<TimerHandle> {
        self.pending
    }

    /// Borrow the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutably borrow the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the scheduler, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Replace the lesson. Allowed from any phase; an armed tick is cancelled first.
    ///
    /// Ends in `Ready`, or `Idle` when `steps` is empty.
    #[tracing::instrument(skip_all, fields(steps = steps.len()))]
    pub fn load_steps<T: TimerHost + ?Sized>(&mut self, steps: Vec<Step>, timers: &mut T) {
        self.cancel_pending(timers);
        self.groups = steps.iter().map(group_by_delay).collect();
        self.state.steps = steps;
        self.rewind();
    }

    /// Start or resume playback. Returns `false` (and does nothing) unless `Ready` or `Paused`.
    ///
    /// Nothing is rendered here: the first tick is armed after `start_delay`. Resuming from
    /// `Paused` re-walks the step at the cursor from its first group, dropping whatever that
    /// step had already revealed; earlier steps stay on screen.
    pub fn play<T: TimerHost + ?Sized>(&mut self, timers: &mut T) -> bool {
        match self.state.phase {
            PlaybackPhase::Ready => {
                self.cursor = Cursor::default();
            }
            PlaybackPhase::Paused => {
                if self.cursor.group > 0 {
                    self.state.accumulated.truncate(self.step_base);
                    self.cursor.group = 0;
                }
            }
            phase => {
                tracing::debug!(?phase, "play ignored");
                return false;
            }
        }
        if self.state.steps.is_empty() {
            return false;
        }
        self.state.phase = PlaybackPhase::Playing;
        self.pending = Some(timers.schedule(self.opts.start_delay));
        tracing::debug!(step = self.cursor.step, "playback started");
        true
    }

    /// Stop at the next tick boundary. Returns `false` (and does nothing) unless `Playing`.
    pub fn pause<T: TimerHost + ?Sized>(&mut self, timers: &mut T) -> bool {
        if self.state.phase != PlaybackPhase::Playing {
            return false;
        }
        self.cancel_pending(timers);
        self.state.phase = PlaybackPhase::Paused;
        tracing::debug!(step = self.state.current_step_index, "playback paused");
        true
    }

    /// Back to the start of the loaded lesson from any phase.
    ///
    /// Ends in `Ready`, or `Idle` when nothing is loaded.
    pub fn reset<T: TimerHost + ?Sized>(&mut self, timers: &mut T) {
        self.cancel_pending(timers);
        self.rewind();
    }

    /// Handle an expired timer.
    ///
    /// Handles other than the outstanding one are ignored. A failing render rolls the
    /// accumulated list back to what it was before the tick, leaves the scheduler `Paused`
    /// and returns the sink's error.
    pub fn fire<T: TimerHost + ?Sized>(
        &mut self,
        handle: TimerHandle,
        timers: &mut T,
    ) -> ChalkboardResult<()> {
        if !self.state.is_playing() || self.pending != Some(handle) {
            tracing::trace!(?handle, "stale tick ignored");
            return Ok(());
        }
        self.pending = None;

        let Cursor { step, group } = self.cursor;
        if group == 0 {
            self.state.current_step_index = step;
            self.step_base = self.state.accumulated.len();
            self.publish_explanation(step);
        }

        let groups = &self.groups[step];
        if let Some(current) = groups.get(group) {
            let before = self.state.accumulated.len();
            self.state
                .accumulated
                .extend(current.elements.iter().cloned());
            if let Err(err) = self.sink.replace_all(&self.state.accumulated) {
                self.state.accumulated.truncate(before);
                self.state.phase = PlaybackPhase::Paused;
                tracing::warn!(step, group, error = %err, "render failed; playback paused");
                return Err(err);
            }
            tracing::debug!(
                step,
                group,
                revealed = current.elements.len(),
                total = self.state.accumulated.len(),
                "group revealed"
            );
        }

        let wait = if group + 1 < groups.len() {
            self.cursor.group += 1;
            group_gap(&groups[group], &groups[group + 1], self.opts.min_group_gap)
        } else if step + 1 < self.state.steps.len() {
            self.cursor = Cursor {
                step: step + 1,
                group: 0,
            };
            self.opts.step_pause
        } else {
            self.state.phase = PlaybackPhase::Finished;
            tracing::info!(steps = self.state.steps.len(), "playback finished");
            return Ok(());
        };
        self.pending = Some(timers.schedule(wait));
        Ok(())
    }

    /// Drive the scheduler on a virtual clock for `by`, firing every tick that comes due.
    pub fn run_for(&mut self, timers: &mut ManualTimers, by: Duration) -> ChalkboardResult<()> {
        let target = timers.now() + by;
        while let Some(handle) = timers.pop_due(target) {
            self.fire(handle, timers)?;
        }
        timers.settle(target);
        Ok(())
    }

    /// Fire ticks on a virtual clock until nothing is armed. Returns the virtual time reached.
    pub fn run_until_idle(&mut self, timers: &mut ManualTimers) -> ChalkboardResult<Duration> {
        while let Some(handle) = timers.advance_to_next() {
            self.fire(handle, timers)?;
        }
        Ok(timers.now())
    }

    fn cancel_pending<T: TimerHost + ?Sized>(&mut self, timers: &mut T) {
        if let Some(handle) = self.pending.take() {
            timers.cancel(handle);
        }
    }

    fn rewind(&mut self) {
        self.cursor = Cursor::default();
        self.step_base = 0;
        self.state.current_step_index = 0;
        self.state.accumulated.clear();
        self.publish_explanation(0);
        self.state.phase = if self.state.steps.is_empty() {
            PlaybackPhase::Idle
        } else {
            PlaybackPhase::Ready
        };
    }

    fn publish_explanation(&mut self, index: usize) {
        self.state.visible_explanation = self
            .state
            .steps
            .get(index)
            .map(|s| s.explanation.clone())
            .unwrap_or_default();
        self.sink.set_explanation(&self.state.visible_explanation);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
