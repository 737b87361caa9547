//! Tokio host for [`Scheduler`]: one task owns the scheduler and a single-slot timer, and
//! commands arrive over a channel.

use std::future::Future;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::foundation::error::{ChalkboardError, ChalkboardResult};
use crate::lesson::model::Step;
use crate::playback::scheduler::{PlaybackOpts, PlaybackPhase, Scheduler};
use crate::playback::timer::{TimerHandle, TimerHost};
use crate::render::sink::PlaybackSink;

const COMMAND_CAPACITY: usize = 16;

/// Control message for a running [`PlaybackDriver`].
#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackCommand {
    /// Replace the lesson.
    Load(Vec<Step>),
    /// Start or resume.
    Play,
    /// Pause at the next tick boundary.
    Pause,
    /// Rewind to the first step.
    Reset,
}

#[derive(Debug, Default)]
struct TokioTimers {
    next_id: u64,
    armed: Option<(TimerHandle, Instant)>,
}

impl TokioTimers {
    fn expiry(&self) -> impl Future<Output = TimerHandle> + use<> {
        let armed = self.armed;
        async move {
            match armed {
                Some((handle, at)) => {
                    tokio::time::sleep_until(at).await;
                    handle
                }
                None => std::future::pending().await,
            }
        }
    }
}

impl TimerHost for TokioTimers {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        if let Some((previous, _)) = self.armed.replace((handle, Instant::now() + delay)) {
            tracing::warn!(?previous, "timer replaced while still armed");
        }
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.armed.is_some_and(|(h, _)| h == handle) {
            self.armed = None;
        }
    }
}

/// Real-time playback on a background tokio task.
///
/// Dropping the driver closes the command channel; the task then cancels its armed timer and
/// exits. Use [`PlaybackDriver::shutdown`] to wait for that and get the sink back.
#[derive(Debug)]
pub struct PlaybackDriver<S> {
    commands: mpsc::Sender<PlaybackCommand>,
    phase: watch::Receiver<PlaybackPhase>,
    task: JoinHandle<S>,
}

impl<S: PlaybackSink + 'static> PlaybackDriver<S> {
    /// Spawn the driver task on the current runtime.
    pub fn spawn(sink: S, opts: PlaybackOpts) -> Self {
        let (commands, rx) = mpsc::channel(COMMAND_CAPACITY);
        let (phase_tx, phase) = watch::channel(PlaybackPhase::Idle);
        let task = tokio::spawn(run(Scheduler::new(sink, opts), rx, phase_tx));
        Self {
            commands,
            phase,
            task,
        }
    }

    /// Queue a command.
    pub async fn send(&self, command: PlaybackCommand) -> ChalkboardResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ChalkboardError::Other(anyhow::anyhow!("playback driver stopped")))
    }

    /// Queue [`PlaybackCommand::Load`].
    pub async fn load(&self, steps: Vec<Step>) -> ChalkboardResult<()> {
        self.send(PlaybackCommand::Load(steps)).await
    }

    /// Queue [`PlaybackCommand::Play`].
    pub async fn play(&self) -> ChalkboardResult<()> {
        self.send(PlaybackCommand::Play).await
    }

    /// Queue [`PlaybackCommand::Pause`].
    pub async fn pause(&self) -> ChalkboardResult<()> {
        self.send(PlaybackCommand::Pause).await
    }

    /// Queue [`PlaybackCommand::Reset`].
    pub async fn reset(&self) -> ChalkboardResult<()> {
        self.send(PlaybackCommand::Reset).await
    }

    /// Phase as of the last processed command or tick.
    pub fn phase(&self) -> PlaybackPhase {
        *self.phase.borrow()
    }

    /// Watch phase changes.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackPhase> {
        self.phase.clone()
    }

    /// Wait until the driver reports `target`.
    pub async fn wait_for(&self, target: PlaybackPhase) -> ChalkboardResult<()> {
        let mut rx = self.phase.clone();
        rx.wait_for(|p| *p == target)
            .await
            .map(|_| ())
            .map_err(|_| ChalkboardError::Other(anyhow::anyhow!("playback driver stopped")))
    }

    /// Stop the task and return the sink.
    pub async fn shutdown(self) -> ChalkboardResult<S> {
        let Self { commands, task, .. } = self;
        drop(commands);
        task.await
            .map_err(|e| ChalkboardError::Other(anyhow::anyhow!("playback task failed: {e}")))
    }
}

async fn run<S: PlaybackSink>(
    mut sched: Scheduler<S>,
    mut commands: mpsc::Receiver<PlaybackCommand>,
    phase: watch::Sender<PlaybackPhase>,
) -> S {
    let mut timers = TokioTimers::default();
    loop {
        let expiry = timers.expiry();
        tokio::select! {
            biased;
            command = commands.recv() => {
                let Some(command) = command else { break };
                tracing::debug!(?command, "playback command");
                match command {
                    PlaybackCommand::Load(steps) => sched.load_steps(steps, &mut timers),
                    PlaybackCommand::Play => {
                        sched.play(&mut timers);
                    }
                    PlaybackCommand::Pause => {
                        sched.pause(&mut timers);
                    }
                    PlaybackCommand::Reset => sched.reset(&mut timers),
                }
            }
            handle = expiry => {
                timers.cancel(handle);
                if let Err(err) = sched.fire(handle, &mut timers) {
                    tracing::warn!(error = %err, "tick failed");
                }
            }
        }
        phase.send_replace(sched.phase());
    }
    sched.pause(&mut timers);
    phase.send_replace(sched.phase());
    sched.into_sink()
}

#[cfg(test)]
#[path = "../../tests/unit/playback/driver.rs"]
mod tests;
