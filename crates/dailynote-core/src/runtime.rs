//! Async host loop around a [`Planner`].
//!
//! The planner lives inside one tokio task. Periodic timers and callers reach
//! it only through a command channel, so mutations never interleave.
//! Persistence is debounced: a mutation arms a deadline and the loop flushes
//! once it elapses. Shutdown flushes and hands the planner back.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::planner::Planner;
use crate::storage::Config;

const COMMAND_BUFFER: usize = 64;

/// Work for the planner task.
pub enum Command {
    CheckRollover,
    WorkTick,
    Flush,
    Apply(Box<dyn FnOnce(&mut Planner) + Send>),
    Shutdown,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Command::CheckRollover => "CheckRollover",
            Command::WorkTick => "WorkTick",
            Command::Flush => "Flush",
            Command::Apply(_) => "Apply",
            Command::Shutdown => "Shutdown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    pub rollover_check: Duration,
    pub work_tick: Duration,
    pub save_debounce: Duration,
    /// Receives every event the planner produces.
    pub events: Option<mpsc::UnboundedSender<Event>>,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl RuntimeOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            rollover_check: Duration::from_secs(config.runtime.rollover_check_secs.max(1)),
            work_tick: Duration::from_secs(config.runtime.work_tick_secs.max(1)),
            save_debounce: Duration::from_millis(config.runtime.save_debounce_ms),
            events: None,
        }
    }

    pub fn with_events(mut self, tx: mpsc::UnboundedSender<Event>) -> Self {
        self.events = Some(tx);
        self
    }
}

/// Cloneable sender side of a running planner.
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    tx: mpsc::Sender<Command>,
}

impl RuntimeHandle {
    pub async fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| CoreError::RuntimeStopped)
    }

    /// Run `f` against the planner and return its result.
    pub async fn apply<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Planner) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply, response) = oneshot::channel();
        self.send(Command::Apply(Box::new(move |planner| {
            let _ = reply.send(f(planner));
        })))
        .await?;
        response.await.map_err(|_| CoreError::RuntimeStopped)
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown).await
    }
}

/// Move `planner` into a new task and start the loop.
///
/// The join handle yields the planner after shutdown.
pub fn spawn(planner: Planner, options: RuntimeOptions) -> (RuntimeHandle, JoinHandle<Planner>) {
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let task = tokio::spawn(run(planner, rx, options));
    (RuntimeHandle { tx }, task)
}

/// Drive `planner` until a `Shutdown` arrives or every sender is dropped.
pub async fn run(
    mut planner: Planner,
    mut rx: mpsc::Receiver<Command>,
    options: RuntimeOptions,
) -> Planner {
    let mut rollover = tokio::time::interval(options.rollover_check);
    rollover.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut work = tokio::time::interval(options.work_tick);
    work.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut flush_at: Option<Instant> = None;
    forward_events(&mut planner, &options);

    loop {
        let deadline = flush_at;
        let flush_due = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        let command = tokio::select! {
            command = rx.recv() => command.unwrap_or(Command::Shutdown),
            _ = rollover.tick() => Command::CheckRollover,
            _ = work.tick() => Command::WorkTick,
            () = flush_due => Command::Flush,
        };
        tracing::trace!(?command, "runtime command");

        match command {
            Command::Shutdown => break,
            Command::Flush => {
                flush_at = None;
                let written = planner.flush();
                tracing::debug!(written, "flushed planner state");
                continue;
            }
            Command::CheckRollover => {
                planner.check_rollover();
            }
            Command::WorkTick => {
                planner.work_tick();
            }
            Command::Apply(f) => f(&mut planner),
        }

        let changed = forward_events(&mut planner, &options);
        if planner.is_dirty() && (changed || flush_at.is_none()) {
            flush_at = Some(Instant::now() + options.save_debounce);
        }
    }

    let written = planner.flush();
    forward_events(&mut planner, &options);
    tracing::info!(written, "planner runtime stopped");
    planner
}

/// Drain planner events into the subscriber. Returns whether any were pending.
fn forward_events(planner: &mut Planner, options: &RuntimeOptions) -> bool {
    let events = planner.take_events();
    let any = !events.is_empty();
    if let Some(tx) = &options.events {
        for event in events {
            // A dropped receiver only means nobody is listening
            let _ = tx.send(event);
        }
    }
    any
}
