//! Foreground host: drives the planner runtime and prints reminders.

use std::sync::Arc;
use std::time::Duration;

use dailynote_core::runtime::{self, Command, RuntimeOptions};
use dailynote_core::{Clock, Config, Event, SystemClock};
use tokio::sync::mpsc;

use crate::common::{CliResult, Session};
use crate::notifier::{render, StoreNotifier};

const DELIVERY_SECS: u64 = 15;

pub fn run(config: &Config, once: bool) -> CliResult {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    rt.block_on(serve(config, once))
}

fn deliver(notifier: &StoreNotifier, clock: &dyn Clock) {
    for request in notifier.take_due(clock.now()) {
        println!("{}", render(&request));
    }
    if let Err(e) = notifier.save() {
        tracing::error!(error = %e, "failed to save pending notifications");
    }
}

fn report(event: &Event) {
    match event {
        Event::RolledOver {
            to, carried_over, ..
        } => println!("New day {to}: {carried_over} task(s) carried over"),
        Event::WorkCue { cue, at } => tracing::info!(%cue, %at, "work cue"),
        other => tracing::debug!(?other, "planner event"),
    }
}

async fn serve(config: &Config, once: bool) -> CliResult {
    let Session { planner, notifier } = Session::open(config)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let (events_tx, mut events) = mpsc::unbounded_channel();
    let options = RuntimeOptions::from_config(config).with_events(events_tx);
    let (handle, task) = runtime::spawn(planner, options);

    if once {
        handle.send(Command::CheckRollover).await?;
        handle.send(Command::WorkTick).await?;
        // Round trip so both commands have been processed
        handle.apply(|_| ()).await?;
        deliver(&notifier, clock.as_ref());
    } else {
        tracing::info!("dailynote running, press Ctrl-C to stop");
        let mut delivery = tokio::time::interval(Duration::from_secs(DELIVERY_SECS));
        loop {
            tokio::select! {
                _ = delivery.tick() => deliver(&notifier, clock.as_ref()),
                Some(event) = events.recv() => report(&event),
                _ = tokio::signal::ctrl_c() => break,
            }
        }
    }

    handle.shutdown().await?;
    let planner = task.await?;
    while let Ok(event) = events.try_recv() {
        report(&event);
    }
    notifier.save()?;
    tracing::info!(date = %planner.today().date, "stopped");
    Ok(())
}
