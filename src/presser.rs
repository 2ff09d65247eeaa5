// Copyright (C) 2025  Tom Waddington
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Background key-pressing scheduler
//!
//! One worker task alternates an interruptible wait with a key-press pass
//! until told to stop. Stop is cooperative: the worker is only ever woken
//! at its wait points, never pre-empted mid-press.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::keys::Keyboard;
use crate::press::press_action;
use crate::status::{StatusCallback, StatusSender, truncate};
use crate::types::{AtomicWorkerState, IntervalBounds, KeyConfig, WorkerState};

/// Delay before the first key press after start.
const STARTUP_DELAY: Duration = Duration::from_secs(5);
/// How long stop() waits for the worker task to wind down.
const STOP_GRACE: Duration = Duration::from_secs(2);
/// Length cap for loop-level error text in status lines.
const LOOP_ERROR_CHARS: usize = 50;

/// Presses a configured set of keys on a randomized cadence.
///
/// The key list and interval bounds are fixed for one start/stop cycle;
/// holding `&mut self` for `start`/`stop` keeps reconfiguration and
/// lifecycle changes in a single caller's hands, while `is_running` stays
/// callable from anywhere.
pub struct KeyPresser<K> {
    keys: Vec<KeyConfig>,
    bounds: IntervalBounds,
    keyboard: Arc<K>,
    status: Arc<StatusSender>,
    state: Arc<AtomicWorkerState>,
    cancel: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

impl<K: Keyboard + 'static> KeyPresser<K> {
    pub fn new(
        keyboard: K,
        keys: Vec<KeyConfig>,
        bounds: IntervalBounds,
        status_callback: Option<StatusCallback>,
    ) -> Self {
        Self {
            keys,
            bounds,
            keyboard: Arc::new(keyboard),
            status: Arc::new(StatusSender::new(status_callback)),
            state: Arc::new(AtomicWorkerState::new(WorkerState::Idle)),
            cancel: CancellationToken::new(),
            worker: None,
        }
    }

    /// Start the background worker. A no-op with a warning status if the
    /// worker is already running. Does not block beyond task dispatch.
    pub fn start(&mut self) {
        if self
            .state
            .compare_exchange(
                WorkerState::Idle,
                WorkerState::Running,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            warn!("key pressing already active");
            self.status.send("Key pressing already running");
            return;
        }

        // Fresh token per run; the previous one stays cancelled.
        self.cancel = CancellationToken::new();

        let run = tokio::spawn(run_loop(
            self.keyboard.clone(),
            self.keys.clone(),
            self.bounds,
            self.status.clone(),
            self.cancel.clone(),
        ));

        self.worker = Some(tokio::spawn(supervise(
            run,
            self.state.clone(),
            self.status.clone(),
            self.cancel.clone(),
        )));

        info!("starting key presser");
        self.status.send("Key pressing started");
    }

    /// Signal the worker to stop and wait, bounded, for it to wind down.
    /// A no-op with a warning status if the worker is not running.
    ///
    /// If the grace period elapses the task is left to finish detached;
    /// the only thing it can still do is emit further status messages.
    pub async fn stop(&mut self) {
        if self.state.load(Ordering::Acquire) != WorkerState::Running {
            warn!("key pressing not active");
            self.status.send("Key pressing not running");
            return;
        }

        self.state.store(WorkerState::Stopping, Ordering::Release);
        self.cancel.cancel();

        if let Some(worker) = self.worker.take() {
            if timeout(STOP_GRACE, worker).await.is_err() {
                warn!("worker did not wind down within {STOP_GRACE:?}");
            }
        }

        self.state.store(WorkerState::Idle, Ordering::Release);
        info!("key pressing stopped");
        self.status.send("Key pressing stopped");
    }

    /// True iff the worker loop is currently running. Safe to call
    /// concurrently with the worker.
    pub fn is_running(&self) -> bool {
        self.state.load(Ordering::Acquire) == WorkerState::Running
    }
}

/// Supervises one run of the worker loop: a panic anywhere in it surfaces
/// here as a join error and becomes a truncated status line.
///
/// Only an uncancelled run may re-idle the shared state. A cancelled run
/// is being joined by `stop()`, which owns the Stopping -> Idle
/// transition; a run detached after the stop grace expired would
/// otherwise reach over and reset the state of a newer run.
async fn supervise(
    run: JoinHandle<()>,
    state: Arc<AtomicWorkerState>,
    status: Arc<StatusSender>,
    cancel: CancellationToken,
) {
    if let Err(err) = run.await {
        error!("key presser worker failed: {err}");
        status.send(&format!(
            "Error: {}",
            truncate(&err.to_string(), LOOP_ERROR_CHARS)
        ));
    }
    if !cancel.is_cancelled() {
        state.store(WorkerState::Idle, Ordering::Release);
    }
}

async fn run_loop<K: Keyboard + 'static>(
    keyboard: Arc<K>,
    keys: Vec<KeyConfig>,
    bounds: IntervalBounds,
    status: Arc<StatusSender>,
    cancel: CancellationToken,
) {
    status.send("Initializing... (5 second countdown)");
    if wait_interruptible(&cancel, STARTUP_DELAY).await {
        return;
    }

    press_action(&keyboard, &keys, &status).await;

    while !cancel.is_cancelled() {
        let interval = draw_interval(&bounds);
        status.send(&countdown_message(interval));

        if wait_interruptible(&cancel, Duration::from_secs(interval)).await {
            break;
        }

        press_action(&keyboard, &keys, &status).await;
    }
}

/// Wait for `duration`, returning early with `true` if cancelled first.
/// The sole suspension point of the scheduler.
async fn wait_interruptible(cancel: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => true,
        _ = sleep(duration) => false,
    }
}

fn draw_interval(bounds: &IntervalBounds) -> u64 {
    draw_interval_with(&mut rand::rng(), bounds)
}

/// Uniform draw from the inclusive interval range.
fn draw_interval_with(rng: &mut impl Rng, bounds: &IntervalBounds) -> u64 {
    rng.random_range(bounds.min_secs()..=bounds.max_secs())
}

fn countdown_message(interval_secs: u64) -> String {
    let minutes = interval_secs / 60;
    let seconds = interval_secs % 60;
    if seconds > 0 {
        format!("Next press in {minutes}m {seconds}s")
    } else {
        format!("Next press in {minutes} minutes")
    }
}
