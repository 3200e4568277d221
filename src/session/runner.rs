// src/session/runner.rs

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::{MissedTickBehavior, interval};

use super::machine::{ExamSession, SessionState, SubmitReason, Tick};
use crate::config::TICK_INTERVAL_MS;

/// Countdown period used by clients that have no reason to pick another.
pub const DEFAULT_TICK: Duration = Duration::from_millis(TICK_INTERVAL_MS);

/// Source of the current time for the countdown.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Drives the session countdown: one periodic tick updates the remaining time
/// and forces submission at the deadline.
///
/// Returns how the session ended, or `None` if it was never active.
pub async fn run_countdown<C, F>(
    session: Arc<Mutex<ExamSession>>,
    clock: &C,
    period: Duration,
    mut on_tick: F,
) -> Option<SubmitReason>
where
    C: Clock + ?Sized,
    F: FnMut(&Tick),
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let (tick, state, reason) = {
            let mut guard = session.lock().unwrap_or_else(|e| e.into_inner());
            let tick = guard.tick(clock.now());
            (tick, guard.state().clone(), guard.submit_reason())
        };

        // Nothing to count down in a session that never became active.
        let tick = tick?;
        on_tick(&tick);

        if state == SessionState::Submitted {
            return reason;
        }
    }
}
