//! Debounce state machine for the watch loop.
//!
//! ```text
//! Idle --change--> Pending --deadline--> Scanning --finished--> Idle
//!                   ^  |                    |
//!                   +--+ change             +--finished, changes queued--> Pending
//!              (deadline reset)
//! ```
//!
//! The machine holds no clock: every input carries `now`, which keeps it
//! deterministic under test.

use crate::watch::events::ChangeEvent;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    /// Changes seen; rescan once `deadline` passes without further changes
    Pending {
        deadline: Instant,
        events: Vec<ChangeEvent>,
    },
    /// A cycle is in flight; changes are queued for the next one
    Scanning {
        queued: Vec<ChangeEvent>,
        deadline: Option<Instant>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchInput {
    Change(ChangeEvent),
    /// Time passed (receive timeout or after each event)
    Tick,
    ScanFinished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchAction {
    Rescan { events: Vec<ChangeEvent> },
}

#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    window: Duration,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Advance the state machine by one input.
    pub fn step(
        &self,
        state: WatchState,
        input: WatchInput,
        now: Instant,
    ) -> (WatchState, Option<WatchAction>) {
        match (state, input) {
            (WatchState::Idle, WatchInput::Change(event)) => (
                WatchState::Pending {
                    deadline: now + self.window,
                    events: vec![event],
                },
                None,
            ),
            (WatchState::Idle, _) => (WatchState::Idle, None),

            (WatchState::Pending { mut events, .. }, WatchInput::Change(event)) => {
                push_unique(&mut events, event);
                (
                    WatchState::Pending {
                        deadline: now + self.window,
                        events,
                    },
                    None,
                )
            }
            (WatchState::Pending { deadline, events }, WatchInput::Tick) if now >= deadline => (
                WatchState::Scanning {
                    queued: Vec::new(),
                    deadline: None,
                },
                Some(WatchAction::Rescan { events }),
            ),
            (pending @ WatchState::Pending { .. }, _) => (pending, None),

            (WatchState::Scanning { mut queued, .. }, WatchInput::Change(event)) => {
                push_unique(&mut queued, event);
                (
                    WatchState::Scanning {
                        queued,
                        deadline: Some(now + self.window),
                    },
                    None,
                )
            }
            (WatchState::Scanning { queued, deadline }, WatchInput::ScanFinished) => {
                if queued.is_empty() {
                    (WatchState::Idle, None)
                } else {
                    (
                        WatchState::Pending {
                            deadline: deadline.unwrap_or(now + self.window),
                            events: queued,
                        },
                        None,
                    )
                }
            }
            (scanning @ WatchState::Scanning { .. }, WatchInput::Tick) => (scanning, None),
        }
    }

    /// When the loop must wake up next, if a deadline is armed.
    pub fn next_deadline(state: &WatchState) -> Option<Instant> {
        match state {
            WatchState::Pending { deadline, .. } => Some(*deadline),
            _ => None,
        }
    }
}

fn push_unique(events: &mut Vec<ChangeEvent>, event: ChangeEvent) {
    if !events.contains(&event) {
        events.push(event);
    }
}
