use std::time::{Duration, Instant};

/// Identifies one started countdown. A new handle is issued on every start,
/// so events from a superseded countdown can be told apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { handle: TimerHandle, remaining: u32 },
    Expired { handle: TimerHandle },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Urgency {
    Calm,
    Warning,
    Danger,
}

impl Urgency {
    pub fn from_remaining(remaining: u32, warn_secs: u32, danger_secs: u32) -> Self {
        if remaining <= danger_secs {
            Urgency::Danger
        } else if remaining <= warn_secs {
            Urgency::Warning
        } else {
            Urgency::Calm
        }
    }
}

struct Running {
    handle: TimerHandle,
    remaining: u32,
    next_tick: Instant,
}

/// Single-shot per-question countdown, driven by the host's tick loop.
///
/// At most one countdown runs at a time. Once cancelled, superseded, or
/// expired, a handle never produces another event.
pub struct Countdown {
    period: Duration,
    next_id: u64,
    running: Option<Running>,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    pub fn new() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            next_id: 0,
            running: None,
        }
    }

    /// Starts a fresh countdown, cancelling whatever was running.
    pub fn start(&mut self, seconds: u32, now: Instant) -> TimerHandle {
        self.stop();
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.running = Some(Running {
            handle,
            remaining: seconds,
            next_tick: now + self.period,
        });
        handle
    }

    /// Idempotent. Returns true if `handle` was the live countdown.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        if self.is_live(handle) {
            self.running = None;
            true
        } else {
            false
        }
    }

    pub fn stop(&mut self) {
        self.running = None;
    }

    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.running.as_ref().is_some_and(|r| r.handle == handle)
    }

    pub fn remaining(&self) -> Option<u32> {
        self.running.as_ref().map(|r| r.remaining)
    }

    /// Emits one `Tick` per elapsed period, catching up in order, followed by
    /// a single `Expired` when the count reaches zero.
    pub fn poll(&mut self, now: Instant) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        let Some(running) = self.running.as_mut() else {
            return events;
        };

        if running.remaining == 0 {
            events.push(TimerEvent::Expired {
                handle: running.handle,
            });
            self.running = None;
            return events;
        }

        while now >= running.next_tick {
            running.remaining -= 1;
            running.next_tick += self.period;
            events.push(TimerEvent::Tick {
                handle: running.handle,
                remaining: running.remaining,
            });
            if running.remaining == 0 {
                events.push(TimerEvent::Expired {
                    handle: running.handle,
                });
                self.running = None;
                break;
            }
        }
        events
    }
}
