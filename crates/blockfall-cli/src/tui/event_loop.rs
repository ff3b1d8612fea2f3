use std::time::{Duration, Instant};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Event loop state management.
///
/// Runs two independent clocks: frames (input + render) and cycles (game
/// logic). If an interval is not set, that event type will not be generated.
/// When both are due at the same time the frame is delivered first, so input
/// gathered during a frame always reaches the game before the cycle does.
#[derive(Debug)]
pub(super) struct EventLoop {
    frame_interval: Option<Duration>,
    cycle_interval: Option<Duration>,
    last_frame: Instant,
    last_cycle: Instant,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates a new `EventLoop` with both clocks disabled.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Self {
            frame_interval: None,
            cycle_interval: None,
            last_frame: now,
            last_cycle: now,
        }
    }

    pub(super) fn set_frame_interval(&mut self, interval: Option<Duration>) {
        self.frame_interval = interval;
    }

    pub(super) fn set_cycle_interval(&mut self, interval: Option<Duration>) {
        self.cycle_interval = interval;
    }

    /// Restarts the cycle clock, so the next cycle is a full interval away.
    pub(super) fn restart_cycle_clock(&mut self) {
        self.last_cycle = Instant::now();
    }

    /// Returns the next event.
    ///
    /// Blocks until a frame or cycle is due or a crossterm event occurs.
    /// If both intervals are unset, only waits for crossterm events.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.due_event(now) {
                return Ok(event);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            return Ok(event::read()?.into());
        }
    }

    fn due_event(&mut self, now: Instant) -> Option<TuiEvent> {
        if let Some(interval) = self.frame_interval
            && now.duration_since(self.last_frame) >= interval
        {
            self.last_frame = now;
            return Some(TuiEvent::Frame);
        }
        if let Some(interval) = self.cycle_interval
            && now.duration_since(self.last_cycle) >= interval
        {
            self.last_cycle = now;
            return Some(TuiEvent::Cycle);
        }
        None
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_frame_at = self.frame_interval.map(|interval| self.last_frame + interval);
        let next_cycle_at = self.cycle_interval.map(|interval| self.last_cycle + interval);
        let next_timeout_at = [next_frame_at, next_cycle_at].into_iter().flatten().min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}
