/// A countdown bound to one recipe step.
///
/// `remaining` never exceeds `duration` and never goes below zero. Once it
/// reaches zero the timer stays expired until it is reset or discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    duration: u64,
    remaining: u64,
    running: bool,
    step: usize,
}

impl Timer {
    /// Create a running timer for `step`.
    pub fn start(step: usize, duration: u64) -> Self {
        Timer {
            duration,
            remaining: duration,
            running: duration > 0,
            step,
        }
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Count down one second. Returns true when this tick expired the timer.
    pub fn tick(&mut self) -> bool {
        if !self.running || self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.running = false;
            return true;
        }
        false
    }

    /// Pause or resume. Has no effect once expired.
    pub fn toggle(&mut self) {
        if !self.is_expired() {
            self.running = !self.running;
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.running = false;
    }
}
