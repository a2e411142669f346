//! Cumulative wall-clock timers, reported at the end of a run as
//! `t <label> = <microseconds> microseconds` lines.

use std::time::{Duration, Instant};

pub struct Timers {
    entries: Vec<(&'static str, Duration)>,
}

impl Timers {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Run `f`, recording its wall-clock duration under `label`.
    pub fn time<T>(&mut self, label: &'static str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        self.entries.push((label, start.elapsed()));
        result
    }

    /// Record an already-elapsed duration under `label` (used for the
    /// outermost "total" timer, whose span includes emitting this report).
    pub fn record(&mut self, label: &'static str, elapsed: Duration) {
        self.entries.push((label, elapsed));
    }

    pub fn report(&self) {
        for (label, dur) in &self.entries {
            println!("t {label} = {} microseconds", dur.as_micros());
        }
    }
}

impl Default for Timers {
    fn default() -> Self {
        Self::new()
    }
}
