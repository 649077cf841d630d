use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::Emitter;

/// Shared "lit" flag read by the UI lamp.
///
/// Stores the instant the flash turns off; the flag is on while `now` is
/// before it. A newer flash replaces the pending reset of an older one.
#[derive(Clone, Default)]
pub struct FlashIndicator {
    off_at: Rc<Cell<Option<Instant>>>,
}

impl FlashIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_lit(&self, now: Instant) -> bool {
        self.off_at.get().is_some_and(|off_at| now < off_at)
    }

    /// Time until the lamp goes dark, if it is lit
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.off_at
            .get()
            .filter(|&off_at| now < off_at)
            .map(|off_at| off_at - now)
    }

    fn light_until(&self, off_at: Instant) {
        self.off_at.set(Some(off_at));
    }

    fn clear(&self) {
        self.off_at.set(None);
    }
}

pub struct VisualEmitter {
    indicator: FlashIndicator,
}

impl VisualEmitter {
    pub fn new(indicator: FlashIndicator) -> Self {
        Self { indicator }
    }
}

impl Emitter for VisualEmitter {
    fn fire(&mut self, duration: Duration, now: Instant) {
        self.indicator.light_until(now + duration);
    }

    fn silence(&mut self) {
        self.indicator.clear();
    }
}
