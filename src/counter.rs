// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::Error;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// How the per-tick counter reacts to exhaustion and to a clock running
/// backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CounterMode {
    /// Reports [`Error::Rollover`] when a tick runs out of sequence numbers
    /// and [`Error::ClockRegression`] when the clock reads earlier than the
    /// last issued tick.
    #[default]
    Checked,
    /// Wraps the sequence modulo `2^bit_len_counter` on every acquisition,
    /// whatever the tick. Never fails, and therefore gives no protection
    /// against duplicate ids from exhaustion or a clock running backwards.
    Wrapping,
}

/// The sequence state of a generator.
///
/// A single atomic word holds `timestamp << bit_len_counter | sequence` of
/// the last issued id. It is only ever updated by compare-and-swap, so no
/// caller blocks another and every failed swap means some other caller made
/// progress.
pub(crate) struct Counter {
    state: AtomicU64,
    bit_len_counter: u8,
    max_counter: u64,
    mode: CounterMode,
}

impl Counter {
    pub(crate) fn new(bit_len_counter: u8, mode: CounterMode) -> Self {
        Self {
            state: AtomicU64::new(0),
            bit_len_counter,
            max_counter: (1 << bit_len_counter) - 1,
            mode,
        }
    }

    /// Take the next sequence number for `timestamp`.
    pub(crate) fn acquire(&self, timestamp: u64) -> Result<u64, Error> {
        match self.mode {
            CounterMode::Checked => self.acquire_checked(timestamp),
            CounterMode::Wrapping => Ok(self.acquire_wrapping(timestamp)),
        }
    }

    fn acquire_checked(&self, timestamp: u64) -> Result<u64, Error> {
        let base = timestamp << self.bit_len_counter;
        let mut current = self.state.load(Ordering::Acquire);

        loop {
            let next = if current < base {
                // first id of a new tick
                base
            } else {
                let diff = current - base;
                if diff == self.max_counter {
                    return Err(Error::Rollover { timestamp });
                }
                if diff > self.max_counter {
                    return Err(self.cold_clock_behind(current, timestamp));
                }
                current + 1
            };

            match self
                .state
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return Ok(next & self.max_counter),
                Err(actual) => current = actual,
            }
        }
    }

    fn acquire_wrapping(&self, timestamp: u64) -> u64 {
        let base = timestamp << self.bit_len_counter;
        let mut current = self.state.load(Ordering::Acquire);

        loop {
            let next = base | (current.wrapping_add(1) & self.max_counter);
            match self
                .state
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return next & self.max_counter,
                Err(actual) => current = actual,
            }
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(&self, current: u64, now: u64) -> Error {
        let last = current >> self.bit_len_counter;
        warn!(last, now, "clock moved backwards, refusing to generate id");
        Error::ClockRegression { last, now }
    }

    /// The `(timestamp, sequence)` of the last issued id.
    pub(crate) fn last(&self) -> (u64, u64) {
        let current = self.state.load(Ordering::Acquire);
        (current >> self.bit_len_counter, current & self.max_counter)
    }

    /// Overwrite the state as if `(timestamp, sequence)` had just been issued.
    pub(crate) fn restore(&self, timestamp: u64, sequence: u64) {
        let value = timestamp << self.bit_len_counter | (sequence & self.max_counter);
        self.state.store(value, Ordering::Release);
    }
}
