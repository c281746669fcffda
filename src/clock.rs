// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::{DateTime, Utc};
use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

/// A source of wall-clock milliseconds since the Unix epoch.
///
/// Readings are not required to be monotonic. The counter detects a clock
/// that runs backwards and reports it instead of issuing a duplicate id.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;

    /// A reading used for configuration checks rather than id generation.
    /// Clocks whose readings have side effects return the current time
    /// without applying them.
    fn peek_millis(&self) -> i64 {
        self.now_millis()
    }
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same reading, so a handle kept outside a generator can
/// steer the copy that was handed to the [`Builder`].
///
/// [`Builder`]: crate::Builder
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
    step: i64,
}

impl ManualClock {
    /// A clock frozen at `millis`.
    pub fn new(millis: i64) -> Self {
        Self::with_step(millis, 0)
    }

    /// A clock starting at `millis` that moves forward by `step` after every
    /// reading taken through [`Clock::now_millis`].
    pub fn with_step(millis: i64, step: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(millis)),
            step,
        }
    }

    /// A frozen clock reading `time`.
    pub fn at(time: DateTime<Utc>) -> Self {
        Self::new(time.timestamp_millis())
    }

    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.millis.fetch_add(self.step, Ordering::SeqCst)
    }

    /// Does not move a stepping clock forward.
    fn peek_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }

    fn peek_millis(&self) -> i64 {
        (**self).peek_millis()
    }
}
