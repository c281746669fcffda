// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::Snowflake;
use crate::clock::{Clock, SystemClock};
use crate::counter::{Counter, CounterMode};
use crate::error::{BoxDynError, Error};
use crate::hostname::{Hostname, SystemHostname};
use crate::layout::{
    DEFAULT_BIT_LEN_COUNTER, DEFAULT_BIT_LEN_MACHINE_ID, DEFAULT_BIT_LEN_TIME, Layout,
};
use crate::machine_id::MachineIdProvider;
use crate::snowflake::SharedSnowflake;
use chrono::prelude::*;
use std::sync::Arc;
use tracing::info;

/// 2022-01-01T00:00:00Z in milliseconds since the Unix epoch.
pub const DEFAULT_EPOCH_MILLIS: i64 = 1_640_995_200_000;

/// A builder for building the [`Snowflake`] generator.
///
/// [`Snowflake`]: struct.Snowflake.html
pub struct Builder<'a> {
    epoch: Option<DateTime<Utc>>,
    clock: Option<Box<dyn Clock>>,
    hostname: Option<Box<dyn Hostname>>,
    machine_id: Option<&'a dyn Fn() -> Result<u64, BoxDynError>>,
    check_machine_id: Option<&'a dyn Fn(u64) -> bool>,
    counter_mode: CounterMode,
    bit_len_time: u8,
    bit_len_machine_id: u8,
    bit_len_counter: u8,
}

impl<'a> Default for Builder<'a> {
    fn default() -> Self {
        Builder::new()
    }
}

impl<'a> Builder<'a> {
    /// Construct a new builder for the build of [`Snowflake`].
    ///
    /// [`Snowflake`]: struct.Snowflake.html
    pub fn new() -> Self {
        Self {
            epoch: None,
            clock: None,
            hostname: None,
            machine_id: None,
            check_machine_id: None,
            counter_mode: CounterMode::Checked,
            bit_len_time: DEFAULT_BIT_LEN_TIME,
            bit_len_machine_id: DEFAULT_BIT_LEN_MACHINE_ID,
            bit_len_counter: DEFAULT_BIT_LEN_COUNTER,
        }
    }

    /// Set the epoch timestamps are counted from.
    /// If the epoch is later than the current time, `finalize` will fail.
    pub fn epoch(mut self, epoch: DateTime<Utc>) -> Self {
        self.epoch = Some(epoch);
        self
    }

    /// Set the clock. Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Set the host name source the default machine id is derived from.
    /// Defaults to [`SystemHostname`].
    pub fn hostname(mut self, hostname: impl Hostname + 'static) -> Self {
        self.hostname = Some(Box::new(hostname));
        self
    }

    /// Set the machine ID.
    /// If the provided closure returns an error, `finalize` will fail.
    /// Without it the machine ID is derived from the host name on first use.
    pub fn machine_id(mut self, machine_id: &'a dyn Fn() -> Result<u64, BoxDynError>) -> Self {
        self.machine_id = Some(machine_id);
        self
    }

    /// Set up a function to check the machine ID.
    /// If the function returns `false`, `finalize` will fail.
    pub fn check_machine_id(mut self, check_machine_id: &'a dyn Fn(u64) -> bool) -> Self {
        self.check_machine_id = Some(check_machine_id);
        self
    }

    /// Choose how the counter treats exhaustion and clock regression.
    pub fn counter_mode(mut self, counter_mode: CounterMode) -> Self {
        self.counter_mode = counter_mode;
        self
    }

    /// Set the bit length of the timestamp section.
    pub fn bit_len_time(mut self, bit_len_time: u8) -> Self {
        self.bit_len_time = bit_len_time;
        self
    }

    /// Set the bit length of the machine ID section.
    pub fn bit_len_machine_id(mut self, bit_len_machine_id: u8) -> Self {
        self.bit_len_machine_id = bit_len_machine_id;
        self
    }

    /// Set the bit length of the counter section.
    pub fn bit_len_counter(mut self, bit_len_counter: u8) -> Self {
        self.bit_len_counter = bit_len_counter;
        self
    }

    /// Finish building and create a Snowflake instance.
    /// This method will return an error if the machine ID closure returns an
    /// error or if validation fails.
    pub fn finalize(self) -> Result<Snowflake, Error> {
        let layout = Layout::new(
            self.bit_len_time,
            self.bit_len_machine_id,
            self.bit_len_counter,
        )?;

        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock));

        let epoch = match self.epoch {
            Some(epoch) => {
                if epoch.timestamp_millis() > clock.peek_millis() {
                    return Err(Error::EpochAheadOfCurrentTime(epoch));
                }
                epoch.timestamp_millis()
            }
            None => DEFAULT_EPOCH_MILLIS,
        };

        let hostname = self.hostname.unwrap_or_else(|| Box::new(SystemHostname));
        let machine_ids = MachineIdProvider::new(layout.max_machine_id(), hostname);

        if let Some(machine_id_fn) = self.machine_id {
            let machine_id = machine_id_fn().map_err(Error::MachineIdFailed)?;
            machine_ids.set(machine_id)?;
        }

        if let Some(check_machine_id) = self.check_machine_id
            && !check_machine_id(machine_ids.get())
        {
            return Err(Error::CheckMachineIdFailed);
        }

        info!(
            bit_len_time = layout.bit_len_time(),
            bit_len_machine_id = layout.bit_len_machine_id(),
            bit_len_counter = layout.bit_len_counter(),
            epoch,
            counter_mode = ?self.counter_mode,
            "snowflake generator ready"
        );

        let shared = Arc::new(SharedSnowflake {
            counter: Counter::new(layout.bit_len_counter(), self.counter_mode),
            layout,
            epoch,
            clock,
            machine_ids,
        });
        Ok(Snowflake::new_inner(shared))
    }
}
