// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::{DateTime, Utc};
use std::error::Error as StdError;
use thiserror::Error;

/// Convenience type alias for usage within flakeid.
pub type BoxDynError = Box<dyn StdError + 'static + Send + Sync>;

/// The error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// An unknown format tag, malformed encoded input, or a field that does
    /// not fit its bit width.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The sequence space of the tick is exhausted.
    #[error("sequence exhausted for timestamp {timestamp}")]
    Rollover { timestamp: u64 },
    /// The clock reads earlier than the last issued tick.
    #[error("clock moved backwards: last tick {last}, observed {now}")]
    ClockRegression { last: u64, now: u64 },
    #[error("machine_id `{machine_id}` is greater than the max allowed value {max}")]
    InvalidMachineId { machine_id: u64, max: u64 },
    #[error("machine_id returned an error: {0}")]
    MachineIdFailed(#[source] BoxDynError),
    #[error("check_machine_id returned false")]
    CheckMachineIdFailed,
    #[error(
        "invalid bit length configuration: time({0}) + machine({1}) + counter({2}) must be 63, each at least 1"
    )]
    InvalidBitLength(u8, u8, u8),
    #[error("epoch `{0}` is ahead of current time")]
    EpochAheadOfCurrentTime(DateTime<Utc>),
    #[error("timestamp {0} is outside the range of the timestamp field")]
    TimestampOutOfRange(i64),
}

impl Error {
    /// Whether waiting for the next tick can clear the error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Rollover { .. })
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
