// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::Error;

/// bit length of time
pub const DEFAULT_BIT_LEN_TIME: u8 = 41;
/// bit length of machine id
pub const DEFAULT_BIT_LEN_MACHINE_ID: u8 = 10;
/// bit length of the per-tick counter
pub const DEFAULT_BIT_LEN_COUNTER: u8 = 12;

/// Bits available below the reserved sign bit.
const PAYLOAD_BITS: u16 = 63;

/// The three parts of a Snowflake id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id {
    /// Milliseconds since the generator's epoch.
    pub timestamp: u64,
    pub machine_id: u64,
    /// Position of the id within its tick.
    pub counter: u64,
}

impl Id {
    pub const fn new(timestamp: u64, machine_id: u64, counter: u64) -> Self {
        Self {
            timestamp,
            machine_id,
            counter,
        }
    }
}

/// The bit layout of an id, most significant bit first:
///
/// ```text
/// | 0 | timestamp | machine_id | counter |
/// ```
///
/// The widths always add up to 63, so a packed id fits in a `u64` with the
/// top bit clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    bit_len_time: u8,
    bit_len_machine_id: u8,
    bit_len_counter: u8,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            bit_len_time: DEFAULT_BIT_LEN_TIME,
            bit_len_machine_id: DEFAULT_BIT_LEN_MACHINE_ID,
            bit_len_counter: DEFAULT_BIT_LEN_COUNTER,
        }
    }
}

impl Layout {
    /// Validate and build a layout. Every field needs at least one bit and
    /// the three widths must add up to 63.
    pub fn new(
        bit_len_time: u8,
        bit_len_machine_id: u8,
        bit_len_counter: u8,
    ) -> Result<Self, Error> {
        let total =
            u16::from(bit_len_time) + u16::from(bit_len_machine_id) + u16::from(bit_len_counter);
        if total != PAYLOAD_BITS
            || bit_len_time == 0
            || bit_len_machine_id == 0
            || bit_len_counter == 0
        {
            return Err(Error::InvalidBitLength(
                bit_len_time,
                bit_len_machine_id,
                bit_len_counter,
            ));
        }
        Ok(Self {
            bit_len_time,
            bit_len_machine_id,
            bit_len_counter,
        })
    }

    pub fn bit_len_time(&self) -> u8 {
        self.bit_len_time
    }

    pub fn bit_len_machine_id(&self) -> u8 {
        self.bit_len_machine_id
    }

    pub fn bit_len_counter(&self) -> u8 {
        self.bit_len_counter
    }

    pub fn max_timestamp(&self) -> u64 {
        mask(self.bit_len_time)
    }

    pub fn max_machine_id(&self) -> u64 {
        mask(self.bit_len_machine_id)
    }

    pub fn max_counter(&self) -> u64 {
        mask(self.bit_len_counter)
    }

    /// Pack `id` into its integer form.
    pub fn to_u64(&self, id: &Id) -> Result<u64, Error> {
        check_field("timestamp", id.timestamp, self.max_timestamp())?;
        check_field("machine_id", id.machine_id, self.max_machine_id())?;
        check_field("counter", id.counter, self.max_counter())?;

        Ok(id.timestamp << (self.bit_len_machine_id + self.bit_len_counter)
            | id.machine_id << self.bit_len_counter
            | id.counter)
    }

    /// Split an integer id into its parts. The reserved top bit must be clear.
    pub fn from_u64(&self, raw: u64) -> Result<Id, Error> {
        if raw >> PAYLOAD_BITS != 0 {
            return Err(Error::invalid_argument(format!(
                "id {raw} has the reserved top bit set"
            )));
        }
        Ok(Id {
            timestamp: raw >> (self.bit_len_machine_id + self.bit_len_counter),
            machine_id: (raw >> self.bit_len_counter) & self.max_machine_id(),
            counter: raw & self.max_counter(),
        })
    }

    /// Pack `id` into 8 big-endian bytes.
    pub fn pack(&self, id: &Id) -> Result<[u8; 8], Error> {
        self.to_u64(id).map(u64::to_be_bytes)
    }

    /// Reverse of [`Layout::pack`].
    pub fn unpack(&self, bytes: [u8; 8]) -> Result<Id, Error> {
        self.from_u64(u64::from_be_bytes(bytes))
    }
}

fn mask(bits: u8) -> u64 {
    (1 << bits) - 1
}

fn check_field(name: &str, value: u64, max: u64) -> Result<(), Error> {
    if value > max {
        return Err(Error::invalid_argument(format!(
            "{name} {value} does not fit in its field (max {max})"
        )));
    }
    Ok(())
}
