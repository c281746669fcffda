// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Free functions backed by one process-wide generator with the default
//! layout, epoch, clock and host name.

use crate::codec::{Encoded, Format};
use crate::error::Error;
use crate::layout::Id;
use crate::snowflake::Snowflake;
use std::hash::Hash;
use std::sync::OnceLock;

static DEFAULT: OnceLock<Snowflake> = OnceLock::new();

/// The process-wide generator, created on first use.
pub fn default_generator() -> &'static Snowflake {
    // Without an epoch, machine id closure or check, `finalize` can only fail
    // on the bit lengths, and the default ones add up to 63.
    DEFAULT.get_or_init(|| Snowflake::new().expect("default snowflake configuration is valid"))
}

/// See [`Snowflake::generate`].
pub fn generate() -> Result<Id, Error> {
    default_generator().generate()
}

/// See [`Snowflake::generate_unsafe`].
pub fn generate_unsafe() -> Result<Id, Error> {
    default_generator().generate_unsafe()
}

pub fn generate_as(format: Format) -> Result<Encoded, Error> {
    default_generator().generate_as(format)
}

pub fn generate_unsafe_as(format: Format) -> Result<Encoded, Error> {
    default_generator().generate_unsafe_as(format)
}

pub fn encode(format: Format, id: &Id) -> Result<Encoded, Error> {
    default_generator().encode(format, id)
}

pub fn decode(format: Format, value: &Encoded) -> Result<Id, Error> {
    default_generator().decode(format, value)
}

pub fn machine_id() -> u64 {
    default_generator().machine_id()
}

/// See [`Snowflake::set_machine_id`].
pub fn set_machine_id(machine_id: u64) -> Result<(), Error> {
    default_generator().set_machine_id(machine_id)
}

pub fn term_to_machine_id<T: Hash + ?Sized>(term: &T) -> u64 {
    default_generator().term_to_machine_id(term)
}

pub fn hostname() -> String {
    default_generator().hostname()
}
