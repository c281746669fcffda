// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::base62;
use crate::error::Error;
use crate::layout::{Id, Layout};
use std::fmt;
use std::str::FromStr;

/// The external representations of an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// 8 bytes, big-endian.
    Bin,
    /// The packed id as an unsigned integer.
    Int,
    /// The packed id in base 10.
    Str,
    /// The packed id in base62, see [`crate::base62`].
    B62,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Bin => "bin",
            Format::Int => "int",
            Format::Str => "str",
            Format::B62 => "b62",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bin" => Ok(Format::Bin),
            "int" => Ok(Format::Int),
            "str" => Ok(Format::Str),
            "b62" => Ok(Format::B62),
            other => Err(Error::invalid_argument(format!(
                "unknown id format `{other}`"
            ))),
        }
    }
}

/// An id in one of its external representations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Encoded {
    Bin([u8; 8]),
    Int(u64),
    Str(String),
    B62(String),
}

impl Encoded {
    pub fn format(&self) -> Format {
        match self {
            Encoded::Bin(_) => Format::Bin,
            Encoded::Int(_) => Format::Int,
            Encoded::Str(_) => Format::Str,
            Encoded::B62(_) => Format::B62,
        }
    }
}

impl fmt::Display for Encoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoded::Bin(bytes) => bytes.iter().try_for_each(|b| write!(f, "{b:02x}")),
            Encoded::Int(value) => write!(f, "{value}"),
            Encoded::Str(s) | Encoded::B62(s) => f.write_str(s),
        }
    }
}

/// Convert `id` to `format`.
pub fn encode(layout: &Layout, format: Format, id: &Id) -> Result<Encoded, Error> {
    let raw = layout.to_u64(id)?;
    Ok(match format {
        Format::Bin => Encoded::Bin(raw.to_be_bytes()),
        Format::Int => Encoded::Int(raw),
        Format::Str => Encoded::Str(raw.to_string()),
        Format::B62 => Encoded::B62(base62::encode(raw)),
    })
}

/// Convert `value`, which must be in `format`, back to an id.
pub fn decode(layout: &Layout, format: Format, value: &Encoded) -> Result<Id, Error> {
    let raw = match (format, value) {
        (Format::Bin, Encoded::Bin(bytes)) => u64::from_be_bytes(*bytes),
        (Format::Int, Encoded::Int(raw)) => *raw,
        (Format::Str, Encoded::Str(s)) => {
            check_canonical(s, "decimal", |b| b.is_ascii_digit())?;
            s.parse::<u64>().map_err(|e| {
                Error::invalid_argument(format!("`{s}` is not a decimal id: {e}"))
            })?
        }
        (Format::B62, Encoded::B62(s)) => {
            check_canonical(s, "base62", |b| b.is_ascii_alphanumeric())?;
            let signed = base62::decode(s)?;
            u64::try_from(signed).map_err(|_| {
                Error::invalid_argument(format!("`{s}` decodes to a negative id"))
            })?
        }
        (format, value) => {
            return Err(Error::invalid_argument(format!(
                "expected a `{format}` value, got `{}`",
                value.format()
            )));
        }
    };
    layout.from_u64(raw)
}

/// Ids are written without a sign and without leading zeros, so any other
/// spelling of the same value is rejected.
fn check_canonical(s: &str, kind: &str, is_digit: impl Fn(u8) -> bool) -> Result<(), Error> {
    let canonical = !s.is_empty()
        && s.bytes().all(is_digit)
        && (s.len() == 1 || !s.starts_with('0'));
    if !canonical {
        return Err(Error::invalid_argument(format!(
            "`{s}` is not a canonical {kind} id"
        )));
    }
    Ok(())
}

/// Decode an id from a byte slice, which must be exactly 8 bytes long.
pub fn decode_bytes(layout: &Layout, bytes: &[u8]) -> Result<Id, Error> {
    let bytes: [u8; 8] = bytes.try_into().map_err(|_| {
        Error::invalid_argument(format!("binary id must be 8 bytes, got {}", bytes.len()))
    })?;
    layout.unpack(bytes)
}
