// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Base62 with the alphabet ordered digits, then upper case, then lower case.
//!
//! This is not the ordering most base62 libraries use (`0-9a-zA-Z`), so
//! strings produced here only decode correctly with this module.

use crate::error::Error;

const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const BASE: u64 = 62;
const NO_VALUE: u8 = 255;

/// Longest encoding of a `u64`.
const MAX_LEN: usize = 11;

const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        lut[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    lut
};

/// Encode `value`. Zero encodes as `"0"`.
pub fn encode(mut value: u64) -> String {
    if value == 0 {
        return "0".to_owned();
    }

    let mut buf = [0_u8; MAX_LEN];
    let mut start = MAX_LEN;
    while value > 0 {
        start -= 1;
        buf[start] = ALPHABET[(value % BASE) as usize];
        value /= BASE;
    }
    buf[start..].iter().map(|&b| char::from(b)).collect()
}

/// Decode a base62 string, honouring a single leading `-`.
pub fn decode(input: &str) -> Result<i64, Error> {
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    if digits.is_empty() {
        return Err(Error::invalid_argument(format!(
            "`{input}` is not a base62 number"
        )));
    }

    let mut magnitude: u64 = 0;
    for byte in digits.bytes() {
        let value = LOOKUP[byte as usize];
        if value == NO_VALUE {
            return Err(Error::invalid_argument(format!(
                "`{input}` contains a character outside the base62 alphabet"
            )));
        }
        magnitude = magnitude
            .checked_mul(BASE)
            .and_then(|m| m.checked_add(u64::from(value)))
            .ok_or_else(|| overflow(input))?;
    }

    if negative {
        0_i64
            .checked_sub_unsigned(magnitude)
            .ok_or_else(|| overflow(input))
    } else {
        i64::try_from(magnitude).map_err(|_| overflow(input))
    }
}

fn overflow(input: &str) -> Error {
    Error::invalid_argument(format!("base62 value `{input}` overflows 64 bits"))
}
