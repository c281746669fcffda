// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::Error;
use crate::hostname::Hostname;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Marks the cache as empty. No layout has a 64 bit machine id field, so the
/// value can never collide with a real id.
const UNSET: u64 = u64::MAX;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64 bit FNV-1a. Unlike `DefaultHasher` its output is fixed across
/// processes and compiler versions.
struct FnvHasher(u64);

impl Default for FnvHasher {
    fn default() -> Self {
        Self(FNV_OFFSET_BASIS)
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 ^= u64::from(*byte);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }
}

/// Hash `term` into `[0, max_machine_id]`.
///
/// `max_machine_id` is a field mask (`2^bits - 1`), so masking the hash is
/// the same as reducing it modulo `2^bits`. The same term always maps to the
/// same machine id.
pub fn hash_term<T: Hash + ?Sized>(term: &T, max_machine_id: u64) -> u64 {
    let mut hasher = FnvHasher::default();
    term.hash(&mut hasher);
    hasher.finish() & max_machine_id
}

/// Lazily resolves and caches the machine id of a generator.
pub(crate) struct MachineIdProvider {
    cached: AtomicU64,
    max: u64,
    hostname: Box<dyn Hostname>,
}

impl MachineIdProvider {
    pub(crate) fn new(max: u64, hostname: Box<dyn Hostname>) -> Self {
        Self {
            cached: AtomicU64::new(UNSET),
            max,
            hostname,
        }
    }

    /// Returns the cached machine id, deriving it from the host name on
    /// first use. Racing first calls compute the same value, so whichever
    /// store wins is the one every caller sees.
    pub(crate) fn get(&self) -> u64 {
        let cached = self.cached.load(Ordering::Acquire);
        if cached != UNSET {
            return cached;
        }

        let hostname = self.hostname.get();
        let derived = hash_term(hostname.as_str(), self.max);
        match self
            .cached
            .compare_exchange(UNSET, derived, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {
                debug!(%hostname, machine_id = derived, "derived machine id from hostname");
                derived
            }
            Err(current) => current,
        }
    }

    /// Overwrite the machine id.
    ///
    /// Ids generated concurrently with this call may carry either value.
    pub(crate) fn set(&self, machine_id: u64) -> Result<(), Error> {
        if machine_id > self.max {
            return Err(Error::InvalidMachineId {
                machine_id,
                max: self.max,
            });
        }
        self.cached.store(machine_id, Ordering::Release);
        info!(machine_id, "machine id set");
        Ok(())
    }

    pub(crate) fn max(&self) -> u64 {
        self.max
    }

    pub(crate) fn hostname(&self) -> String {
        self.hostname.get()
    }
}
