use crate::builder::Builder;
use crate::clock::Clock;
use crate::codec::{self, Encoded, Format};
use crate::counter::Counter;
use crate::error::*;
use crate::layout::{Id, Layout};
use crate::machine_id::{MachineIdProvider, hash_term};
use chrono::prelude::*;
use std::{hash::Hash, sync::Arc, thread, time::Duration};
use tracing::debug;

/// How long the safe path waits for the next tick after a rollover.
const ROLLOVER_BACKOFF: Duration = Duration::from_millis(1);

/// SharedSnowflake is shared between Snowflake instances.
/// This struct is not exposed to the public.
pub(crate) struct SharedSnowflake {
    pub(crate) layout: Layout,
    /// Milliseconds since the Unix epoch.
    pub(crate) epoch: i64,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) machine_ids: MachineIdProvider,
    pub(crate) counter: Counter,
}

/// Snowflake is a distributed unique ID generator.
/// It is thread-safe and can be cloned to be used in multiple threads;
/// clones share the same counter and machine id.
pub struct Snowflake(pub(crate) Arc<SharedSnowflake>);

impl Snowflake {
    /// Create a new Snowflake with the default configuration.
    /// For custom configuration see [`builder`].
    ///
    /// [`builder`]: struct.Snowflake.html#method.builder
    pub fn new() -> Result<Self, Error> {
        Builder::new().finalize()
    }

    /// Create a new [`Builder`] to construct a Snowflake.
    ///
    /// [`Builder`]: struct.Builder.html
    pub fn builder<'a>() -> Builder<'a> {
        Builder::new()
    }

    pub(crate) fn new_inner(shared: Arc<SharedSnowflake>) -> Self {
        Self(shared)
    }

    pub fn layout(&self) -> &Layout {
        &self.0.layout
    }

    /// The epoch in milliseconds since the Unix epoch.
    pub fn epoch_millis(&self) -> i64 {
        self.0.epoch
    }

    /// Milliseconds elapsed since the epoch, checked against the width of
    /// the timestamp field.
    pub fn snowflake_now(&self) -> Result<u64, Error> {
        let elapsed = self.0.clock.now_millis().saturating_sub(self.0.epoch);
        u64::try_from(elapsed)
            .ok()
            .filter(|ts| *ts <= self.0.layout.max_timestamp())
            .ok_or(Error::TimestampOutOfRange(elapsed))
    }

    /// Generate the next id, waiting out a single rollover.
    ///
    /// When the current tick has no sequence numbers left, sleeps for one
    /// millisecond and tries once more. A second rollover and any clock
    /// regression are returned to the caller.
    pub fn generate(&self) -> Result<Id, Error> {
        match self.generate_unsafe() {
            Err(Error::Rollover { timestamp }) => {
                debug!(timestamp, "sequence exhausted, retrying on the next tick");
                thread::sleep(ROLLOVER_BACKOFF);
                self.generate_unsafe()
            }
            result => result,
        }
    }

    /// Generate the next id without retrying.
    pub fn generate_unsafe(&self) -> Result<Id, Error> {
        let timestamp = self.snowflake_now()?;
        let machine_id = self.0.machine_ids.get();
        let counter = self.0.counter.acquire(timestamp)?;
        Ok(Id {
            timestamp,
            machine_id,
            counter,
        })
    }

    /// [`Snowflake::generate`] followed by [`Snowflake::encode`].
    pub fn generate_as(&self, format: Format) -> Result<Encoded, Error> {
        let id = self.generate()?;
        self.encode(format, &id)
    }

    /// [`Snowflake::generate_unsafe`] followed by [`Snowflake::encode`].
    pub fn generate_unsafe_as(&self, format: Format) -> Result<Encoded, Error> {
        let id = self.generate_unsafe()?;
        self.encode(format, &id)
    }

    /// Convert `id` to `format` using this generator's layout.
    pub fn encode(&self, format: Format, id: &Id) -> Result<Encoded, Error> {
        codec::encode(&self.0.layout, format, id)
    }

    /// Convert an encoded id back to its parts.
    pub fn decode(&self, format: Format, value: &Encoded) -> Result<Id, Error> {
        codec::decode(&self.0.layout, format, value)
    }

    /// Decode an 8 byte big-endian id from a slice.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Id, Error> {
        codec::decode_bytes(&self.0.layout, bytes)
    }

    /// The wall-clock time an id was generated at.
    pub fn datetime(&self, id: &Id) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(id.timestamp).ok()?.checked_add(self.0.epoch)?;
        DateTime::from_timestamp_millis(millis)
    }

    pub fn machine_id(&self) -> u64 {
        self.0.machine_ids.get()
    }

    /// Replace the machine id.
    ///
    /// Calling this while other threads generate ids lets those ids carry
    /// either machine id.
    pub fn set_machine_id(&self, machine_id: u64) -> Result<(), Error> {
        self.0.machine_ids.set(machine_id)
    }

    /// Hash an arbitrary term into the machine id range of this generator.
    pub fn term_to_machine_id<T: Hash + ?Sized>(&self, term: &T) -> u64 {
        hash_term(term, self.0.machine_ids.max())
    }

    pub fn hostname(&self) -> String {
        self.0.machine_ids.hostname()
    }

    /// The timestamp and counter of the most recently issued id.
    pub fn last_issued(&self) -> (u64, u64) {
        self.0.counter.last()
    }

    /// Seed the counter as if `(timestamp, counter)` had just been issued.
    pub fn restore(&self, timestamp: u64, counter: u64) -> Result<(), Error> {
        let layout = &self.0.layout;
        if timestamp > layout.max_timestamp() || counter > layout.max_counter() {
            return Err(Error::InvalidArgument(format!(
                "cannot restore ({timestamp}, {counter}): out of range for the layout"
            )));
        }
        self.0.counter.restore(timestamp, counter);
        Ok(())
    }
}

/// Returns a new `Snowflake` referencing the same state as `self`.
/// This is used for concurrent use.
impl Clone for Snowflake {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
