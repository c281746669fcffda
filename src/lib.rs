//! Coordination-free, time-ordered 64-bit ids in the style of [Twitter's Snowflake].
//!
//! An id packs, most significant bit first, one reserved zero bit, a
//! millisecond timestamp, a machine id and a per-millisecond counter. The
//! default layout is 41/10/12 bits with an epoch of 2022-01-01T00:00:00Z.
//! Ids convert to and from 8 big-endian bytes, an integer, a decimal string
//! and base62.
//!
//! ## Quickstart
//!
//! Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! flakeid = "0.1"
//! ```
//!
//! Use the process-wide generator:
//!
//! ```
//! use flakeid::Format;
//!
//! let id = flakeid::generate().unwrap();
//! let b62 = flakeid::encode(Format::B62, &id).unwrap();
//! assert_eq!(flakeid::decode(Format::B62, &b62).unwrap(), id);
//! ```
//!
//! Or build one with its own layout:
//!
//! ```
//! use flakeid::Snowflake;
//!
//! let sf = Snowflake::builder()
//!     .bit_len_time(41)
//!     .bit_len_machine_id(10)
//!     .bit_len_counter(12)
//!     .machine_id(&|| Ok(42))
//!     .finalize()
//!     .unwrap();
//! let id = sf.generate().unwrap();
//! assert_eq!(id.machine_id, 42);
//! ```
//!
//! ## Concurrent use
//!
//! Snowflake is thread safe. `clone` it before moving to another thread;
//! clones share one lock-free counter:
//! ```
//! use flakeid::Snowflake;
//! use std::thread;
//!
//! let sf = Snowflake::new().unwrap();
//!
//! let mut children = Vec::new();
//! for _ in 0..10 {
//!     let thread_sf = sf.clone();
//!     children.push(thread::spawn(move || {
//!         println!("{:?}", thread_sf.generate().unwrap());
//!     }));
//! }
//!
//! for child in children {
//!     child.join().unwrap();
//! }
//! ```
//!
//! ## Failures
//!
//! [`Snowflake::generate`] sleeps one millisecond and retries once when a
//! tick runs out of counter values. [`Snowflake::generate_unsafe`] never
//! retries. Both refuse to issue an id when the clock reads earlier than
//! the last issued tick ([`Error::ClockRegression`]).
//!
//! [Twitter's Snowflake]: https://blog.twitter.com/2010/announcing-snowflake

pub mod base62;
mod builder;
mod clock;
mod codec;
mod counter;
mod error;
mod global;
mod hostname;
mod layout;
mod machine_id;
mod snowflake;

pub use crate::snowflake::*;
pub use builder::*;
pub use clock::*;
pub use codec::{Encoded, Format};
pub use counter::CounterMode;
pub use error::*;
pub use global::*;
pub use hostname::*;
pub use layout::*;
pub use machine_id::hash_term;
