//! A compressed line-position index for very large text logs.
//!
//! For each line recorded, the index keeps the byte offset at which that line begins.
//! Naively this costs 8 bytes per line; this crate stores the same information in roughly
//! 1-2 bytes per line in the common case by encoding each offset as a delta from the previous
//! one, while still supporting random access in bounded time.
//!
//! The index is built from two [`BlockPool`]s — one holding 32-bit offsets, one holding
//! 64-bit offsets — plus a stateful [`CompressedLinePositionStorage`] that picks the right
//! pool per line and exposes `append`/`pop_back`/`at` as its public surface.
//!
//! ```no_run
//! # fn next_line_offset() -> Option<u64> { unimplemented!() }
//! use linepos::{CompressedLinePositionStorage, LineNumber, LineOffset};
//!
//! let mut storage = CompressedLinePositionStorage::new();
//! while let Some(offset) = next_line_offset() {
//!     storage.append(LineOffset::from(offset));
//! }
//!
//! let tenth_line = storage.at(LineNumber::from(9), None).unwrap();
//! ```

mod block_pool;
mod codec;
mod element;
mod error;
mod storage;
mod types;

pub use error::StorageError;
pub use storage::CompressedLinePositionStorage;
pub use types::{Cache, LineNumber, LineOffset, BLOCK_SIZE};
