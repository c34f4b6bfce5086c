use thiserror::Error;

/// Errors surfaced by the crate's fallible public entry points.
///
/// This is distinct from the caller-contract traps (`append`'s non-decreasing-offset
/// precondition, the no-double-`pop_back` rule): those are programming bugs caught only by
/// `debug_assert!` in debug builds, not recoverable runtime conditions, and so have no
/// `StorageError` variant of their own.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// `at(index)` was called with `index >= size()`.
    #[error("line index {index} out of range (storage holds {size} lines)")]
    OutOfRange { index: usize, size: usize },

    /// A block's byte buffer ended before the decoder's cursor expected it to.
    ///
    /// The encoder never produces a stream that triggers this; it exists because `at` and
    /// the codec are also exercised directly by the fuzz target against adversarial buffers,
    /// where "read past the end of a block" must be a recoverable error, not a panic.
    #[error("corrupt block {block_index} at byte offset {offset}")]
    CorruptBlock { block_index: usize, offset: usize },
}

pub type Result<T> = std::result::Result<T, StorageError>;
