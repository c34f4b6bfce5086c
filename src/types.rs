//! Small strong types shared by the block pool, codec and storage state machine.

use std::fmt;

/// The number of lines (and therefore encoded entries) a single block holds before it is
/// sealed and a new one is opened.
///
/// Larger blocks amortize the per-block seed cost further (one `sizeof(T)` seed per 256 lines
/// instead of, say, per 64), but they raise the worst-case `at()` scan cost on a cache miss
/// (up to `BLOCK_SIZE - 1` decode steps) and the worst-case slack `allocated_size()` reserves
/// per sealed block (`padded_element_size::<T>()` bytes). This is a recompile-time tunable,
/// not a runtime one: the source hardcodes a single value and nothing in this crate needs a
/// `BlockPool` generic over it.
pub const BLOCK_SIZE: usize = 256;

/// A 0-based, dense line index into a [`crate::CompressedLinePositionStorage`].
///
/// Kept distinct from [`LineOffset`] so a caller cannot accidentally pass a line count where a
/// byte offset is expected, or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LineNumber(pub usize);

impl fmt::Display for LineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for LineNumber {
    fn from(n: usize) -> Self {
        LineNumber(n)
    }
}

impl From<LineNumber> for usize {
    fn from(n: LineNumber) -> Self {
        n.0
    }
}

/// The byte offset, within the underlying log file, at which a line begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LineOffset(pub u64);

impl fmt::Display for LineOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for LineOffset {
    fn from(n: u64) -> Self {
        LineOffset(n)
    }
}

impl From<LineOffset> for u64 {
    fn from(n: LineOffset) -> Self {
        n.0
    }
}

/// A byte cursor within the current (last) block of a pool.
///
/// `0` means no block is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockOffset(pub usize);

impl BlockOffset {
    pub(crate) fn is_open(&self) -> bool {
        self.0 > 0
    }
}

/// A caller-owned cache slot accelerating sequential `at()` reads.
///
/// Supplying the same `Cache` across consecutive calls with ascending, contiguous indices
/// turns an O(`BLOCK_SIZE`) decode-from-seed into an O(1) single decode step. Passing a stale
/// cache (from a different storage, or taken before a `pop_back`) never causes unsafety: the
/// cache-hit check (`cache.index == index - 1`) simply fails and the lookup falls back to a
/// full block scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cache {
    pub(crate) index: Option<LineNumber>,
    pub(crate) position: LineOffset,
    pub(crate) cursor: BlockOffset,
}
