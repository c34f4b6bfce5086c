use crate::block_pool::BlockPool;
use crate::codec::{decode_entry, encode_entry, read_seed};
use crate::element::{padded_element_size, Element};
use crate::error::StorageError;
use crate::types::{BlockOffset, Cache, LineNumber, LineOffset, BLOCK_SIZE};

/// Offsets at or above this threshold require 64-bit storage.
const LONG_THRESHOLD: u64 = 1 << 32;

/// Writes one entry (seed or delta) into the currently open block of `pool`, opening a new
/// block first if none is open. Shared by the 32-bit and 64-bit append paths so the pool
/// choice stays a single per-append boolean rather than a per-element dispatch.
fn append_entry<T: Element>(
    pool: &mut BlockPool<T>,
    cursor: &mut BlockOffset,
    block_index: &mut Option<usize>,
    previous: u64,
    value: T,
) {
    if !cursor.is_open() {
        let (index, after_seed) = pool.allocate_block(BLOCK_SIZE, value);
        *block_index = Some(index);
        *cursor = BlockOffset(after_seed);
    } else {
        let delta = value.as_u64() - previous;
        let index = block_index.expect("a block is open but has no recorded index");
        let block = pool.at_mut(index);
        encode_entry::<T>(block, delta, value);
        *cursor = BlockOffset(block.len());
    }
}

/// A compressed, append/pop/random-access index from line number to byte offset.
///
/// Stores the offset of line 0 and the delta to each following line in a variable-length,
/// byte-packed encoding (1 byte for small deltas, 2 for medium ones, a full absolute value
/// only when needed), spread across fixed-capacity blocks in one of two [`BlockPool`]s — a
/// 32-bit pool used until the first offset reaches 2^32, and a 64-bit pool used from then on.
///
/// ```
/// use linepos::{CompressedLinePositionStorage, LineNumber, LineOffset};
///
/// let mut storage = CompressedLinePositionStorage::new();
/// storage.append(LineOffset::from(0));
/// storage.append(LineOffset::from(42));
/// storage.append(LineOffset::from(57));
///
/// assert_eq!(storage.at(LineNumber::from(1), None).unwrap(), LineOffset::from(42));
/// storage.pop_back();
/// assert_eq!(storage.size(), 2);
/// ```
pub struct CompressedLinePositionStorage {
    small_pool: BlockPool<u32>,
    long_pool: BlockPool<u64>,

    nb_lines: usize,
    current_pos: u64,
    first_long_line: Option<LineNumber>,

    block_index: Option<usize>,
    long_block_index: Option<usize>,

    block_offset: BlockOffset,
    previous_block_offset: BlockOffset,

    /// The small pool's `block_offset` as it stood immediately before the append that
    /// triggered the 32->64 transition, so a `pop_back` of that same entry can resume the
    /// small pool exactly where it left off. Only ever consulted when popping the line at
    /// `first_long_line`, which is the only line whose pop can undo the transition.
    pending_transition: Option<BlockOffset>,

    /// Whether a `pop_back` may currently be issued. Cleared by `pop_back`, set by `append`;
    /// the single-slot rollback scheme this crate implements (see DESIGN.md) does not support
    /// two consecutive pops without an intervening append.
    can_pop: bool,
}

impl Default for CompressedLinePositionStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressedLinePositionStorage {
    pub fn new() -> Self {
        CompressedLinePositionStorage {
            small_pool: BlockPool::new(),
            long_pool: BlockPool::new(),
            nb_lines: 0,
            current_pos: 0,
            first_long_line: None,
            block_index: None,
            long_block_index: None,
            block_offset: BlockOffset(0),
            previous_block_offset: BlockOffset(0),
            pending_transition: None,
            can_pop: false,
        }
    }

    /// Total number of lines recorded.
    pub fn size(&self) -> usize {
        self.nb_lines
    }

    /// Total bytes held across both pools.
    pub fn allocated_size(&self) -> usize {
        self.small_pool.allocated_size() + self.long_pool.allocated_size()
    }

    /// Appends the byte offset of the next line.
    ///
    /// `pos` must be greater than or equal to the previously appended offset (lines only grow
    /// forward through a file); this is a caller contract, checked only in debug builds,
    /// matching the source's treatment of out-of-order appends as a programming bug rather
    /// than a recoverable error.
    pub fn append(&mut self, pos: LineOffset) {
        let pos = pos.0;
        debug_assert!(
            self.nb_lines == 0 || pos >= self.current_pos,
            "append called with out-of-order offset {} (current position {})",
            pos,
            self.current_pos
        );

        if pos >= LONG_THRESHOLD && self.first_long_line.is_none() {
            log::debug!(
                "line {} offset {} crosses 2^32, transitioning to the 64-bit pool",
                self.nb_lines,
                pos
            );
            self.first_long_line = Some(LineNumber(self.nb_lines));
            self.pending_transition = Some(self.block_offset);
            self.block_offset = BlockOffset(0);
        }

        self.previous_block_offset = self.block_offset;

        let in_long_pool = self.first_long_line.is_some();
        if in_long_pool {
            append_entry(
                &mut self.long_pool,
                &mut self.block_offset,
                &mut self.long_block_index,
                self.current_pos,
                pos,
            );
        } else {
            append_entry(
                &mut self.small_pool,
                &mut self.block_offset,
                &mut self.block_index,
                self.current_pos,
                pos as u32,
            );
        }

        self.current_pos = pos;
        self.nb_lines += 1;
        self.can_pop = true;

        self.seal_if_needed(in_long_pool);
    }

    /// Bulk convenience: appends every offset in order.
    pub fn append_list<I: IntoIterator<Item = LineOffset>>(&mut self, offsets: I) {
        for offset in offsets {
            self.append(offset);
        }
    }

    /// Removes the most recently appended line, undoing exactly one `append`.
    ///
    /// Only one `pop_back` is supported per `append`; calling it twice in a row without an
    /// intervening `append` is a caller-contract violation, trapped in debug builds via
    /// `debug_assert!` rather than given a full-rescan fallback (see DESIGN.md).
    pub fn pop_back(&mut self) {
        debug_assert!(self.nb_lines > 0, "pop_back called on an empty storage");
        debug_assert!(
            self.can_pop,
            "pop_back called twice in a row without an intervening append"
        );

        let popped_index = self.nb_lines - 1;
        let in_long_pool = self
            .first_long_line
            .is_some_and(|fl| popped_index >= fl.0);
        let was_transition = self.first_long_line == Some(LineNumber(popped_index));

        if self.previous_block_offset.is_open() {
            if in_long_pool {
                self.long_pool.truncate_last_block(self.previous_block_offset.0);
            } else {
                self.small_pool.truncate_last_block(self.previous_block_offset.0);
            }
            self.block_offset = self.previous_block_offset;
        } else {
            if in_long_pool {
                self.long_block_index = self.long_pool.free_last_block();
            } else {
                self.block_index = self.small_pool.free_last_block();
            }
            self.block_offset = BlockOffset(0);
        }

        self.previous_block_offset = BlockOffset(0);
        self.can_pop = false;

        if was_transition {
            log::debug!("pop_back undid the 32->64 transition at line {}", popped_index);
            self.first_long_line = None;
            self.block_offset = self.pending_transition.take().unwrap_or(BlockOffset(0));
        }

        self.nb_lines -= 1;
        self.current_pos = if self.nb_lines > 0 {
            self.at(LineNumber(self.nb_lines - 1), None)
                .expect("state immediately after pop_back is internally consistent")
                .0
        } else {
            0
        };
    }

    /// Returns the byte offset of `index`, optionally accelerated by a caller-supplied
    /// sequential-read cache.
    pub fn at(&self, index: LineNumber, cache: Option<&mut Cache>) -> Result<LineOffset, StorageError> {
        if index.0 >= self.nb_lines {
            log::error!(
                "at({}) is out of range: storage holds {} lines",
                index.0,
                self.nb_lines
            );
            return Err(StorageError::OutOfRange { index: index.0, size: self.nb_lines });
        }

        let in_long_pool = self.first_long_line.is_some_and(|fl| index.0 >= fl.0);
        let effective_index = if in_long_pool {
            index.0 - self.first_long_line.unwrap().0
        } else {
            index.0
        };
        let block_no = effective_index / BLOCK_SIZE;
        let within = effective_index % BLOCK_SIZE;

        if let Some(cache) = cache {
            if within != 0 && cache.index == Some(LineNumber(index.0 - 1)) {
                let mut cursor = cache.cursor.0;
                let previous = cache.position.0;
                let value = self.decode_one(in_long_pool, block_no, &mut cursor, previous)?;
                cache.index = Some(index);
                cache.position = LineOffset(value);
                cache.cursor = BlockOffset(cursor);
                return Ok(LineOffset(value));
            }

            let value = self.scan_from_seed(in_long_pool, block_no, within, Some(cache))?;
            return Ok(LineOffset(value));
        }

        let value = self.scan_from_seed(in_long_pool, block_no, within, None)?;
        Ok(LineOffset(value))
    }

    fn decode_one(
        &self,
        in_long_pool: bool,
        block_no: usize,
        cursor: &mut usize,
        previous: u64,
    ) -> Result<u64, StorageError> {
        if in_long_pool {
            decode_entry::<u64>(self.long_pool.at(block_no), cursor, previous, block_no)
        } else {
            decode_entry::<u32>(self.small_pool.at(block_no), cursor, previous, block_no)
        }
    }

    fn scan_from_seed(
        &self,
        in_long_pool: bool,
        block_no: usize,
        within: usize,
        cache: Option<&mut Cache>,
    ) -> Result<u64, StorageError> {
        let (mut position, mut cursor) = if in_long_pool {
            read_seed::<u64>(self.long_pool.at(block_no), block_no)?
        } else {
            read_seed::<u32>(self.small_pool.at(block_no), block_no)?
        };

        for _ in 0..within {
            position = self.decode_one(in_long_pool, block_no, &mut cursor, position)?;
        }

        if let Some(cache) = cache {
            let index = if in_long_pool {
                self.first_long_line.unwrap().0 + block_no * BLOCK_SIZE + within
            } else {
                block_no * BLOCK_SIZE + within
            };
            cache.index = Some(LineNumber(index));
            cache.position = LineOffset(position);
            cache.cursor = BlockOffset(cursor);
        }

        Ok(position)
    }

    fn seal_if_needed(&mut self, in_long_pool: bool) {
        let lines_in_block = if in_long_pool {
            (self.nb_lines - self.first_long_line.unwrap().0) % BLOCK_SIZE
        } else {
            self.nb_lines % BLOCK_SIZE
        };

        if lines_in_block != 0 {
            return;
        }

        if in_long_pool {
            let len = self.previous_block_offset.0 + padded_element_size::<u64>();
            self.long_pool.resize_last_block(len);
        } else {
            let len = self.previous_block_offset.0 + padded_element_size::<u32>();
            self.small_pool.resize_last_block(len);
        }

        log::debug!(
            "sealed {} block after {} lines",
            if in_long_pool { "64-bit" } else { "32-bit" },
            BLOCK_SIZE
        );
        self.block_offset = BlockOffset(0);
        // previous_block_offset is left as-is so a pop_back immediately after sealing can
        // still reopen this block.
    }
}
