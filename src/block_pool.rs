use crate::element::{padded_element_size, Element};
use std::marker::PhantomData;

/// A growable arena of fixed-capacity byte blocks, each seeded with one absolute element of
/// type `T`.
///
/// Blocks are append-only after sealing: only the last block is ever mutated in place or
/// removed, which is what lets this be a trivial `Vec<Vec<u8>>` with no intrusive metadata.
pub struct BlockPool<T> {
    blocks: Vec<Vec<u8>>,
    _marker: PhantomData<T>,
}

impl<T: Element> Default for BlockPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> BlockPool<T> {
    pub fn new() -> Self {
        BlockPool {
            blocks: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Grows the pool by one block of capacity `block_size * padded_element_size::<T>()`,
    /// writes `seed` to its first `T::SIZE` bytes, and returns the new block's index along
    /// with the byte cursor positioned immediately after the seed.
    pub fn allocate_block(&mut self, block_size: usize, seed: T) -> (usize, usize) {
        let capacity = block_size * padded_element_size::<T>();
        let mut block = Vec::with_capacity(capacity);
        block.extend_from_slice(&seed.to_ne_bytes_vec());

        let index = self.blocks.len();
        log::trace!(
            "allocating block {} (capacity {} bytes, seed {})",
            index,
            capacity,
            seed.as_u64()
        );
        self.blocks.push(block);
        (index, T::SIZE)
    }

    /// Resizes the last block's backing storage to exactly `new_len` bytes. Used when sealing
    /// a full block: `new_len` is `used_bytes + padded_element_size::<T>()`, i.e. strictly
    /// larger than the block's actual content length, so this grows (zero-filling the slack)
    /// rather than shrinks in the real call pattern. The zero-filled tail is never read by the
    /// decoder (it lies past every line actually recorded in the block) and exists purely so a
    /// later `pop_back` + re-append-as-absolute has room to write a Long-form entry without
    /// reallocating.
    pub fn resize_last_block(&mut self, new_len: usize) {
        if let Some(block) = self.blocks.last_mut() {
            log::trace!(
                "trimming block {} to {} bytes",
                self.blocks.len() - 1,
                new_len
            );
            block.resize(new_len, 0);
            block.shrink_to_fit();
        }
    }

    /// Truncates the last block's length to `new_len` without releasing capacity. Used by
    /// `pop_back` to roll an in-progress (not yet sealed) block back to its pre-append state,
    /// so the block's originally reserved capacity remains available to later appends.
    pub fn truncate_last_block(&mut self, new_len: usize) {
        if let Some(block) = self.blocks.last_mut() {
            block.truncate(new_len);
        }
    }

    /// Removes the last block, returning the index of the now-last block, or `None` if the
    /// pool is now empty.
    pub fn free_last_block(&mut self) -> Option<usize> {
        self.blocks.pop();
        log::trace!("freed block, {} remain", self.blocks.len());
        if self.blocks.is_empty() {
            None
        } else {
            Some(self.blocks.len() - 1)
        }
    }

    /// Random access to the i-th block's byte buffer.
    pub fn at(&self, block_index: usize) -> &[u8] {
        &self.blocks[block_index]
    }

    /// Mutable random access to the i-th block's byte buffer, used by the codec when
    /// appending entries into the currently-open block.
    pub fn at_mut(&mut self, block_index: usize) -> &mut Vec<u8> {
        &mut self.blocks[block_index]
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Total bytes held across all blocks (the backing capacity, not just the used length;
    /// sealed blocks are trimmed so the two coincide except for the currently-open block).
    pub fn allocated_size(&self) -> usize {
        self.blocks.iter().map(|b| b.capacity()).sum()
    }
}
