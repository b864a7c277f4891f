//!                               Group Layout                               !//
//!
//! Copyright 2024-2025 Ivan Volosyuk
//! Description: Slot roles within a group and codec parameters
//!
//! A group is a run of slots indexed from 1. Every power-of-two index is a
//! code slot holding the XOR of all data slots whose index has that bit set,
//! every other index carries stream data. Slot 0 is reserved.

use std::iter::successors;

use crate::{
    common::{DEFAULT_BLOCK_SIZE, DEFAULT_GROUP_LENGTH, WORD_SIZE},
    error::{Error, Result},
};

/// is_code_slot
/// Checks if the slot at the index carries redundancy
/// Parameters: Slot index
/// Returns: Code slot flag, also true for the reserved slot 0
pub fn is_code_slot(index: usize) -> bool {
    return index & index.wrapping_sub(1) == 0;
}

/// stride
/// Counts the data slots among indices [0, group_length)
/// Parameters: Group length
/// Returns: Data slot count
pub fn stride(group_length: usize) -> usize {
    return (0..group_length).filter(|&i| !is_code_slot(i)).count();
}

/// code_slots
/// Iterates the code slot indices below the boundary, ascending
/// Parameters: Slot boundary (exclusive)
/// Returns: Iterator of powers of two
pub fn code_slots(nblocks: usize) -> impl Iterator<Item = usize> {
    return successors(Some(1usize), |b| b.checked_mul(2)).take_while(move |&b| b < nblocks);
}

/// trim_final_group
/// Collapses the tail of a group whose last read came back empty.
/// The empty slot is dropped, then every code slot left trailing the last
/// data slot is dropped too since it would protect nothing.
/// Parameters: Boundary after the short slot, Bytes in the short slot, Block size
/// Returns: Slot boundary, Bytes of the last emitted slot
pub fn trim_final_group(boundary: usize, last_len: usize, block_size: usize) -> (usize, usize) {
    if last_len != 0 { return (boundary, last_len); }

    let mut nblocks = boundary.saturating_sub(1);
    while nblocks > 1 && is_code_slot(nblocks - 1) { nblocks -= 1; }
    return (nblocks, block_size);
}

/// CodecParams
/// Validated block size and group length, shared by both ends of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecParams {
    block_size: usize,
    group_length: usize,
}

impl CodecParams {
    pub fn new(block_size: usize, group_length: usize) -> Result<Self> {
        Self::verify_block_size(block_size)?;
        Self::verify_group_length(group_length)?;
        if block_size.checked_mul(group_length).is_none() {
            return Err(Error::GroupTooLarge { block_size, group_length });
        }
        return Ok(Self { block_size, group_length });
    }

    fn verify_block_size(block_size: usize) -> Result<()> {
        if block_size == 0 || block_size % WORD_SIZE != 0 {
            return Err(Error::InvalidBlockSize(block_size));
        }
        return Ok(());
    }

    fn verify_group_length(group_length: usize) -> Result<()> {
        // 4 is the first length with a data slot (index 3)
        if group_length < 4 || !group_length.is_power_of_two() {
            return Err(Error::InvalidGroupLength(group_length));
        }
        return Ok(());
    }

    pub fn block_size(&self) -> usize { self.block_size }
    pub fn group_length(&self) -> usize { self.group_length }
    pub fn words(&self) -> usize { self.block_size / WORD_SIZE }

    pub fn code_slot_count(&self) -> usize { code_slots(self.group_length).count() }
    pub fn data_slot_count(&self) -> usize { stride(self.group_length) }

    /// group_data_bytes
    /// Payload carried by one full group
    pub fn group_data_bytes(&self) -> usize { self.data_slot_count() * self.block_size }

    /// correction_capacity
    /// Longest correctable run of corrupted bytes, and the payload span it applies to
    /// Returns: Consecutive bytes, Every n bytes
    pub fn correction_capacity(&self) -> (usize, usize) {
        return (self.block_size, self.group_data_bytes());
    }

    /// encoded_len
    /// Computes the exact encoded stream size for a payload size
    /// Parameters: Payload length in bytes
    /// Returns: Encoded length in bytes
    pub fn encoded_len(&self, data_len: u64) -> u64 {
        let (bsize, group_data) = (self.block_size as u64, self.group_data_bytes() as u64);
        let full_groups = data_len / group_data;
        let rest = data_len % group_data;

        let mut total = full_groups * (self.group_length as u64 - 1) * bsize;
        if rest != 0 {
            let data_slots = rest.div_ceil(bsize);
            let last_index = (1..).filter(|&i| !is_code_slot(i)).nth(data_slots as usize - 1).unwrap_or(0) as u64;
            total += (last_index - 1) * bsize + rest - (data_slots - 1) * bsize;
        }
        return total;
    }
}

impl Default for CodecParams {
    fn default() -> Self {
        return Self { block_size: DEFAULT_BLOCK_SIZE, group_length: DEFAULT_GROUP_LENGTH };
    }
}
