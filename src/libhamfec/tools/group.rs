//!                                Slot Group                                !//
//!
//! Copyright 2024-2025 Ivan Volosyuk
//! Description: Reusable slot buffers of one group

use std::io::{Read, Write};

use crate::{
    backend::Words,
    common::{read_fully, write_fully},
    error::Result,
    layout::{code_slots, is_code_slot, CodecParams},
};

/// Group
/// Slot buffers allocated once per run and reused for every group.
/// `nblocks` is one past the last slot in use, `last_len` the true size of
/// that last slot, all other slots in use are full blocks.
pub struct Group {
    slots: Vec<Vec<u64>>,
    block_size: usize,
    nblocks: usize,
    last_len: usize,
}

impl Group {
    pub fn new(params: &CodecParams) -> Self {
        let slots = (0..params.group_length())
            .map(|i| if i == 0 { Vec::new() } else { vec![0u64; params.words()] })
            .collect();
        return Self { slots, block_size: params.block_size(), nblocks: 0, last_len: 0 };
    }

    pub fn nblocks(&self) -> usize { self.nblocks }
    pub fn last_len(&self) -> usize { self.last_len }

    /// set_bounds
    /// Fixes the geometry of the group about to be coded
    /// Parameters: Slot boundary, Size of the last slot
    pub fn set_bounds(&mut self, nblocks: usize, last_len: usize) {
        debug_assert!(nblocks <= self.slots.len());
        (self.nblocks, self.last_len) = (nblocks, last_len);
    }

    /// slot_len
    /// Returns: Bytes of the slot that belong to the stream
    pub fn slot_len(&self, index: usize) -> usize {
        if index + 1 == self.nblocks { self.last_len } else { self.block_size }
    }

    pub fn clear_slot(&mut self, index: usize) {
        self.slots[index].fill(0);
    }

    /// read_slot
    /// Reads one block from the source into the slot, zero-padding a short read
    /// Parameters: Source reader, Slot index
    /// Returns: Bytes actually read
    pub fn read_slot<R: Read + ?Sized>(&mut self, reader: &mut R, index: usize) -> Result<usize> {
        let buf = self.slots[index].bytes_mut();
        let len = read_fully(reader, buf)?;
        buf[len..].fill(0);
        log::trace!("slot {index}: read {len} bytes");
        return Ok(len);
    }

    /// write_slot
    /// Writes the stream part of the slot to the sink
    /// Parameters: Sink writer, Slot index
    pub fn write_slot<W: Write + ?Sized>(&self, writer: &mut W, index: usize) -> Result<usize> {
        let len = self.slot_len(index);
        write_fully(writer, &self.slots[index].bytes()[..len])?;
        log::trace!("slot {index}: wrote {len} bytes");
        return Ok(len);
    }

    pub fn word(&self, index: usize, offset: usize) -> u64 {
        return self.slots[index][offset];
    }

    pub fn set_word(&mut self, index: usize, offset: usize, value: u64) {
        self.slots[index][offset] = value;
    }

    #[cfg(test)]
    pub fn slot(&self, index: usize) -> &[u64] {
        return &self.slots[index];
    }

    /// propagate
    /// XORs every data slot of the group into each code slot whose bit is set
    /// in the data slot's index. On encode this fills zeroed code slots, on
    /// decode it leaves the syndrome in them.
    pub fn propagate(&mut self) {
        for b in 1..self.nblocks {
            if is_code_slot(b) { continue; }
            for shift in code_slots(self.nblocks).filter(|&shift| b & shift != 0) {
                // shift is a strict sub-mask of b, so it always lands in the lower half
                let (lower, upper) = self.slots.split_at_mut(b);
                lower[shift].xor_from(&upper[0]);
            }
        }
    }
}
