//!                               Word Backend                               !//
//!
//! Copyright 2024-2025 Ivan Volosyuk
//! Description: Word buffer helpers for hamfec
//!
//! Slots are stored as native u64 words so XOR runs a word at a time, and
//! viewed as bytes only for I/O. XOR does not care about byte order, so the
//! native layout is never visible in the stream.

pub trait Words {
    fn bytes(&self) -> &[u8];
    fn bytes_mut(&mut self) -> &mut [u8];
    fn xor_from(&mut self, other: &[u64]);
}

impl Words for [u64] {
    fn bytes(&self) -> &[u8] {
        return bytemuck::cast_slice(self);
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        return bytemuck::cast_slice_mut(self);
    }

    /// xor_from
    /// XORs another buffer into this one, word by word
    /// Parameters: Source words, same length as self
    fn xor_from(&mut self, other: &[u64]) {
        debug_assert_eq!(self.len(), other.len());
        self.iter_mut().zip(other).for_each(|(dst, src)| *dst ^= src);
    }
}
