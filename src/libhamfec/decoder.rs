//!                                  Decoder                                 !//
//!
//! Copyright 2024-2025 Ivan Volosyuk
//! Description: hamfec decoder
//!
//! Re-running the encoder's XOR over a received group cancels every code
//! word against the data it protects. A word left nonzero is a syndrome: if
//! exactly one slot differs at that word offset, the code slots holding the
//! same nonzero value spell out that slot's index bit by bit, and XORing the
//! value back into it restores the original word.

use std::io::{Read, Write};

use crate::{
    common::WORD_SIZE,
    error::{Error, Result},
    layout::{code_slots, is_code_slot, CodecParams},
    tools::{group::Group, stream::StreamInfo},
};

/// Recovery
/// Outcome of examining one nonzero syndrome word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// A data word was repaired in place
    Corrected { slot: usize, word: usize, position: u64 },
    /// The damage sat in a code slot, which never reaches the output
    IgnoredCode { slot: usize, word: usize, position: u64 },
    /// More than one slot differs at this word offset, data left as received
    Unrecoverable { stream_offset: u64, word: usize },
}

/// Decoder
/// Reads an encoded stream, corrects it and writes the data slots only
pub struct Decoder<R: Read, W: Write> {
    reader: R, writer: W,
    params: CodecParams,
    group: Group,

    stream_offset: u64,
    total_recoverable_errors: u64,
    total_unrecoverable_errors: u64,
    recoveries: Vec<Recovery>,
    streaminfo: StreamInfo,
}

impl<R: Read, W: Write> Decoder<R, W> {
    pub fn new(reader: R, writer: W, params: CodecParams) -> Self {
        return Self {
            reader, writer,
            group: Group::new(&params),
            params,

            stream_offset: 0,
            total_recoverable_errors: 0,
            total_unrecoverable_errors: 0,
            recoveries: Vec::new(),
            streaminfo: StreamInfo::new(),
        };
    }

    /// correct_group
    /// Reads one encoded group and repairs it in the slot buffers.
    /// Every code word is zero afterwards.
    /// Returns: true if the last slot read was a full block
    pub(crate) fn correct_group(&mut self) -> Result<bool> {
        let block_size = self.params.block_size();
        self.recoveries.clear();

        // 1. Read slots until a short read
        let (mut index, mut last_len) = (1, block_size);
        while index < self.params.group_length() {
            last_len = self.group.read_slot(&mut self.reader, index)?;
            index += 1;
            if last_len != block_size { break; }
        }
        let nblocks = index;
        self.group.set_bounds(nblocks, last_len);
        log::debug!("decoding group at {}: {} slots, last slot {} bytes", self.stream_offset, nblocks - 1, last_len);

        // 2. Syndromes
        self.group.propagate();

        // 3. Locate and fix
        for b in code_slots(nblocks) {
            for offset in 0..self.params.words() {
                let value = self.group.word(b, offset);
                if value == 0 { continue; }
                let recovery = self.recover_word(offset, nblocks, value);
                self.recoveries.push(recovery);
            }
        }

        if is_code_slot(nblocks - 1) && last_len != 0 {
            if (1..nblocks).all(is_code_slot) {
                log::warn!(
                    "Group at offset {} holds no data slot, block size or group length likely differ from the encoder's",
                    self.stream_offset
                );
            }
            else {
                log::warn!(
                    "Stream ends inside code slot {} at offset {}, input is truncated or coded with other parameters",
                    nblocks - 1, self.encoded_len() + self.stream_offset
                );
            }
        }
        return Ok(last_len == block_size);
    }

    /// recover_word
    /// Finds the single slot responsible for a syndrome word and repairs it
    /// Parameters: Word offset within the slots, Slot boundary, Syndrome value
    /// Returns: Recovery outcome
    fn recover_word(&mut self, word_offset: usize, nblocks: usize, value: u64) -> Recovery {
        let (mut index, mut unrecoverable) = (0, false);

        for b in code_slots(nblocks) {
            let word = self.group.word(b, word_offset);
            if word == value { index |= b; }
            else if word != 0 { unrecoverable = true; }
            self.group.set_word(b, word_offset, 0);
        }
        // An address holding no received bytes is several errors aliasing into one
        if index >= nblocks || word_offset * WORD_SIZE >= self.group.slot_len(index) {
            unrecoverable = true;
        }

        if unrecoverable {
            log::warn!(
                "Double (uncorrectable) error detected in group at offset {}, word {}",
                self.stream_offset, word_offset
            );
            self.total_unrecoverable_errors += 1;
            return Recovery::Unrecoverable { stream_offset: self.stream_offset, word: word_offset };
        }

        self.total_recoverable_errors += 1;
        let position = self.stream_offset + ((index - 1) * self.params.block_size() + word_offset * WORD_SIZE) as u64;

        // Code words are syndrome scratch by now and stay zeroed
        if is_code_slot(index) {
            log::warn!("Ignored corruption at recovery codes [slot {index}, offset {position}]");
            return Recovery::IgnoredCode { slot: index, word: word_offset, position };
        }
        let word = self.group.word(index, word_offset);
        self.group.set_word(index, word_offset, word ^ value);
        log::warn!("Corrected corrupted word [slot {index}, offset {position}]");
        return Recovery::Corrected { slot: index, word: word_offset, position };
    }

    /// encoded_len
    /// Returns: Bytes of the encoded stream taken by the current group
    fn encoded_len(&self) -> u64 {
        let nblocks = self.group.nblocks();
        return ((nblocks - 2) * self.params.block_size() + self.group.last_len()) as u64;
    }

    /// finish_group
    /// Advances the stream cursor past the current group
    /// Parameters: Bytes written for this group
    pub(crate) fn finish_group(&mut self, written: usize) {
        let consumed = self.encoded_len();
        self.stream_offset += consumed;
        self.streaminfo.update(consumed as usize, written);
    }

    /// decode_group
    /// Decodes one group from the source into the sink
    /// Returns: true if more groups may follow, false after the final group
    pub fn decode_group(&mut self) -> Result<bool> {
        let more = self.correct_group()?;

        // 4. Write data slots only
        let mut written = 0;
        for b in 1..self.group.nblocks() {
            if is_code_slot(b) { continue; }
            written += self.group.write_slot(&mut self.writer, b)?;
        }
        self.finish_group(written);

        return Ok(more);
    }

    /// run
    /// Decodes groups until the source is exhausted and flushes the sink
    pub fn run(&mut self) -> Result<()> {
        while self.decode_group()? {}
        return self.flush();
    }

    pub fn flush(&mut self) -> Result<()> {
        return self.writer.flush().map_err(Error::Write);
    }

    pub(crate) fn group_and_writer(&mut self) -> (&mut Group, &mut W) {
        return (&mut self.group, &mut self.writer);
    }

    pub fn params(&self) -> &CodecParams { &self.params }
    pub fn stream_offset(&self) -> u64 { self.stream_offset }
    pub fn total_recoverable_errors(&self) -> u64 { self.total_recoverable_errors }
    pub fn total_unrecoverable_errors(&self) -> u64 { self.total_unrecoverable_errors }
    /// Recovery outcomes of the most recent group
    pub fn last_recoveries(&self) -> &[Recovery] { &self.recoveries }
    pub fn streaminfo(&self) -> &StreamInfo { &self.streaminfo }
    pub fn into_inner(self) -> (R, W) { (self.reader, self.writer) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;
    use std::io::Cursor;

    const SCENARIO: &[u8] = b"AAAAAAAABBBBBBBBCCCCCCCCDDDDDDDD";

    fn params_8x8() -> CodecParams {
        CodecParams::new(8, 8).unwrap()
    }

    fn encode(data: &[u8], params: CodecParams) -> Vec<u8> {
        let mut encoder = Encoder::new(Cursor::new(data.to_vec()), Vec::new(), params);
        encoder.run().unwrap();
        encoder.into_inner().1
    }

    /// Decodes group by group, gathering every recovery outcome
    fn decode(encoded: &[u8], params: CodecParams) -> (Vec<u8>, Vec<Recovery>, Decoder<Cursor<Vec<u8>>, Vec<u8>>) {
        let mut decoder = Decoder::new(Cursor::new(encoded.to_vec()), Vec::new(), params);
        let mut recoveries = Vec::new();
        loop {
            let more = decoder.decode_group().unwrap();
            recoveries.extend_from_slice(decoder.last_recoveries());
            if !more { break; }
        }
        let output = std::mem::take(&mut decoder.writer);
        (output, recoveries, decoder)
    }

    #[test]
    fn test_clean_round_trip() {
        let params = params_8x8();
        for len in [0, 1, 7, 8, 9, 31, 32, 33, 64, 100] {
            let data: Vec<u8> = (0..len).map(|i| (i * 7 + 3) as u8).collect();
            let (output, recoveries, decoder) = decode(&encode(&data, params), params);
            assert_eq!(output, data, "length {len}");
            assert!(recoveries.is_empty());
            assert_eq!(decoder.total_recoverable_errors(), 0);
            assert_eq!(decoder.stream_offset(), params.encoded_len(len as u64));
        }
    }

    #[test]
    fn test_scenario_single_byte_flip() {
        let params = params_8x8();
        let mut encoded = encode(SCENARIO, params);
        // Slot 5 starts at (5 - 1) * 8
        encoded[4 * 8 + 3] ^= 0x20;

        let (output, recoveries, decoder) = decode(&encoded, params);
        assert_eq!(output, SCENARIO);
        assert_eq!(recoveries, vec![Recovery::Corrected { slot: 5, word: 0, position: 32 }]);
        assert_eq!(decoder.total_recoverable_errors(), 1);
        assert_eq!(decoder.total_unrecoverable_errors(), 0);
    }

    #[test]
    fn test_whole_slot_corruption_is_corrected() {
        let params = CodecParams::new(32, 8).unwrap();
        let data: Vec<u8> = (0..params.group_data_bytes()).map(|i| i as u8).collect();
        let mut encoded = encode(&data, params);
        // Wipe slot 6 entirely: 4 words, one recovery each
        encoded[5 * 32..6 * 32].fill(0xff);

        let (output, recoveries, decoder) = decode(&encoded, params);
        assert_eq!(output, data);
        assert_eq!(recoveries.len(), 4);
        assert!(recoveries.iter().all(|r| matches!(r, Recovery::Corrected { slot: 6, .. })));
        assert_eq!(decoder.total_recoverable_errors(), 4);
    }

    #[test]
    fn test_code_slot_corruption_is_ignored() {
        let params = params_8x8();
        let mut encoded = encode(SCENARIO, params);
        encoded[3 * 8] ^= 0x01; // slot 4

        let (output, recoveries, decoder) = decode(&encoded, params);
        assert_eq!(output, SCENARIO);
        assert_eq!(recoveries, vec![Recovery::IgnoredCode { slot: 4, word: 0, position: 24 }]);
        assert_eq!(decoder.total_recoverable_errors(), 1);
    }

    #[test]
    fn test_double_corruption_is_detected() {
        let params = CodecParams::new(16, 8).unwrap();
        let data: Vec<u8> = (0..params.group_data_bytes()).map(|i| (i * 5) as u8).collect();
        let mut encoded = encode(&data, params);
        // Same word offset (word 1) in slots 3 and 6, different damage
        encoded[2 * 16 + 9] ^= 0x0f;
        encoded[5 * 16 + 12] ^= 0x40;
        // A lone error in word 0 of slot 7 must still be fixed
        encoded[6 * 16 + 2] ^= 0x80;

        let (output, recoveries, decoder) = decode(&encoded, params);
        assert_eq!(output.len(), data.len());
        assert_eq!(decoder.total_unrecoverable_errors(), 1);
        assert_eq!(decoder.total_recoverable_errors(), 1);
        assert!(recoveries.contains(&Recovery::Unrecoverable { stream_offset: 0, word: 1 }));

        // Word 0 of every slot is intact, word 1 of the two damaged slots is not
        let slot_data = |buf: &[u8], n: usize| buf[n * 16..(n + 1) * 16].to_vec();
        for n in 0..4 {
            assert_eq!(slot_data(&output, n)[..8], slot_data(&data, n)[..8]);
        }
        // Data slot order is 3, 5, 6, 7: slot 5 is untouched
        assert_eq!(slot_data(&output, 1), slot_data(&data, 1));
        assert_ne!(slot_data(&output, 0), slot_data(&data, 0));
    }

    #[test]
    fn test_alias_outside_group_is_unrecoverable() {
        let params = params_8x8();
        // Slots 1..=5: codes 1, 2, 4 and data 3, 5
        let data = b"0123456789abcdef";
        let mut encoded = encode(data, params);
        assert_eq!(encoded.len(), 5 * 8);
        // Equal damage in code slots 2 and 4 points at slot 6, past the end of the stream
        encoded[8] ^= 0x11;
        encoded[3 * 8] ^= 0x11;

        let (output, recoveries, decoder) = decode(&encoded, params);
        assert_eq!(output, data);
        assert_eq!(recoveries, vec![Recovery::Unrecoverable { stream_offset: 0, word: 0 }]);
        assert_eq!(decoder.total_recoverable_errors(), 0);
    }

    #[test]
    fn test_positions_span_groups() {
        let params = params_8x8();
        let data: Vec<u8> = (0..params.group_data_bytes() * 2).map(|i| i as u8).collect();
        let mut encoded = encode(&data, params);
        // Second group, slot 3
        encoded[56 + 2 * 8 + 1] ^= 0x02;

        let (output, recoveries, decoder) = decode(&encoded, params);
        assert_eq!(output, data);
        assert_eq!(recoveries, vec![Recovery::Corrected { slot: 3, word: 0, position: 56 + 16 }]);
        assert_eq!(decoder.stream_offset(), 112);
    }

    #[test]
    fn test_stream_cut_inside_code_slot() {
        let params = params_8x8();
        let mut encoded = encode(SCENARIO, params);
        encoded.truncate(3 * 8 + 4);

        let (output, _, decoder) = decode(&encoded, params);
        // Only slot 3 survives, the partial code slot is dropped
        assert_eq!(output, b"AAAAAAAA");
        assert_eq!(decoder.total_unrecoverable_errors(), 1);
    }
}
