//!                                 Repairer                                 !//
//!
//! Copyright 2024-2025 Ivan Volosyuk
//! Description: hamfec repairer, rewrites an encoded stream with damage scrubbed

use std::io::{Read, Write};

use crate::{
    decoder::{Decoder, Recovery},
    error::Result,
    layout::CodecParams,
    tools::stream::StreamInfo,
};

/// Repairer
/// Corrects an encoded stream and writes it back encoded, code slots
/// regenerated from the corrected data
pub struct Repairer<R: Read, W: Write> {
    decoder: Decoder<R, W>,
}

impl<R: Read, W: Write> Repairer<R, W> {
    pub fn new(reader: R, writer: W, params: CodecParams) -> Self {
        return Self { decoder: Decoder::new(reader, writer, params) };
    }

    /// repair_group
    /// Repairs one group from the source into the sink
    /// Returns: true if more groups may follow, false after the final group
    pub fn repair_group(&mut self) -> Result<bool> {
        // 1. Read, find syndromes and correct, every code word is zero after this
        let more = self.decoder.correct_group()?;

        let damaged = self.decoder.last_recoveries().iter()
            .filter(|r| matches!(r, Recovery::Unrecoverable { .. }))
            .count();
        if damaged > 0 {
            log::warn!(
                "{} damaged word(s) at offset {} rewritten with fresh codes, the damage will no longer be detectable",
                damaged, self.decoder.stream_offset()
            );
        }

        // 2. Regenerate code slots over the corrected data
        let (group, writer) = self.decoder.group_and_writer();
        group.propagate();

        // 3. Write the whole group back, the last slot truncated as received
        let mut written = 0;
        for b in 1..group.nblocks() {
            written += group.write_slot(writer, b)?;
        }
        self.decoder.finish_group(written);

        return Ok(more);
    }

    /// run
    /// Repairs groups until the source is exhausted and flushes the sink
    pub fn run(&mut self) -> Result<()> {
        while self.repair_group()? {}
        return self.flush();
    }

    pub fn flush(&mut self) -> Result<()> { self.decoder.flush() }

    pub fn params(&self) -> &CodecParams { self.decoder.params() }
    pub fn stream_offset(&self) -> u64 { self.decoder.stream_offset() }
    pub fn total_recoverable_errors(&self) -> u64 { self.decoder.total_recoverable_errors() }
    pub fn total_unrecoverable_errors(&self) -> u64 { self.decoder.total_unrecoverable_errors() }
    pub fn last_recoveries(&self) -> &[Recovery] { self.decoder.last_recoveries() }
    pub fn streaminfo(&self) -> &StreamInfo { self.decoder.streaminfo() }
    pub fn into_inner(self) -> (R, W) { self.decoder.into_inner() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;
    use std::io::Cursor;

    fn encode(data: &[u8], params: CodecParams) -> Vec<u8> {
        let mut encoder = Encoder::new(Cursor::new(data.to_vec()), Vec::new(), params);
        encoder.run().unwrap();
        encoder.into_inner().1
    }

    fn repair(encoded: &[u8], params: CodecParams) -> (Vec<u8>, u64, u64) {
        let mut repairer = Repairer::new(Cursor::new(encoded.to_vec()), Vec::new(), params);
        repairer.run().unwrap();
        let (fixed, unfixed) = (repairer.total_recoverable_errors(), repairer.total_unrecoverable_errors());
        (repairer.into_inner().1, fixed, unfixed)
    }

    #[test]
    fn test_repair_restores_encoding() {
        let params = CodecParams::new(16, 16).unwrap();
        let data: Vec<u8> = (0..500u32).map(|i| (i % 251) as u8).collect();
        let clean = encode(&data, params);

        let mut damaged = clean.clone();
        damaged[2 * 16 + 4] ^= 0xaa; // data slot 3
        damaged[16 + 8] ^= 0x01; // code slot 2, second word
        damaged[clean.len() - 1] ^= 0x7f; // tail of the partial last slot

        let (repaired, fixed, unfixed) = repair(&damaged, params);
        assert_eq!(repaired, clean);
        assert_eq!((fixed, unfixed), (3, 0));
    }

    #[test]
    fn test_repair_of_clean_stream_is_identity() {
        let params = CodecParams::new(8, 8).unwrap();
        for len in [0usize, 5, 32, 40] {
            let data = vec![0x5au8; len];
            let clean = encode(&data, params);
            let (repaired, fixed, unfixed) = repair(&clean, params);
            assert_eq!(repaired, clean, "length {len}");
            assert_eq!((fixed, unfixed), (0, 0));
        }
    }

    #[test]
    fn test_unrecoverable_damage_is_kept() {
        let params = CodecParams::new(8, 8).unwrap();
        let data = b"AAAAAAAABBBBBBBBCCCCCCCCDDDDDDDD";
        let mut damaged = encode(data, params);
        damaged[2 * 8] ^= 0x01; // slot 3
        damaged[5 * 8] ^= 0x02; // slot 6

        let (repaired, _, unfixed) = repair(&damaged, params);
        assert_eq!(unfixed, 1);
        // Data slots keep the damage, code slots now agree with it
        assert_eq!(repaired[2 * 8], b'A' ^ 0x01);
        assert_eq!(repaired[5 * 8], b'C' ^ 0x02);
        let (again, fixed, unfixed) = repair(&repaired, params);
        assert_eq!(again, repaired);
        assert_eq!((fixed, unfixed), (0, 0));
    }
}
