//!                                  Encoder                                 !//
//!
//! Copyright 2024-2025 Ivan Volosyuk
//! Description: hamfec encoder

use std::io::{Read, Write};

use crate::{
    error::{Error, Result},
    layout::{is_code_slot, trim_final_group, CodecParams},
    tools::{group::Group, stream::StreamInfo},
};

/// Encoder
/// Reads a plain stream and writes it interleaved with code slots
pub struct Encoder<R: Read, W: Write> {
    reader: R, writer: W,
    params: CodecParams,
    group: Group,
    streaminfo: StreamInfo,
}

impl<R: Read, W: Write> Encoder<R, W> {
    pub fn new(reader: R, writer: W, params: CodecParams) -> Self {
        return Self {
            reader, writer,
            group: Group::new(&params),
            params,
            streaminfo: StreamInfo::new(),
        };
    }

    /// encode_group
    /// Encodes one group from the source into the sink
    /// Returns: true if more input may remain, false after the final group
    pub fn encode_group(&mut self) -> Result<bool> {
        let block_size = self.params.block_size();

        // 1. Fill slots until a short read, code slots are zeroed placeholders
        let (mut index, mut last_len) = (1, block_size);
        while index < self.params.group_length() {
            if is_code_slot(index) {
                self.group.clear_slot(index);
                index += 1;
                continue;
            }
            last_len = self.group.read_slot(&mut self.reader, index)?;
            index += 1;
            if last_len != block_size { break; }
        }

        // 2. An empty final read leaves nothing behind it worth protecting
        let (nblocks, last_len) = trim_final_group(index, last_len, block_size);
        if nblocks <= 1 {
            log::debug!("end of input, no further group");
            return Ok(false);
        }
        self.group.set_bounds(nblocks, last_len);
        log::debug!("encoding group: {} slots, last slot {} bytes", nblocks - 1, last_len);

        // 3. Generate code slots
        self.group.propagate();

        // 4. Write every slot, the last one truncated to its true size
        let (mut consumed, mut written) = (0, 0);
        for b in 1..nblocks {
            let len = self.group.write_slot(&mut self.writer, b)?;
            if !is_code_slot(b) { consumed += len; }
            written += len;
        }
        self.streaminfo.update(consumed, written);

        return Ok(last_len == block_size);
    }

    /// run
    /// Encodes groups until the source is exhausted and flushes the sink
    pub fn run(&mut self) -> Result<()> {
        while self.encode_group()? {}
        return self.flush();
    }

    pub fn flush(&mut self) -> Result<()> {
        return self.writer.flush().map_err(Error::Write);
    }

    pub fn params(&self) -> &CodecParams { &self.params }
    pub fn streaminfo(&self) -> &StreamInfo { &self.streaminfo }
    pub fn into_inner(self) -> (R, W) { (self.reader, self.writer) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(data: &[u8], params: CodecParams) -> Vec<u8> {
        let mut encoder = Encoder::new(Cursor::new(data.to_vec()), Vec::new(), params);
        encoder.run().unwrap();
        encoder.into_inner().1
    }

    #[test]
    fn test_empty_input_encodes_to_nothing() {
        let params = CodecParams::new(8, 8).unwrap();
        let mut encoder = Encoder::new(Cursor::new(Vec::new()), Vec::new(), params);
        assert!(!encoder.encode_group().unwrap());
        assert!(encoder.into_inner().1.is_empty());
    }

    #[test]
    fn test_scenario_layout() {
        let params = CodecParams::new(8, 8).unwrap();
        let data = b"AAAAAAAABBBBBBBBCCCCCCCCDDDDDDDD";
        let encoded = encode(data, params);
        assert_eq!(encoded.len(), 7 * 8);

        let slot = |i: usize| &encoded[(i - 1) * 8..i * 8];
        assert_eq!(slot(3), b"AAAAAAAA");
        assert_eq!(slot(5), b"BBBBBBBB");
        assert_eq!(slot(6), b"CCCCCCCC");
        assert_eq!(slot(7), b"DDDDDDDD");
        assert_eq!(slot(1), [b'A' ^ b'B' ^ b'D'; 8]);
        assert_eq!(slot(2), [b'A' ^ b'C' ^ b'D'; 8]);
        assert_eq!(slot(4), [b'B' ^ b'C' ^ b'D'; 8]);
    }

    #[test]
    fn test_partial_slot_is_truncated() {
        let params = CodecParams::new(8, 8).unwrap();
        let encoded = encode(b"hello", params);
        // Slots 1, 2 carry a copy of slot 3 padded, slot 3 is cut to 5 bytes
        assert_eq!(encoded.len(), 8 + 8 + 5);
        assert_eq!(&encoded[..8], b"hello\0\0\0");
        assert_eq!(&encoded[8..16], b"hello\0\0\0");
        assert_eq!(&encoded[16..], b"hello");
    }

    #[test]
    fn test_trailing_code_slots_are_dropped() {
        let params = CodecParams::new(8, 8).unwrap();
        // Exactly one full data slot: slot 4 must not be emitted
        let encoded = encode(b"12345678", params);
        assert_eq!(encoded.len(), 3 * 8);

        let mut encoder = Encoder::new(Cursor::new(b"12345678".to_vec()), Vec::new(), params);
        assert!(encoder.encode_group().unwrap());
        assert!(!encoder.encode_group().unwrap());
        assert_eq!(encoder.streaminfo().get_groups(), 1);
        assert_eq!(encoder.streaminfo().get_bytes_in(), 8);
        assert_eq!(encoder.streaminfo().get_bytes_out(), 24);
    }

    #[test]
    fn test_full_group_then_one_byte() {
        let params = CodecParams::new(8, 8).unwrap();
        let mut data = vec![7u8; params.group_data_bytes()];
        data.push(9);
        let encoded = encode(&data, params);
        assert_eq!(encoded.len() as u64, params.encoded_len(data.len() as u64));
        assert_eq!(encoded.len(), 7 * 8 + 2 * 8 + 1);
        assert_eq!(*encoded.last().unwrap(), 9);
    }
}
