//!                               Common tools                               !//
//!
//! Copyright 2024-2025 Ivan Volosyuk
//! Description: Common constants and I/O glue for hamfec

use std::io::{ErrorKind, Read, Write};

use crate::error::{Error, Result};

// XOR granularity, corruption is located per word
pub const WORD_SIZE: usize = std::mem::size_of::<u64>();

// Defaults
pub const DEFAULT_BLOCK_SIZE: usize = 1024 * 1024;
pub const DEFAULT_GROUP_LENGTH: usize = 128;

/// read_fully
/// Fills the buffer by repeated reads until it is full or the source hits end-of-stream
/// Parameters: Source reader, Buffer
/// Returns: Total bytes read, never more than the buffer length
pub fn read_fully<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut total_read = 0;

    while total_read < buf.len() {
        match reader.read(&mut buf[total_read..]) {
            Ok(0) => break,
            Ok(read_size) => total_read += read_size,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(Error::Read(err)),
        }
    }
    return Ok(total_read);
}

/// write_fully
/// Writes the whole buffer to the sink, any short write is an error
/// Parameters: Sink writer, Buffer
pub fn write_fully<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> Result<()> {
    return writer.write_all(buf).map_err(Error::Write);
}
