//!                                Error types                               !//
//!
//! Copyright 2024-2025 Ivan Volosyuk
//! Description: Unified error type for the hamfec library

use std::io;
use thiserror::Error;

use crate::common::WORD_SIZE;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Block size must be a positive multiple of {WORD_SIZE} bytes, given: {0}")]
    InvalidBlockSize(usize),

    #[error("Group length must be a power of two no smaller than 4, given: {0}")]
    InvalidGroupLength(usize),

    #[error("Group of {group_length} slots of {block_size} bytes is too large to allocate")]
    GroupTooLarge { block_size: usize, group_length: usize },

    /// Reading the source failed with something other than end-of-stream.
    #[error("Read failed: {0}")]
    Read(#[source] io::Error),

    /// The sink refused bytes. A group is never partially recovered from this.
    #[error("Write failed: {0}")]
    Write(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// is_broken_pipe
    /// Checks if the sink was closed by the reader on the other side
    /// Returns: Broken pipe flag
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Error::Write(err) if err.kind() == io::ErrorKind::BrokenPipe)
    }
}
