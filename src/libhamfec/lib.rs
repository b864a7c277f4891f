//!                              hamfec Library                              !//
//!
//! Copyright 2024-2025 Ivan Volosyuk
//! Description: Streaming Hamming-indexed XOR forward error correction
//!
//! The stream is cut into blocks, and every power-of-two slot of a group
//! carries the XOR of the data slots whose index has that bit set. Any
//! number of corrupted bytes confined to one slot per word offset of a group
//! is corrected; damage in two slots at the same word offset is reported.

mod backend;
mod tools;

pub mod common;
pub mod error;
pub mod layout;

mod encoder;
mod decoder;
mod repairer;

pub use error::{Error, Result};
pub use layout::{code_slots, is_code_slot, stride, trim_final_group, CodecParams};
pub use tools::stream::StreamInfo;
pub use encoder::Encoder;
pub use decoder::{Decoder, Recovery};
pub use repairer::Repairer;
