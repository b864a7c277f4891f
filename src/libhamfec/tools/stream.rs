//!                                Stream Info                               !//
//!
//! Copyright 2024-2025 Ivan Volosyuk
//! Description: Stream information container

use std::time::Instant;

/// StreamInfo
/// Struct for stream information
pub struct StreamInfo {
    pub start_time: Instant,
    bytes_in: u64,
    bytes_out: u64,
    groups: u64,
}

impl StreamInfo {
    pub fn new() -> StreamInfo {
        StreamInfo {
            start_time: Instant::now(),
            bytes_in: 0,
            bytes_out: 0,
            groups: 0,
        }
    }

    /// update
    /// Accumulates one processed group
    /// Parameters: Bytes consumed, Bytes produced
    pub fn update(&mut self, bytes_in: usize, bytes_out: usize) {
        self.bytes_in += bytes_in as u64;
        self.bytes_out += bytes_out as u64;
        self.groups += 1;
    }

    pub fn get_bytes_in(&self) -> u64 { self.bytes_in }
    pub fn get_bytes_out(&self) -> u64 { self.bytes_out }
    pub fn get_groups(&self) -> u64 { self.groups }

    /// get_speed
    /// Gets the coding speed in input bytes per second
    /// Returns: Coding speed
    pub fn get_speed(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        return if elapsed > 0.0 { self.bytes_in as f64 / elapsed } else { 0.0 };
    }
}

impl Default for StreamInfo {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_accumulates() {
        let mut info = StreamInfo::new();
        info.update(56, 32);
        info.update(17, 1);
        assert_eq!(info.get_bytes_in(), 73);
        assert_eq!(info.get_bytes_out(), 33);
        assert_eq!(info.get_groups(), 2);
        assert!(info.get_speed() >= 0.0);
    }
}
