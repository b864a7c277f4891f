//!                               Library tools                              !//
//!
//! Copyright 2024-2025 Ivan Volosyuk
//! Description: Buffers and bookkeeping shared by the coders

pub mod group;
pub mod stream;
