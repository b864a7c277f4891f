//!                            Encode application                            !//
//!
//! Copyright 2024-2025 Ivan Volosyuk
//! Description: Encoder implementation example

use hamfec::Encoder;
use crate::{
    common::{codec_params, finish, open_io},
    tools::{cli::CliParams, log::LogObj}
};
use std::io::{Read, Write};

fn run<R: Read, W: Write>(encoder: &mut Encoder<R, W>, log: &mut LogObj) -> hamfec::Result<()> {
    while encoder.encode_group()? {
        log.logging(encoder.streaminfo(), false);
    }
    return encoder.flush();
}

/// encode
/// Protects a raw stream with code slots
/// Parameters: Input file, CLI parameters
/// Returns: Encoded stream on File or stdout
pub fn encode(rfile: String, params: CliParams) {
    let codec = codec_params(&params);
    let (readfile, writefile) = open_io(&rfile, &params.output, params.overwrite);

    let mut encoder = Encoder::new(readfile, writefile, codec);
    let mut log = LogObj::new(params.loglevel, 0.5);
    let result = run(&mut encoder, &mut log);
    log.logging(encoder.streaminfo(), true);
    finish(result);
}
