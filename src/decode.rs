//!                            Decode application                            !//
//!
//! Copyright 2024-2025 Ivan Volosyuk
//! Description: Decoder implementation example

use hamfec::Decoder;
use crate::{
    common::{codec_params, finish, open_input, open_io, report},
    tools::{cli::CliParams, log::LogObj}
};
use std::{io::{self, Read, Write}, process::exit};

fn run<R: Read, W: Write>(decoder: &mut Decoder<R, W>, log: &mut LogObj) -> hamfec::Result<()> {
    while decoder.decode_group()? {
        log.logging(decoder.streaminfo(), false);
    }
    return decoder.flush();
}

/// decode
/// Corrects an encoded stream and strips its code slots
/// Parameters: Input file, CLI parameters
/// Returns: Raw stream on File or stdout
pub fn decode(rfile: String, params: CliParams) {
    let codec = codec_params(&params);
    let (readfile, writefile) = open_io(&rfile, &params.output, params.overwrite);

    let mut decoder = Decoder::new(readfile, writefile, codec);
    let mut log = LogObj::new(params.loglevel, 0.5);
    let result = run(&mut decoder, &mut log);
    log.logging(decoder.streaminfo(), true);
    finish(result);
    report(decoder.total_recoverable_errors(), decoder.total_unrecoverable_errors());
}

/// verify
/// Decodes into nothing and reports the damage found
/// Parameters: Input file, CLI parameters
/// Returns: Exit code 1 if any damage is unrecoverable
pub fn verify(rfile: String, params: CliParams) {
    let codec = codec_params(&params);
    let readfile = open_input(&rfile);

    let mut decoder = Decoder::new(readfile, io::sink(), codec);
    let mut log = LogObj::new(params.loglevel, 0.5);
    let result = run(&mut decoder, &mut log);
    log.logging(decoder.streaminfo(), true);
    finish(result);

    let (fixed, unfixed) = (decoder.total_recoverable_errors(), decoder.total_unrecoverable_errors());
    eprintln!("{} bytes checked, {} word(s) correctable, {} word(s) unrecoverable",
        decoder.stream_offset(), fixed, unfixed);
    if unfixed > 0 { exit(1); }
}
