//!                            Repair application                            !//
//!
//! Copyright 2024-2025 Ivan Volosyuk
//! Description: Repairer implementation example

use hamfec::Repairer;
use crate::{
    common::{codec_params, finish, open_io, report},
    tools::{cli::CliParams, log::LogObj}
};
use std::io::{Read, Write};

fn run<R: Read, W: Write>(repairer: &mut Repairer<R, W>, log: &mut LogObj) -> hamfec::Result<()> {
    while repairer.repair_group()? {
        log.logging(repairer.streaminfo(), false);
    }
    return repairer.flush();
}

/// repair
/// Rewrites an encoded stream with correctable damage scrubbed
/// Parameters: Input file, CLI parameters
/// Returns: Repaired stream on File or stdout
pub fn repair(rfile: String, params: CliParams) {
    let codec = codec_params(&params);
    let (readfile, writefile) = open_io(&rfile, &params.output, params.overwrite);

    let mut repairer = Repairer::new(readfile, writefile, codec);
    let mut log = LogObj::new(params.loglevel, 0.5);
    let result = run(&mut repairer, &mut log);
    log.logging(repairer.streaminfo(), true);
    finish(result);
    report(repairer.total_recoverable_errors(), repairer.total_unrecoverable_errors());
}
