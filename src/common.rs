//!                         Common application tools                         !//
//!
//! Copyright 2024-2025 Ivan Volosyuk
//! Description: Common tools for the hamfec executable

use std::{fs::File, io::{self, BufWriter, IsTerminal, Read, Write}, path::Path, process::exit};

use hamfec::CodecParams;
use same_file::is_same_file;

use crate::tools::cli::CliParams;

// Pipe and null device
pub const PIPEIN: &[&str] = &["-", "/dev/stdin", "/dev/fd/0"];
pub const PIPEOUT: &[&str] = &["-", "/dev/stdout", "/dev/fd/1"];

const UNITS: [&str; 11] = ["", "k", "M", "G", "T", "P", "E", "Z", "Y", "R", "Q"];

/// format_si
/// Formats a number to SI prefixed format
/// Parameters: Number
/// Returns: Formatted number string
pub fn format_si(n: f64) -> String {
    let exp = (n.abs().log10() / 3.0).floor().clamp(0.0, UNITS.len() as f64 - 1.0);
    format!("{:.3} {}", n / 1000.0f64.powi(exp as i32), UNITS[exp as usize])
}

/// codec_params
/// Validates the block size and group length given on the command line
/// Parameters: CLI parameters
/// Returns: Codec parameters, exits on invalid input
pub fn codec_params(params: &CliParams) -> CodecParams {
    return CodecParams::new(params.block_size, params.group_length).unwrap_or_else(|err| {
        eprintln!("Error: {err}"); exit(1);
    });
}

#[derive(Debug, PartialEq, Eq)]
pub enum Overwrite { Proceed, Ask, Refuse }

/// overwrite_policy
/// Decides how to treat an existing output file
/// Parameters: Output exists, Overwrite flag, Input is stdin
/// Returns: Proceed, ask on the terminal, or refuse without --force
pub fn overwrite_policy(exists: bool, overwrite: bool, stdin_input: bool) -> Overwrite {
    if !exists || overwrite { return Overwrite::Proceed; }
    // stdin carries the payload, an answer typed there would end up in it
    if stdin_input || !io::stdin().is_terminal() { return Overwrite::Refuse; }
    return Overwrite::Ask;
}

/// check_overwrite
/// Checks if the output file exists and asks for overwrite
/// Parameters: Output file, Overwrite flag, Input is stdin
pub fn check_overwrite(writefile: &str, overwrite: bool, stdin_input: bool) {
    match overwrite_policy(Path::new(writefile).exists(), overwrite, stdin_input) {
        Overwrite::Proceed => {}
        Overwrite::Ask => {
            eprintln!("Output file already exists, overwrite? (Y/N)");
            loop {
                eprint!("> ");
                let mut input = String::new();
                if io::stdin().read_line(&mut input).unwrap_or(0) == 0 { eprintln!("Aborted."); exit(0); }
                if input.trim().to_lowercase() == "y" { break; }
                else if input.trim().to_lowercase() == "n" { eprintln!("Aborted."); exit(0); }
            }
        }
        Overwrite::Refuse => { eprintln!("Output file already exists, please provide --force(-y) flag to overwrite."); exit(0); }
    }
}

/// open_input
/// Opens the source of an action, stdin for a pipe
/// Parameters: Input path
/// Returns: Source reader
pub fn open_input(rfile: &str) -> Box<dyn Read> {
    if PIPEIN.contains(&rfile) { return Box::new(io::stdin().lock()); }
    if !Path::new(rfile).exists() { eprintln!("Input file does not exist"); exit(1); }
    return Box::new(File::open(rfile).unwrap_or_else(|err| { eprintln!("Cannot open {rfile}: {err}"); exit(1); }));
}

/// open_io
/// Opens the source and sink of an action, pipes included
/// Parameters: Input path, Output path, Overwrite flag
/// Returns: Source reader, Sink writer
pub fn open_io(rfile: &str, wfile: &str, overwrite: bool) -> (Box<dyn Read>, Box<dyn Write>) {
    let readfile = open_input(rfile);

    if PIPEOUT.contains(&wfile) { return (readfile, Box::new(io::stdout().lock())); }
    if let Ok(true) = is_same_file(rfile, wfile) {
        eprintln!("Input and output files cannot be the same"); exit(1);
    }
    check_overwrite(wfile, overwrite, PIPEIN.contains(&rfile));

    let writefile = File::create(wfile).unwrap_or_else(|err| { eprintln!("Cannot create {wfile}: {err}"); exit(1); });
    return (readfile, Box::new(BufWriter::new(writefile)));
}

/// finish
/// Ends an action, a closed pipe on the sink counts as a quiet exit
/// Parameters: Result of the action
pub fn finish(result: hamfec::Result<()>) {
    match result {
        Ok(()) => {}
        Err(err) if err.is_broken_pipe() => exit(0),
        Err(err) => { eprintln!("Error: {err}"); exit(1); }
    }
}

/// summary_level
/// Any damage seen, fixed or not, is worth a warning
/// Parameters: Corrected words, Unrecoverable words
/// Returns: Log level of the summary
pub fn summary_level(fixed: u64, unfixed: u64) -> log::Level {
    return if fixed > 0 || unfixed > 0 { log::Level::Warn } else { log::Level::Info };
}

/// report
/// Logs the correction counters of a decode, repair or verify run
/// Parameters: Corrected words, Unrecoverable words
pub fn report(fixed: u64, unfixed: u64) {
    log::log!(summary_level(fixed, unfixed), "{fixed} word(s) corrected, {unfixed} word(s) unrecoverable");
}
