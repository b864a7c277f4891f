//!                                CLI Parser                                !//
//!
//! Copyright 2024-2025 Ivan Volosyuk
//! Description: Simple CLI parser for the hamfec executable

use std::collections::VecDeque;

use hamfec::common::{DEFAULT_BLOCK_SIZE, DEFAULT_GROUP_LENGTH};

// CLI Options
pub const ENCODE_OPT: [&str; 2] = ["encode", "enc"];
pub const DECODE_OPT: [&str; 3] = ["decode", "dec", "-d"];
pub const REPAIR_OPT: [&str; 3] = ["repair", "fix", "scrub"];
pub const VERIFY_OPT: [&str; 2] = ["verify", "check"];
pub const HELP_OPT: [&str; 3] = ["help", "-h", "--help"];

// CLI Parameters
pub struct CliParams {
    pub output: String,
    pub block_size: usize,
    pub group_length: usize,
    pub overwrite: bool,
    pub loglevel: u8,
}

impl CliParams {
    pub fn new() -> CliParams {
        CliParams {
            output: String::from("-"),
            block_size: DEFAULT_BLOCK_SIZE,
            group_length: DEFAULT_GROUP_LENGTH,
            overwrite: false,
            loglevel: 0,
        }
    }
    pub fn set_output(&mut self, output: String) { self.output = output; }
    pub fn set_block_size(&mut self, value: String) -> Result<(), String> { self.block_size = parse_size(&value)?; Ok(()) }
    pub fn set_group_length(&mut self, value: String) -> Result<(), String> {
        self.group_length = value.parse().map_err(|_| format!("Invalid group length: {value}"))?;
        Ok(())
    }
    pub fn set_overwrite(&mut self) { self.overwrite = true; }
    pub fn set_loglevel(&mut self, level: usize) { self.loglevel = self.loglevel.saturating_add(level.min(u8::MAX as usize) as u8); }
}

/// parse_size
/// Parses a byte count with an optional binary k/m suffix
/// Parameters: Size string, e.g. 4096, 64k, 1m
/// Returns: Size in bytes
pub fn parse_size(value: &str) -> Result<usize, String> {
    let lower = value.trim().to_lowercase();
    let (digits, scale) = match lower.strip_suffix('k') {
        Some(d) => (d, 1024),
        None => match lower.strip_suffix('m') {
            Some(d) => (d, 1024 * 1024),
            None => (lower.as_str(), 1),
        },
    };
    return digits.parse::<usize>().ok()
        .and_then(|n| n.checked_mul(scale))
        .ok_or_else(|| format!("Invalid size: {value}"));
}

fn is_action(arg: &str) -> bool {
    return [&ENCODE_OPT[..], &DECODE_OPT[..], &REPAIR_OPT[..], &VERIFY_OPT[..], &HELP_OPT[..]]
        .iter().any(|opts| opts.contains(&arg));
}

fn next_value(args: &mut VecDeque<String>, key: &str) -> Result<String, String> {
    return args.pop_front().ok_or_else(|| format!("Option --{key} requires a value"));
}

/// parse
/// Parse CLI arguments and return the action, input file, and parameters
/// Parameters: arguments, executable name first
/// Returns: Action, Input file name / Pipe, any other parameters
pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<(String, String, CliParams), String> {
    let mut args: VecDeque<String> = args.into_iter().collect();
    let mut params: CliParams = CliParams::new();
    args.pop_front();

    // Without an action the tool encodes, options and input may follow directly
    let action = match args.pop_front() {
        Some(action) if is_action(&action) || !action.starts_with('-') => action,
        Some(option) => { args.push_front(option); String::from(ENCODE_OPT[0]) }
        None => String::from(ENCODE_OPT[0]),
    };
    let mut input = String::new();

    while let Some(key) = args.pop_front() {
        if key == "-" || !key.starts_with('-') {
            if !input.is_empty() { return Err(format!("Unexpected argument: {key}")); }
            input = key;
            continue;
        }
        let key = key.trim_start_matches('-');

        if ["output", "out", "o"].contains(&key) {
            params.set_output(next_value(&mut args, key)?);
        }
        else if ["block-size", "bsize", "bs", "b"].contains(&key) {
            params.set_block_size(next_value(&mut args, key)?)?;
        }
        else if ["group-length", "glen", "gl", "g"].contains(&key) {
            params.set_group_length(next_value(&mut args, key)?)?;
        }
        else if ["force", "y", "f"].contains(&key) {
            params.set_overwrite();
        }
        else if key == "verbose" {
            params.set_loglevel(1);
        }
        else if !key.is_empty() && key.chars().all(|c| c == 'v') {
            params.set_loglevel(key.len());
        }
        else { return Err(format!("Unknown option: --{key}")); }
    }

    if input.is_empty() && !HELP_OPT.contains(&action.as_str()) { input = String::from("-"); }
    return Ok((action, input, params));
}
