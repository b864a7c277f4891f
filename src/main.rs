mod tools; mod common;
mod encode; mod decode; mod repair;

use std::{env, process::exit};

use hamfec::CodecParams;

const BANNER: &str =
"                 hamfec - Hamming-indexed XOR error correction
";

const ENCODE_HELP: &str = "--------------------------------- Description ----------------------------------

Encode
This action will protect any byte stream with XOR code slots.
This action supports pipe input/output.

------------------------------------ Usage -------------------------------------

{hamfec} encode [path/to/input.file]
    [kwargs...]

----------------------------------- Options ------------------------------------

    --output       | Output file path, default: stdout (alias: o, out)
    --block-size   | Slot size in bytes, multiple of 8, k/m suffix accepted
                   | default: 1m (alias: b, bs, bsize)
    --group-length | Slots per group, power of two, at least 4
                   | default: 128 (alias: g, gl, glen)
    --force        | Overwrite the output file without asking (alias: y, f)
    -v             | Verbose, repeat for more (-vv, -vvv)";

const DECODE_HELP: &str = "--------------------------------- Description ----------------------------------

Decode
This action will correct an encoded stream and restore the original bytes.
Block size and group length must match the ones used to encode.
This action supports pipe input/output.

------------------------------------ Usage -------------------------------------

{hamfec} decode [path/to/input.ham]
    [kwargs...]

----------------------------------- Options ------------------------------------

    --output       | Output file path, default: stdout (alias: o, out)
    --block-size   | Slot size used to encode, default: 1m (alias: b, bs, bsize)
    --group-length | Group length used to encode, default: 128 (alias: g, gl, glen)
    --force        | Overwrite the output file without asking (alias: y, f)
    -v             | Verbose, repeat for more (-vv, -vvv)";

const REPAIR_HELP: &str = "--------------------------------- Description ----------------------------------

Repair
This action will rewrite an encoded stream with all correctable damage fixed
and code slots regenerated, keeping it protected for the next pass.

------------------------------------ Usage -------------------------------------

{hamfec} repair [path/to/input.ham]
    --output path/to/repaired.ham
    [kwargs...]

----------------------------------- Options ------------------------------------

    --output       | Output file path, default: stdout (alias: o, out)
    --block-size   | Slot size used to encode, default: 1m (alias: b, bs, bsize)
    --group-length | Group length used to encode, default: 128 (alias: g, gl, glen)
    --force        | Overwrite the output file without asking (alias: y, f)
    -v             | Verbose, repeat for more (-vv, -vvv)";

const VERIFY_HELP: &str = "--------------------------------- Description ----------------------------------

Verify
This action will check an encoded stream without writing anything.
Exits with status 1 if any damage is beyond correction.

------------------------------------ Usage -------------------------------------

{hamfec} verify [path/to/input.ham]
    [kwargs...]

----------------------------------- Options ------------------------------------

    --block-size   | Slot size used to encode, default: 1m (alias: b, bs, bsize)
    --group-length | Group length used to encode, default: 128 (alias: g, gl, glen)
    -v             | Verbose, repeat for more (-vv, -vvv)";

/// capacity
/// Describes how much damage the given geometry can take
/// Parameters: Codec parameters
/// Returns: Guidance text
fn capacity(codec: &CodecParams) -> String {
    let (run, span) = codec.correction_capacity();
    return format!("--------------------------------- Correction ------------------------------------

    block size {} bytes, group length {}, {} code slots per group
    Corrects up to {} consecutive corrupted bytes in every {} bytes of data,
    as long as each word offset of a group is damaged in one slot only.",
        codec.block_size(), codec.group_length(), codec.code_slot_count(), run, span);
}

fn main() {
    let executable = env::args().next().unwrap_or_else(|| String::from("hamfec"));
    let (action, input, params) = tools::cli::parse(env::args()).unwrap_or_else(|err| {
        eprintln!("Error: {err}"); exit(1);
    });
    tools::log::init(params.loglevel);

    if tools::cli::ENCODE_OPT.contains(&action.as_str()) {
        encode::encode(input, params);
    }
    else if tools::cli::DECODE_OPT.contains(&action.as_str()) {
        decode::decode(input, params);
    }
    else if tools::cli::REPAIR_OPT.contains(&action.as_str()) {
        repair::repair(input, params);
    }
    else if tools::cli::VERIFY_OPT.contains(&action.as_str()) {
        decode::verify(input, params);
    }
    else if tools::cli::HELP_OPT.contains(&action.as_str()) {
        println!("{}", BANNER);
        println!("{}",
                 if tools::cli::ENCODE_OPT.contains(&input.as_str()) { ENCODE_HELP }
            else if tools::cli::DECODE_OPT.contains(&input.as_str()) { DECODE_HELP }
            else if tools::cli::REPAIR_OPT.contains(&input.as_str()) { REPAIR_HELP }
            else if tools::cli::VERIFY_OPT.contains(&input.as_str()) { VERIFY_HELP }
            else { "------------------------------- Available actions ------------------------------

    encode | Add code slots to a byte stream          (alias: enc)
    decode | Correct and strip code slots             (alias: dec, -d)
    repair | Correct and rewrite with fresh codes     (alias: fix, scrub)
    verify | Check a stream for damage                (alias: check)

Without an action, {hamfec} encodes stdin to stdout.
Type `{hamfec} help [action]` to get help for specific action." }.replace("{hamfec}", executable.as_str())
        );
        println!();
        match CodecParams::new(params.block_size, params.group_length) {
            Ok(codec) => println!("{}", capacity(&codec)),
            Err(err) => eprintln!("Error: {err}"),
        }
    }
    else {
        eprintln!("hamfec - Hamming-indexed XOR error correction");
        eprintln!("Abstract syntax: {executable} [encode|decode|repair|verify] [input] [kwargs...]");
        eprintln!("type '{executable} help' to get help.");
    }
}
