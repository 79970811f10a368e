//! Decode and validate a BDAT dump: locate the SPD schema, decode each DIMM's
//! SPD entry, and report structural or out-of-spec findings.
//!
//! Usage:
//!   bdat_check [OPTIONS] FILE.bin [FILE.bin ...]
//!
//! Options:
//!   --quiet, -q  Only report findings, skip the per-DIMM summary.
//!
//! Exits with status 1 when any file yields findings or cannot be read.

use hwinspect::bdat;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let quiet = if let Some(pos) = args.iter().position(|a| a == "--quiet" || a == "-q") {
        args.remove(pos);
        true
    } else {
        false
    };
    if args.is_empty() {
        eprintln!("usage: bdat_check [--quiet] FILE.bin [FILE.bin ...]");
        std::process::exit(1);
    }

    let mut total_issues = 0usize;
    let mut has_error = false;

    for path in &args {
        let parse = match bdat::parse_bdat_file(path) {
            Ok(parse) => parse,
            Err(e) => {
                eprintln!("{path}: {e}");
                has_error = true;
                continue;
            }
        };

        if !quiet {
            println!("{path}:");
            println!(
                "  table: signature {:?}, size {} bytes, crc 0x{:04X}, {} schema(s)",
                parse.metadata.signature,
                parse.metadata.data_size,
                parse.metadata.crc,
                parse.metadata.schema_list.len()
            );
            if !parse.schema.is_empty() {
                println!(
                    "  spd schema: {} bytes, crc 0x{:04X}",
                    parse.schema.data_size, parse.schema.crc
                );
            }
            for dimm in &parse.dimms {
                println!(
                    "  socket {} channel {} dimm {}: type {} ({} bytes of SPD), {} MB",
                    dimm.socket,
                    dimm.channel,
                    dimm.dimm,
                    dimm.spd_type,
                    dimm.no_of_bytes,
                    dimm.size_mb
                );
            }
        }

        for issue in &parse.issues {
            println!("{path}: {issue}");
        }
        total_issues += parse.issues.len();
    }

    if total_issues > 0 {
        eprintln!("bdat_check: {total_issues} finding(s)");
    }
    if has_error || total_issues > 0 {
        std::process::exit(1);
    }
    Ok(())
}
