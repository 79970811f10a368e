//! Validate a dmidecode text dump against the per-type rule tables and the
//! memory-topology group checks.
//!
//! Usage:
//!   smbios_check [OPTIONS] FILE.txt [FILE.txt ...]
//!
//! Options:
//!   --skip-groups, -G  Run only the per-record rule tables, not the
//!                      board-presence and die/controller linkage checks.
//!
//! Populated Memory Device slots (Size other than "No Module Installed")
//! are additionally held to the populated-DIMM rules. Exits with status 1
//! when any file yields findings or cannot be read.

use hwinspect::bucket::ErrorBucket;
use hwinspect::dmi::{self, DmiParse};
use hwinspect::group;
use hwinspect::rules;
use tracing_subscriber::EnvFilter;

/// The populated-DIMM rules only see the Memory Device records that have a
/// module installed.
fn populated_dimms(parse: &DmiParse) -> DmiParse {
    let mut out = DmiParse::default();
    for handle in parse.handles_of_type(rules::structure_type::MEMORY_DEVICE) {
        let Some(record) = parse.records.get(handle) else { continue };
        let installed = record
            .props
            .get("Size")
            .is_some_and(|p| p.val != "No Module Installed" && !p.val.is_empty());
        if installed {
            out.groups.entry(record.type_id).or_default().push(handle.clone());
            out.records.insert(handle.clone(), record.clone());
        }
    }
    out
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let skip_groups = if let Some(pos) = args.iter().position(|a| a == "--skip-groups" || a == "-G")
    {
        args.remove(pos);
        true
    } else {
        false
    };
    if args.is_empty() {
        eprintln!("usage: smbios_check [--skip-groups] FILE.txt [FILE.txt ...]");
        std::process::exit(1);
    }

    let default_rules = rules::default_rules();
    let dimm_rules = rules::populated_dimm_rules();
    let mut total_findings = 0usize;
    let mut has_error = false;

    for path in &args {
        let parse = match dmi::parse_dmi_file(path) {
            Ok(parse) => parse,
            Err(e) => {
                eprintln!("{path}: {e}");
                has_error = true;
                continue;
            }
        };

        let mut bucket = ErrorBucket::new();
        rules::evaluate(&default_rules, &parse, &mut bucket);
        rules::evaluate(&dimm_rules, &populated_dimms(&parse), &mut bucket);
        if !skip_groups {
            group::check_board_presence(&parse, &mut bucket);
            group::MemoryHierarchyChecker::new(&parse).validate(&mut bucket);
        }

        for (handle, errors) in bucket.iter() {
            for (err, action) in errors {
                println!("{path}: {handle}: {err}");
                for line in action.lines() {
                    println!("  {line}");
                }
            }
        }
        total_findings += bucket.len();
    }

    if total_findings > 0 {
        eprintln!("smbios_check: {total_findings} finding(s)");
    }
    if has_error || total_findings > 0 {
        std::process::exit(1);
    }
    Ok(())
}
