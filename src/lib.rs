//! # hwinspect: Firmware Table Decoding and SMBIOS Validation
//!
//! Parses two firmware-provided views of a machine's memory configuration
//! and validates them against platform expectations:
//!
//! - **BDAT**: the ACPI BIOS Data Table, a binary blob carrying per-DIMM
//!   SPD data behind a schema directory. The parser walks the table,
//!   locates the SPD schema by GUID, and decodes each DDR4 SPD entry into
//!   a module size.
//! - **DMI**: a dmidecode-style text dump of the SMBIOS tables. The parser
//!   reconstructs records from indentation, and a declarative rule engine
//!   plus group-topology checkers validate the records.
//!
//! ## Pipeline
//!
//! Parsing never fails on malformed content: structural surprises are
//! accumulated as issues (BDAT) or reported per handle into an
//! [`bucket::ErrorBucket`] (DMI) so one run surfaces every finding. Only
//! unusable input (empty file, I/O failure) is an error.
//!
//! ## Usage
//!
//! ```no_run
//! use hwinspect::{bdat, bucket::ErrorBucket, dmi, group, rules};
//!
//! let parse = bdat::parse_bdat_file("bdat.bin")?;
//! for dimm in &parse.dimms {
//!     println!("socket {} dimm {}: {} MB", dimm.socket, dimm.dimm, dimm.size_mb);
//! }
//!
//! let dump = dmi::parse_dmi_file("dmi.txt")?;
//! let mut bucket = ErrorBucket::new();
//! rules::evaluate(&rules::default_rules(), &dump, &mut bucket);
//! group::check_board_presence(&dump, &mut bucket);
//! group::MemoryHierarchyChecker::new(&dump).validate(&mut bucket);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod bdat;
pub mod bucket;
pub mod checker;
pub mod dmi;
pub mod group;
pub mod matcher;
pub mod rules;
pub mod spd;

pub use bdat::{parse_bdat, parse_bdat_file, BdatError, BdatParse, Issue, SpdRecord};
pub use bucket::ErrorBucket;
pub use checker::Checker;
pub use dmi::{parse_dmi, parse_dmi_file, DmiParse, Property, Record};
pub use group::{check_board_presence, MemoryHierarchyChecker};
pub use matcher::Matcher;
pub use rules::{default_rules, evaluate, populated_dimm_rules, Rule};
pub use spd::{decode_spd, SpdType};
