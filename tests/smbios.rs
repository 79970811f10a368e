//! End-to-end SMBIOS validation: parse a dmidecode-style dump, run the rule
//! tables and the group checks, and inspect the accumulated findings.

use hwinspect::bucket::ErrorBucket;
use hwinspect::dmi::parse_dmi;
use hwinspect::group::{check_board_presence, MemoryHierarchyChecker};
use hwinspect::rules::{default_rules, evaluate, populated_dimm_rules};

const CLEAN_DUMP: &str = "Handle 0x0002, DMI type 2, 15 bytes\n\
Base Board Information\n\
\tManufacturer: Acme\n\
\tProduct Name: Magnesium\n\
\tFeatures:\n\
\t\tBoard is a hosting board\n\
\t\tBoard is replaceable\n\
\tLocation In Chassis: sys/board0\n\
\tChassis Handle: 0x0003\n\
\tType: Motherboard\n\
\tContained Object Handles: 2\n\
\t\t0x009A\n\
\t\t0x009B\n\
\n\
Handle 0x0003, DMI type 3, 22 bytes\n\
Chassis Information\n\
\tManufacturer: Acme\n\
\tType: Rack Mount Chassis\n\
\tLock: Not Present\n\
\tOEM Information: 0x00000067\n\
\tContained Elements: 1\n\
\n\
Handle 0x0010, DMI type 16, 23 bytes\n\
Physical Memory Array\n\
\tLocation: System Board Or Motherboard\n\
\tUse: System Memory\n\
\tError Correction Type: Multi-bit ECC\n\
\tMaximum Capacity: 2 TB\n\
\tNumber Of Devices: 8\n\
\n\
Handle 0x0020, DMI type 17, 40 bytes\n\
Memory Device\n\
\tArray Handle: 0x0010\n\
\tError Information Handle: Not Provided\n\
\tTotal Width: 72 bits\n\
\tData Width: 64 bits\n\
\tSize: 16 GB\n\
\tForm Factor: DIMM\n\
\tSet: None\n\
\tLocator: DIMM0\n\
\tBank Locator: Node0 Channel0\n\
\tType: DDR4\n\
\tType Detail: Synchronous Registered (Buffered)\n\
\tSpeed: 2400 MT/s\n\
\tManufacturer: Acme Memory\n\
\tSerial Number: 04B22333\n\
\tAsset Tag: A1\n\
\tPart Number: ACME16G2400\n\
\tRank: 2\n\
\tConfigured Memory Speed: 2400 MT/s\n\
\tMinimum Voltage: 1.2 V\n\
\tMaximum Voltage: 1.2 V\n\
\tConfigured Voltage: 1.2 V\n\
\n\
Handle 0x0125, DMI type 14, 20 bytes\n\
Group Associations\n\
\tName: die0\n\
\tItems: 1\n\
\t\t0x0126 (Group Associations)\n\
\n\
Handle 0x0126, DMI type 14, 20 bytes\n\
Group Associations\n\
\tName: IMC0\n\
\tItems: 1\n\
\t\t0x0127 (Group Associations)\n\
\n\
Handle 0x0127, DMI type 14, 20 bytes\n\
Group Associations\n\
\tName: ch0\n\
\tItems: 1\n\
\t\t0x0020 (Memory Device)\n\
\n";

fn validate(dump: &str) -> ErrorBucket {
    let parse = parse_dmi(dump);
    let mut bucket = ErrorBucket::new();
    evaluate(&default_rules(), &parse, &mut bucket);
    evaluate(&populated_dimm_rules(), &parse, &mut bucket);
    check_board_presence(&parse, &mut bucket);
    MemoryHierarchyChecker::new(&parse).validate(&mut bucket);
    bucket
}

#[test]
fn clean_dump_yields_no_findings() {
    let bucket = validate(CLEAN_DUMP);
    assert!(bucket.is_empty(), "unexpected findings: {:?}", bucket);
}

#[test]
fn bad_chassis_lock_is_the_only_finding() {
    let dump = CLEAN_DUMP.replace("Lock: Not Present", "Lock: Broken");
    let bucket = validate(&dump);
    assert_eq!(bucket.len(), 1);
    let errors = bucket.errors_for("0x0003");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, "FIELD ERROR: Lock");
    assert!(errors[0].1.contains("Not Present"), "action lists the valid values");
}

#[test]
fn dangling_array_handle_is_reported() {
    let dump = CLEAN_DUMP.replace("Array Handle: 0x0010", "Array Handle: 0x0099");
    let bucket = validate(&dump);
    let errors = bucket.errors_for("0x0020");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, "FIELD ERROR: Array Handle");
}

#[test]
fn broken_memory_hierarchy_reports_both_sides() {
    let dump = CLEAN_DUMP.replace("\t\t0x0126 (Group Associations)\n", "\t\t0x0000 (Other)\n");
    let bucket = validate(&dump);

    let die_errors = bucket.errors_for("0x0125");
    assert!(die_errors
        .iter()
        .any(|(e, _)| e == "Die record lists no memory controller handle."));
    let controller_errors = bucket.errors_for("0x0126");
    assert!(controller_errors
        .iter()
        .any(|(e, _)| e == "Memory controller record is not listed in any die record."));
}

#[test]
fn non_motherboard_type_misses_the_board_record() {
    let dump = CLEAN_DUMP.replace("Type: Motherboard", "Type: Riser Card");
    let bucket = validate(&dump);
    let errors = bucket.errors_for("N/A");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, "Motherboard SMBIOS record is missing.");
}

#[test]
fn short_handle_reference_still_resolves() {
    // Handle widths vary across dmidecode builds; "0x3" must find "0x0003".
    let dump = CLEAN_DUMP.replace("Chassis Handle: 0x0003", "Chassis Handle: 0x3");
    let bucket = validate(&dump);
    assert!(bucket.errors_for("0x0002").is_empty(), "findings: {:?}", bucket);
}

#[test]
fn missing_speed_on_populated_dimm_is_reported() {
    let dump = CLEAN_DUMP.replace("\tSpeed: 2400 MT/s\n", "");
    let bucket = validate(&dump);
    let errors = bucket.errors_for("0x0020");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, "FIELD ERROR: Speed");
}
