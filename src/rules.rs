//! Rule engine and the declarative per-type rule tables.
//!
//! A [`Rule`] binds a [`Matcher`], an ordered list of [`Checker`]s, and the
//! human-readable error/action messages. A record passes a rule iff every
//! checker returns true; a rule whose matcher rejects the record is vacuously
//! passing. [`evaluate`] runs every applicable rule against every record and
//! accumulates each failure into the caller's [`ErrorBucket`]; it never
//! short-circuits, so one run reports every violation at once.
//!
//! The tables in [`default_rules`] follow the simplified per-type form: one
//! type matcher, a field-presence checker, and optionally one extra checker
//! per rule. [`populated_dimm_rules`] holds the extra Memory Device rules
//! that only make sense for slots with a module installed; callers apply
//! them conditionally.

use crate::bucket::ErrorBucket;
use crate::checker::Checker;
use crate::dmi::DmiParse;
use crate::matcher::Matcher;

/// SMBIOS structure type ids used by the rule tables and group validators.
pub mod structure_type {
    pub const BIOS_INFORMATION: u8 = 0;
    pub const SYSTEM_INFORMATION: u8 = 1;
    pub const BOARD_INFORMATION: u8 = 2;
    pub const CHASSIS_INFORMATION: u8 = 3;
    pub const PROCESSOR_INFORMATION: u8 = 4;
    pub const CACHE_INFORMATION: u8 = 7;
    pub const PORT_CONNECTOR_INFORMATION: u8 = 8;
    pub const SYSTEM_SLOTS: u8 = 9;
    pub const GROUP_ASSOCIATIONS: u8 = 14;
    pub const PHYSICAL_MEMORY_ARRAY: u8 = 16;
    pub const MEMORY_DEVICE: u8 = 17;
    pub const MEMORY_ARRAY_MAPPED_ADDRESS: u8 = 19;
    pub const MEMORY_DEVICE_MAPPED_ADDRESS: u8 = 20;
    pub const SYSTEM_BOOT_INFORMATION: u8 = 32;
    pub const IPMI_DEVICE_INFORMATION: u8 = 38;
    pub const SYSTEM_POWER_SUPPLY: u8 = 39;
    pub const ONBOARD_DEVICES_EXTENDED_INFORMATION: u8 = 41;
    pub const OEM_BRIDGE_DEVICE: u8 = 160;
    pub const OEM_LINK_DEVICE: u8 = 161;
    pub const OEM_CPU_LINK: u8 = 162;
}

use structure_type::*;

// Patterns shared by several rules. All are applied as case-insensitive
// full matches by the checker.
const NUMBER_REGEXP: &str = r"\d+";
const NUMBER_WITH_UNKNOWN_REGEXP: &str = r"\d+|unknown";
const HEX_REGEXP: &str = r"0x[0-9A-Fa-f]+";
const SPEED_REGEXP: &str = r"(Unknown)|(\d+ [KMG]T/s)";
const SIZE_REGEXP: &str = r"(Unknown)|(No Module Installed)|(\d+ ([kmgtKMGT]B|bits))";
const VERSION_REGEXP: &str = r"[\d.]+";
const DATE_REGEXP: &str = r"\d{2}/\d{2}/\d{4}";
const DEVPATH_REGEXP: &str = r"[\w/]*";
const SOCKET_DESIGNATION_REGEXP: &str = r"(CPU|P)\d+";
const PROCESSOR_STATUS_REGEXP: &str = r"(Unpopulated)|(Populated,\s(Unknown|Enabled|Disabled By User|Disabled By BIOS|Idle<OUT OF SPEC>|Other))";

const CHASSIS_TYPES: &[&str] = &["Main Server Chassis", "Rack Mount Chassis"];
const CHASSIS_LOCK: &[&str] = &["Present", "Not Present"];
const PROCESSOR_TYPES: &[&str] = &["Central Processor"];
const SLOT_CURRENT_USAGE: &[&str] = &["In Use", "Available", "Unknown"];
const SLOT_LENGTH: &[&str] = &["Short", "Long"];
const MEMORY_ARRAY_LOCATION: &[&str] = &["System Board Or Motherboard"];
const MEMORY_ARRAY_USE: &[&str] = &["System Memory"];
const MEMORY_DEVICE_FORM_FACTOR: &[&str] = &["Unknown", "DIMM"];
const MEMORY_DEVICE_TYPES: &[&str] = &["Unknown", "DDR4", "LPDDR4", "DDR5"];
const IPMI_INTERFACE_TYPES: &[&str] =
    &[r"BT \(Block Transfer\)", r"KCS \(Keyboard Control Style\)"];

/// An immutable rule: matcher, checkers, and the messages reported when any
/// checker fails.
#[derive(Debug, Clone)]
pub struct Rule {
    pub matcher: Matcher,
    pub checkers: Vec<Checker>,
    pub err_msg: String,
    pub action_msg: String,
}

impl Rule {
    pub fn new(matcher: Matcher, checkers: Vec<Checker>, err_msg: &str, action_msg: &str) -> Self {
        Rule {
            matcher,
            checkers,
            err_msg: err_msg.to_string(),
            action_msg: action_msg.to_string(),
        }
    }
}

/// The common table shape: match one type, require the field to be present,
/// then optionally apply one more checker to it.
fn field_rule(type_id: u8, field: &str, extra: Option<Checker>, action_msg: &str) -> Rule {
    let mut checkers = vec![Checker::present(field)];
    checkers.extend(extra);
    Rule::new(
        Matcher::record_type(type_id),
        checkers,
        &format!("FIELD ERROR: {field}"),
        action_msg,
    )
}

/// Evaluate `rules` against every record; each failing rule adds its
/// `(error, action)` pair to the bucket under the record's handle.
pub fn evaluate(rules: &[Rule], parse: &DmiParse, bucket: &mut ErrorBucket) {
    for record in parse.records.values() {
        for rule in rules {
            if !rule.matcher.matches(record) {
                continue;
            }
            if rule.checkers.iter().all(|c| c.validate(record, &parse.records)) {
                continue;
            }
            bucket.add_error(&record.handle_id, &rule.err_msg, &rule.action_msg);
        }
    }
}

/// The default rule tables, in type order. Types 1, 8, 32, 39, and 41 have
/// presence handled by the group validators and currently carry no field
/// rules.
pub fn default_rules() -> Vec<Rule> {
    let mut rules = Vec::new();

    // Type 0: BIOS Information
    rules.push(field_rule(
        BIOS_INFORMATION,
        "Vendor",
        None,
        "ACTION: Please populate Vendor field with the firmware vendor name.",
    ));
    rules.push(field_rule(
        BIOS_INFORMATION,
        "Version",
        None,
        "ACTION: BIOS Version can be any string as long as it follows a documented procedure.\nIf none is available please follow the XX.YY.RR format.",
    ));
    rules.push(field_rule(
        BIOS_INFORMATION,
        "Release Date",
        Some(Checker::value_regexp("Release Date", DATE_REGEXP)),
        "ACTION: Please populate BIOS Release Date field with correct date (format is MM/DD/YYYY).",
    ));
    rules.push(field_rule(
        BIOS_INFORMATION,
        "ROM Size",
        Some(Checker::value_regexp("ROM Size", r"\d+ [kmgKMG]B")),
        "ACTION: Please populate BIOS ROM Size field with valid size.\n*BIOS ROM Size indicates the BIOS size not the flash part size.*",
    ));

    // Type 2: Board Information
    rules.push(field_rule(
        BOARD_INFORMATION,
        "Manufacturer",
        None,
        "ACTION: Please populate Manufacturer field with valid string.",
    ));
    rules.push(field_rule(
        BOARD_INFORMATION,
        "Product Name",
        None,
        "ACTION: Please populate Product field with valid string.",
    ));
    rules.push(field_rule(
        BOARD_INFORMATION,
        "Features",
        None,
        "ACTION: Please populate Features field with valid feature flags.\nBit0 - 1 for Motherboard, 0 for daughter boards; Bit3 - 1 for replaceable board.",
    ));
    rules.push(field_rule(
        BOARD_INFORMATION,
        "Location In Chassis",
        Some(Checker::value_regexp("Location In Chassis", DEVPATH_REGEXP)),
        "ACTION: Please populate Location In Chassis field with valid devpath.\nThis field provides the devpath for the daughter board.",
    ));
    rules.push(field_rule(
        BOARD_INFORMATION,
        "Chassis Handle",
        Some(Checker::handle_ref("Chassis Handle", CHASSIS_INFORMATION)),
        "ACTION: Please populate Chassis Handle field with valid handle.",
    ));
    rules.push(field_rule(
        BOARD_INFORMATION,
        "Contained Object Handles",
        Some(Checker::item_count("Contained Object Handles")),
        "ACTION: Please populate Contained Object Handles field with valid handles.",
    ));

    // Type 3: Chassis Information
    rules.push(field_rule(
        CHASSIS_INFORMATION,
        "Manufacturer",
        None,
        "ACTION: Please populate Manufacturer field with valid string.",
    ));
    rules.push(field_rule(
        CHASSIS_INFORMATION,
        "Type",
        Some(Checker::value_enum("Type", CHASSIS_TYPES)),
        &action_with_values("Please populate Type field with valid string.", CHASSIS_TYPES),
    ));
    rules.push(field_rule(
        CHASSIS_INFORMATION,
        "Lock",
        Some(Checker::value_enum("Lock", CHASSIS_LOCK)),
        &action_with_values("Please populate Lock field with valid string.", CHASSIS_LOCK),
    ));
    rules.push(field_rule(
        CHASSIS_INFORMATION,
        "OEM Information",
        Some(Checker::value_regexp("OEM Information", HEX_REGEXP)),
        "ACTION: Please populate OEM Information field with valid hex value.",
    ));
    rules.push(field_rule(
        CHASSIS_INFORMATION,
        "Contained Elements",
        Some(Checker::value_regexp("Contained Elements", NUMBER_REGEXP)),
        "ACTION: Please populate Contained Elements field with valid number.",
    ));

    // Type 4: Processor Information
    rules.push(field_rule(
        PROCESSOR_INFORMATION,
        "Socket Designation",
        Some(Checker::value_regexp("Socket Designation", SOCKET_DESIGNATION_REGEXP)),
        "ACTION: Please populate Socket Designation field with valid string.\nProcessor silkscreen tag usually looks like CPU0, CPU1, etc.",
    ));
    rules.push(field_rule(
        PROCESSOR_INFORMATION,
        "Type",
        Some(Checker::value_enum("Type", PROCESSOR_TYPES)),
        &action_with_values("Please populate Type field with valid string.", PROCESSOR_TYPES),
    ));
    rules.push(field_rule(
        PROCESSOR_INFORMATION,
        "Status",
        Some(Checker::value_regexp("Status", PROCESSOR_STATUS_REGEXP)),
        "ACTION: Please populate Status field with valid string.",
    ));
    for cache in ["L1 Cache Handle", "L2 Cache Handle", "L3 Cache Handle"] {
        rules.push(field_rule(
            PROCESSOR_INFORMATION,
            cache,
            Some(Checker::handle_ref(cache, CACHE_INFORMATION)),
            &format!("ACTION: Please populate {cache} field with valid handle."),
        ));
    }
    for count in ["Core Count", "Core Enabled", "Thread Count"] {
        rules.push(field_rule(
            PROCESSOR_INFORMATION,
            count,
            Some(Checker::value_regexp(count, NUMBER_REGEXP)),
            &format!("ACTION: Please populate {count} field with valid number."),
        ));
    }

    // Type 9: System Slots
    rules.push(field_rule(
        SYSTEM_SLOTS,
        "Designation",
        None,
        "ACTION: Please populate Designation field with valid Slot silkscreen.\ne.g. PE0, PE4, etc.",
    ));
    rules.push(field_rule(
        SYSTEM_SLOTS,
        "Type",
        None,
        "ACTION: Please populate Slot Type field with valid string.\ne.g. Proprietary, x8 PCI Express 3 x8, etc.",
    ));
    rules.push(field_rule(
        SYSTEM_SLOTS,
        "Current Usage",
        Some(Checker::value_enum("Current Usage", SLOT_CURRENT_USAGE)),
        &action_with_values("Please populate Current Usage field with valid string.", SLOT_CURRENT_USAGE),
    ));
    rules.push(field_rule(
        SYSTEM_SLOTS,
        "Length",
        Some(Checker::value_enum("Length", SLOT_LENGTH)),
        &action_with_values("Please populate Slot Length field with valid string.", SLOT_LENGTH),
    ));
    rules.push(field_rule(
        SYSTEM_SLOTS,
        "Characteristics",
        None,
        "ACTION: Please populate Characteristics field with valid string.\ne.g. 3.3 V is provided, UNKNOWN, etc.",
    ));
    rules.push(field_rule(
        SYSTEM_SLOTS,
        "Bus Address",
        Some(Checker::value_regexp(
            "Bus Address",
            r"[0-9a-f]{4}:[0-9a-f]{2}:[0-9a-f]{2}\.[0-9a-f]",
        )),
        "ACTION: Please populate Bus Address field with valid string.\ne.g. 0000:c0:02.0.",
    ));

    // Type 14: Group Associations
    rules.push(field_rule(
        GROUP_ASSOCIATIONS,
        "Name",
        None,
        "ACTION: Please populate Name field with valid string.\ne.g. die0, IMC0, Connector, etc.",
    ));
    rules.push(field_rule(
        GROUP_ASSOCIATIONS,
        "Items",
        Some(Checker::item_count_bounded("Items", |x| x >= 1)),
        "ACTION: Please populate Items field with valid item count and strings.\nAt least one item must be listed in the record.",
    ));
    rules.push(field_rule(
        GROUP_ASSOCIATIONS,
        "Items",
        Some(Checker::item_uniqueness("Items")),
        "ACTION: Please make sure all handles are unique in items of group associations records.",
    ));

    // Type 16: Physical Memory Array
    rules.push(field_rule(
        PHYSICAL_MEMORY_ARRAY,
        "Location",
        Some(Checker::value_enum("Location", MEMORY_ARRAY_LOCATION)),
        "ACTION: Please populate Location field with valid string.\nUsually 0x03 for System Board/Motherboard.",
    ));
    rules.push(field_rule(
        PHYSICAL_MEMORY_ARRAY,
        "Use",
        Some(Checker::value_enum("Use", MEMORY_ARRAY_USE)),
        "ACTION: Please populate Use field with valid string.\nFunction for which this array is used. Usually 0x03 for System Memory.",
    ));
    rules.push(field_rule(
        PHYSICAL_MEMORY_ARRAY,
        "Error Correction Type",
        None,
        "ACTION: Please populate Error Correction Type field with valid string.\ne.g. Multi-bit ECC.",
    ));
    rules.push(field_rule(
        PHYSICAL_MEMORY_ARRAY,
        "Maximum Capacity",
        Some(Checker::value_regexp("Maximum Capacity", SIZE_REGEXP)),
        "ACTION: Please populate Maximum Capacity field with valid capacity.",
    ));
    rules.push(field_rule(
        PHYSICAL_MEMORY_ARRAY,
        "Number Of Devices",
        Some(Checker::value_regexp("Number Of Devices", NUMBER_REGEXP)),
        "ACTION: Please populate Number of Devices field with valid number.",
    ));

    // Type 17: Memory Device
    rules.push(field_rule(
        MEMORY_DEVICE,
        "Array Handle",
        Some(Checker::handle_ref("Array Handle", PHYSICAL_MEMORY_ARRAY)),
        "ACTION: Please populate Array Handle field with valid handle.\nThis field should be the handle associated with the Physical Memory Array to which this device belongs.",
    ));
    rules.push(field_rule(
        MEMORY_DEVICE,
        "Error Information Handle",
        Some(Checker::value_regexp(
            "Error Information Handle",
            r"(Not provided)|(No Error)|(0x[0-9a-f]{4})",
        )),
        "ACTION: Please populate Error Information Handle field with valid value.",
    ));
    rules.push(field_rule(
        MEMORY_DEVICE,
        "Total Width",
        Some(Checker::value_regexp("Total Width", r"(Unknown)|\d+ bits")),
        "ACTION: Please populate Total Width field with valid number of bits (or Unknown).",
    ));
    rules.push(field_rule(
        MEMORY_DEVICE,
        "Data Width",
        Some(Checker::value_regexp("Data Width", r"(Unknown)|\d+ bits")),
        "ACTION: Please populate Data Width field with valid number of bits (or Unknown).",
    ));
    rules.push(field_rule(
        MEMORY_DEVICE,
        "Size",
        Some(Checker::value_regexp("Size", r"(Unknown)|(No Module Installed)|(\d+ (MB|GB|TB))")),
        "ACTION: Please populate Size field with valid capacity (or No Module Installed).",
    ));
    rules.push(field_rule(
        MEMORY_DEVICE,
        "Form Factor",
        Some(Checker::value_enum("Form Factor", MEMORY_DEVICE_FORM_FACTOR)),
        &action_with_values("Please populate Form Factor field with valid string.", MEMORY_DEVICE_FORM_FACTOR),
    ));
    rules.push(field_rule(
        MEMORY_DEVICE,
        "Set",
        Some(Checker::value_regexp("Set", r"Unknown|None|\w+")),
        "ACTION: Please populate Set field with valid string (or Unknown/None).",
    ));
    rules.push(field_rule(
        MEMORY_DEVICE,
        "Locator",
        Some(Checker::value_regexp("Locator", r"(?:[^\d]*)\d+")),
        "ACTION: Please populate Locator field with valid string.\nThis field is silk screen for the DIMM location. e.g. DIMM0",
    ));
    rules.push(field_rule(
        MEMORY_DEVICE,
        "Bank Locator",
        Some(Checker::value_regexp("Bank Locator", r".*(Node|Channel).*")),
        "ACTION: Please populate Bank Locator field with valid string.\nThis is the string that identifies the physically labeled bank where the memory device is located.",
    ));
    rules.push(field_rule(
        MEMORY_DEVICE,
        "Type",
        Some(Checker::value_enum("Type", MEMORY_DEVICE_TYPES)),
        &action_with_values("Please populate Memory Type field with valid string.", MEMORY_DEVICE_TYPES),
    ));
    rules.push(field_rule(
        MEMORY_DEVICE,
        "Type Detail",
        None,
        "ACTION: Please populate Type Detail field with valid string.",
    ));

    // Type 19: Memory Array Mapped Address
    rules.push(field_rule(
        MEMORY_ARRAY_MAPPED_ADDRESS,
        "Starting Address",
        None,
        "ACTION: Please populate Starting Address field with valid address.",
    ));
    rules.push(field_rule(
        MEMORY_ARRAY_MAPPED_ADDRESS,
        "Ending Address",
        None,
        "ACTION: Please populate Ending Address field with valid address.",
    ));
    rules.push(field_rule(
        MEMORY_ARRAY_MAPPED_ADDRESS,
        "Physical Array Handle",
        Some(Checker::handle_ref("Physical Array Handle", PHYSICAL_MEMORY_ARRAY)),
        "ACTION: Please populate Physical Array Handle field with valid handle.",
    ));
    rules.push(field_rule(
        MEMORY_ARRAY_MAPPED_ADDRESS,
        "Partition Width",
        Some(Checker::value_regexp("Partition Width", NUMBER_REGEXP)),
        "ACTION: Please populate Partition Width field with valid number.\nPartition Width is the number of Memory Devices that form a single row of memory for the address partition defined by this structure.",
    ));

    // Type 20: Memory Device Mapped Address
    rules.push(field_rule(
        MEMORY_DEVICE_MAPPED_ADDRESS,
        "Starting Address",
        None,
        "ACTION: Please populate Starting Address field with valid address.",
    ));
    rules.push(field_rule(
        MEMORY_DEVICE_MAPPED_ADDRESS,
        "Ending Address",
        None,
        "ACTION: Please populate Ending Address field with valid address.",
    ));
    rules.push(field_rule(
        MEMORY_DEVICE_MAPPED_ADDRESS,
        "Physical Device Handle",
        Some(Checker::handle_ref("Physical Device Handle", MEMORY_DEVICE)),
        "ACTION: Please populate Physical Device Handle field with valid handle.",
    ));
    rules.push(field_rule(
        MEMORY_DEVICE_MAPPED_ADDRESS,
        "Memory Array Mapped Address Handle",
        Some(Checker::handle_ref(
            "Memory Array Mapped Address Handle",
            MEMORY_ARRAY_MAPPED_ADDRESS,
        )),
        "ACTION: Please populate Memory Array Mapped Address Handle field with valid handle.",
    ));
    rules.push(field_rule(
        MEMORY_DEVICE_MAPPED_ADDRESS,
        "Partition Row Position",
        Some(Checker::value_regexp("Partition Row Position", NUMBER_WITH_UNKNOWN_REGEXP)),
        "ACTION: Please populate Partition Row Position field with valid number.\nThis is the position of the referenced Memory Device in a row of the address partition.",
    ));
    rules.push(field_rule(
        MEMORY_DEVICE_MAPPED_ADDRESS,
        "Interleave Position",
        Some(Checker::value_regexp("Interleave Position", NUMBER_WITH_UNKNOWN_REGEXP)),
        "ACTION: Please populate Interleave Position field with valid number.\nThe value 0 indicates non-interleaved, 1 the first interleave position, 2 the second and so on.",
    ));
    rules.push(field_rule(
        MEMORY_DEVICE_MAPPED_ADDRESS,
        "Interleaved Data Depth",
        Some(Checker::value_regexp("Interleaved Data Depth", NUMBER_WITH_UNKNOWN_REGEXP)),
        "ACTION: Please populate Interleaved Data Depth field with valid number.\nExample: if a device transfers two rows each time it is read, its interleaved data depth is 2.",
    ));

    // Type 38: IPMI Device Information
    rules.push(field_rule(
        IPMI_DEVICE_INFORMATION,
        "Interface Type",
        Some(Checker::value_enum("Interface Type", IPMI_INTERFACE_TYPES)),
        &action_with_values("Please populate Interface Type field with valid string.", IPMI_INTERFACE_TYPES),
    ));
    rules.push(field_rule(
        IPMI_DEVICE_INFORMATION,
        "Specification Version",
        Some(Checker::value_regexp("Specification Version", VERSION_REGEXP)),
        "ACTION: Please populate Specification Version field with valid version.",
    ));
    rules.push(field_rule(
        IPMI_DEVICE_INFORMATION,
        "I2C Address",
        Some(Checker::value_regexp("I2C Address", HEX_REGEXP)),
        "ACTION: Please populate I2C Address field with valid address.",
    ));

    // Type 160: OEM Bridge Device
    rules.push(field_rule(
        OEM_BRIDGE_DEVICE,
        "Bridge Name",
        None,
        "ACTION: Please populate Bridge Name field with valid string.",
    ));
    rules.push(field_rule(
        OEM_BRIDGE_DEVICE,
        "Bridge Address",
        Some(Checker::value_regexp("Bridge Address", HEX_REGEXP)),
        "ACTION: Please populate Bridge Address field with valid address.",
    ));
    rules.push(field_rule(
        OEM_BRIDGE_DEVICE,
        "Number of links",
        Some(Checker::item_count("Number of links")),
        "ACTION: Please populate Number of links field with valid number and handles.",
    ));

    // Type 161: OEM Link Device. Each device spans two item lines
    // (address + handle), hence the multiplier.
    rules.push(field_rule(
        OEM_LINK_DEVICE,
        "Link Name",
        None,
        "ACTION: Please populate Link Name field with valid string.",
    ));
    rules.push(field_rule(
        OEM_LINK_DEVICE,
        "Number of device",
        Some(Checker::item_count_multiplied("Number of device", 2)),
        "ACTION: Please populate Number of device field with valid number and info.",
    ));

    // Type 162: OEM CPU Link
    rules.push(field_rule(
        OEM_CPU_LINK,
        "Identifier",
        None,
        "ACTION: Please populate Identifier field with valid string.",
    ));
    rules.push(field_rule(
        OEM_CPU_LINK,
        "Max speed",
        Some(Checker::value_regexp("Max speed", SPEED_REGEXP)),
        "ACTION: Please populate Max Speed field with valid speed.",
    ));
    rules.push(field_rule(
        OEM_CPU_LINK,
        "Current speed",
        Some(Checker::value_regexp("Current speed", SPEED_REGEXP)),
        "ACTION: Please populate Current Speed field with valid speed.",
    ));
    rules.push(field_rule(
        OEM_CPU_LINK,
        "Source CPU",
        Some(Checker::handle_ref("Source CPU", PROCESSOR_INFORMATION)),
        "ACTION: Please populate Source CPU field with valid handle.",
    ));
    rules.push(field_rule(
        OEM_CPU_LINK,
        "Destination CPU",
        Some(Checker::handle_ref("Destination CPU", PROCESSOR_INFORMATION)),
        "ACTION: Please populate Destination CPU field with valid handle.",
    ));

    rules
}

/// Extra Memory Device rules that only apply to slots with a module
/// installed (empty slots legitimately leave these fields unset).
pub fn populated_dimm_rules() -> Vec<Rule> {
    let mut rules = Vec::new();
    rules.push(field_rule(
        MEMORY_DEVICE,
        "Speed",
        Some(Checker::value_regexp("Speed", r"(Unknown)|\d+ MT/s")),
        "ACTION: Please populate Speed field with valid string.\ne.g. 2400 MT/s",
    ));
    for field in ["Manufacturer", "Serial Number", "Asset Tag", "Part Number", "Rank"] {
        rules.push(field_rule(
            MEMORY_DEVICE,
            field,
            None,
            &format!("ACTION: Please populate {field} field with valid string."),
        ));
    }
    rules.push(field_rule(
        MEMORY_DEVICE,
        "Configured Memory Speed",
        Some(Checker::value_regexp("Configured Memory Speed", r"(Unknown)|\d+ MT/s")),
        "ACTION: Please populate Configured Memory Speed field with valid speed.",
    ));
    for field in ["Minimum Voltage", "Maximum Voltage", "Configured Voltage"] {
        rules.push(field_rule(
            MEMORY_DEVICE,
            field,
            Some(Checker::value_regexp(field, r"(Unknown)|(\d.\d+ V)")),
            &format!("ACTION: Please populate {field} field with valid voltage."),
        ));
    }
    rules
}

fn action_with_values(action: &str, values: &[&str]) -> String {
    format!("ACTION: {}\nValid value(s): {}", action, values.join(", "))
}
