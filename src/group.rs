//! Cross-record validation of the memory topology described by Group
//! Associations records.
//!
//! The topology is a forest encoded in type 14 records, classified by the
//! `Name` property: `die<N>` groups list memory controller groups, `imc<N>`
//! (or `umc<N>`) groups list channel groups, `ch<N>` groups list the memory
//! devices on one channel. The checker validates the die/controller linkage
//! in two phases: first every die claims its controllers (detecting a
//! controller claimed by two dies), then every controller is checked for
//! being claimed and for listing only Group Associations items. Channel
//! records are classified but not cross-checked further; their contents are
//! covered by the per-record rule tables.

use crate::bucket::ErrorBucket;
use crate::dmi::{DmiParse, Record};
use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

static DIE_RE: LazyLock<Regex> = LazyLock::new(|| name_pattern(r"die\d+"));
static CONTROLLER_RE: LazyLock<Regex> = LazyLock::new(|| name_pattern(r"[iu]mc\d+"));
static CHANNEL_RE: LazyLock<Regex> = LazyLock::new(|| name_pattern(r"ch\d+"));

/// Matches one item line of a Group Associations record and captures the
/// referenced handle, e.g. `0x0126 (Group Associations)`.
static GROUP_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0x[0-9a-fA-F]+) \(Group Associations\)").expect("pattern is valid")
});

// Start-anchored only: group names may carry suffixes (e.g. "IMC0-B").
fn name_pattern(pattern: &str) -> Regex {
    RegexBuilder::new(&format!("^(?:{pattern})"))
        .case_insensitive(true)
        .build()
        .expect("pattern is valid")
}

/// Handle used for findings that cannot be pinned to a record, such as a
/// record that should exist but does not.
const NO_HANDLE: &str = "N/A";

/// Require a Base Board Information record identifying itself as the
/// motherboard.
pub fn check_board_presence(parse: &DmiParse, bucket: &mut ErrorBucket) {
    let found = parse
        .handles_of_type(crate::rules::structure_type::BOARD_INFORMATION)
        .iter()
        .filter_map(|h| parse.records.get(h))
        .any(|rec| rec.props.get("Type").is_some_and(|p| p.val == "Motherboard"));
    if !found {
        bucket.add_error(
            NO_HANDLE,
            "Motherboard SMBIOS record is missing.",
            "ACTION: Please add a Base Board Information record with Board Type 0xA (Motherboard).",
        );
    }
}

/// Die/controller/channel classification of the Group Associations records
/// of one dump, plus the linkage checks over it.
pub struct MemoryHierarchyChecker<'a> {
    dies: Vec<&'a Record>,
    controllers: Vec<&'a Record>,
    channels: Vec<&'a Record>,
}

impl<'a> MemoryHierarchyChecker<'a> {
    pub fn new(parse: &'a DmiParse) -> Self {
        let mut checker = MemoryHierarchyChecker {
            dies: Vec::new(),
            controllers: Vec::new(),
            channels: Vec::new(),
        };
        for handle in parse.handles_of_type(crate::rules::structure_type::GROUP_ASSOCIATIONS) {
            let Some(record) = parse.records.get(handle) else { continue };
            let Some(name) = record.props.get("Name") else { continue };
            if DIE_RE.is_match(&name.val) {
                checker.dies.push(record);
            } else if CONTROLLER_RE.is_match(&name.val) {
                checker.controllers.push(record);
            } else if CHANNEL_RE.is_match(&name.val) {
                checker.channels.push(record);
            }
        }
        checker
    }

    pub fn dies(&self) -> &[&'a Record] {
        &self.dies
    }

    pub fn controllers(&self) -> &[&'a Record] {
        &self.controllers
    }

    pub fn channels(&self) -> &[&'a Record] {
        &self.channels
    }

    /// Run the die/controller linkage checks, accumulating every finding.
    pub fn validate(&self, bucket: &mut ErrorBucket) {
        // Phase 1: each die claims its controllers. A die's claims merge into
        // the global map only after its items are walked, so a duplicate
        // handle within one die is not a cross-die conflict (the per-record
        // item-uniqueness rule covers that case).
        let mut claimed_by: IndexMap<&str, &'a Record> = IndexMap::new();
        for die in self.dies.iter().copied() {
            let mut listed_controllers = 0;
            let mut claims: Vec<&'a str> = Vec::new();
            for item in item_handles(die) {
                if !self.is_controller(&item) {
                    continue;
                }
                listed_controllers += 1;
                let handle = self.controller_handle(&item);
                if claims.contains(&handle) {
                    continue;
                }
                if let Some(first) = claimed_by.get(handle) {
                    bucket.add_error(
                        &die.handle_id,
                        &format!(
                            "Memory controller {item} is listed in both die record {} ({}) and die record {} ({}).",
                            first.handle_id,
                            record_name(first),
                            die.handle_id,
                            record_name(die)
                        ),
                        "ACTION: Please list each memory controller group under exactly one die record.",
                    );
                } else {
                    claims.push(handle);
                }
            }
            for handle in claims {
                claimed_by.insert(handle, die);
            }
            if listed_controllers == 0 {
                bucket.add_error(
                    &die.handle_id,
                    "Die record lists no memory controller handle.",
                    "ACTION: Please list the handle of each memory controller group in the die record's items.",
                );
            }
        }

        // Phase 2: each controller must be claimed and list only Group
        // Associations items.
        for controller in &self.controllers {
            if !claimed_by.contains_key(controller.handle_id.as_str()) {
                bucket.add_error(
                    &controller.handle_id,
                    "Memory controller record is not listed in any die record.",
                    "ACTION: Please list this memory controller's handle in the items of its die record.",
                );
            }
            if let Some(items) = controller.props.get("Items") {
                for item in &items.items {
                    if !GROUP_ITEM_RE.is_match(item) {
                        bucket.add_error(
                            &controller.handle_id,
                            &format!(
                                "Item {item} of the memory controller record is not a Group Associations record."
                            ),
                            "ACTION: Please list only memory channel group handles in a memory controller record.",
                        );
                    }
                }
            }
        }
    }

    fn is_controller(&self, handle: &str) -> bool {
        self.controllers.iter().any(|c| c.handle_id == handle)
    }

    /// Borrow the canonical handle string of a claimed controller so the
    /// visited map does not outlive the records it points into.
    fn controller_handle(&self, handle: &str) -> &'a str {
        self.controllers
            .iter()
            .find(|c| c.handle_id == handle)
            .map(|c| c.handle_id.as_str())
            .unwrap_or_default()
    }
}

fn record_name(record: &Record) -> &str {
    record.props.get("Name").map(|p| p.val.as_str()).unwrap_or("unnamed")
}

fn item_handles(record: &Record) -> Vec<String> {
    let Some(items) = record.props.get("Items") else { return Vec::new() };
    items
        .items
        .iter()
        .filter_map(|item| GROUP_ITEM_RE.captures(item))
        .map(|caps| caps[1].to_string())
        .collect()
}
