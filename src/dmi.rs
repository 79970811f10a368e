//! Line-oriented parser for dmidecode-style SMBIOS/DMI text dumps.
//!
//! The input is a flat text stream; hierarchy is reconstructed from
//! indentation by a three-state machine:
//!
//! - **RecordName**: the human-readable type name right after a `Handle`
//!   line; consumed and discarded.
//! - **ReadKv**: a `name: value` property line. If the next line is indented
//!   strictly more, the property is provisionally a list and the pair is held
//!   pending; otherwise it is committed as a scalar.
//! - **ListProperty**: each line is appended as a sub-item of the pending
//!   property. The pending property commits and the state reverts to ReadKv
//!   when the current line's indentation exceeds the next line's AND the
//!   current indentation is at most 2 (the de-indent detection).
//!
//! The one-line lookahead is modeled as `lines.get(i + 1)`: end of input acts
//! as a zero-indent successor, so a final property line commits as a scalar
//! and a final list item de-indents, with no out-of-bounds access.
//!
//! A line starting with `Handle` opens a new record; a blank line commits the
//! open record into the `handle -> Record` map and its handle into the
//! `type -> [handles]` group list. An open record is also committed at end of
//! input. Empty input is a data-quality warning, not an error: downstream
//! validation tolerates an empty record set.

use indexmap::IndexMap;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::warn;

static HANDLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Handle (0x[0-9A-F]+), DMI type ([0-9]+).*").expect("pattern is valid")
});

/// One property of a record: either scalar (`val` set, `items` empty) or a
/// list (`items` populated, `val` often empty), never meaningfully both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Property {
    pub val: String,
    pub items: Vec<String>,
}

impl Property {
    pub fn new(val: impl Into<String>) -> Self {
        Property { val: val.into(), items: Vec::new() }
    }

    /// True when the property carries a scalar value or at least one item.
    pub fn is_populated(&self) -> bool {
        !self.val.is_empty() || !self.items.is_empty()
    }
}

/// One SMBIOS record. The handle is kept exactly as printed by the source
/// (e.g. `"0x0002"`); width normalization happens only inside the
/// handle-reference checker. Property insertion order is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub handle_id: String,
    pub type_id: u8,
    pub props: IndexMap<String, Property>,
}

/// All records of one dump: `handle -> Record` in input order, plus
/// `type -> [handles]` in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DmiParse {
    pub records: IndexMap<String, Record>,
    pub groups: IndexMap<u8, Vec<String>>,
}

impl DmiParse {
    /// Handles of all records with the given type id, empty if none.
    pub fn handles_of_type(&self, type_id: u8) -> &[String] {
        self.groups.get(&type_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

enum State {
    RecordName,
    ReadKv,
    ListProperty,
}

fn indent_level(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Parse a dmidecode-style text dump into structured records.
///
/// Pure function of its input; parsing the same text twice yields equal maps.
pub fn parse_dmi(text: &str) -> DmiParse {
    if text.is_empty() {
        warn!("DMI raw data is empty");
    }
    let lines: Vec<&str> = text.lines().collect();
    let mut out = DmiParse::default();
    let mut state = State::RecordName;
    let mut record: Option<Record> = None;
    let mut pending: Option<(String, Property)> = None;

    for (i, line) in lines.iter().enumerate() {
        if line.starts_with("Handle") {
            match HANDLE_RE.captures(line).and_then(|caps| {
                let type_id = caps[2].parse::<u8>().ok()?;
                Some((caps[1].to_string(), type_id))
            }) {
                Some((handle_id, type_id)) => {
                    record = Some(Record { handle_id, type_id, props: IndexMap::new() });
                    state = State::RecordName;
                    pending = None;
                }
                None => {
                    warn!(line = i + 1, "malformed Handle line, skipping record");
                    record = None;
                }
            }
            continue;
        }

        if line.is_empty() {
            if let Some(rec) = record.take() {
                commit_record(rec, &mut out);
            }
            continue;
        }

        let Some(rec) = record.as_mut() else { continue };
        // End of input acts as a zero-indent successor line.
        let next_indent = lines.get(i + 1).map(|l| indent_level(l)).unwrap_or(0);

        match state {
            State::RecordName => state = State::ReadKv,
            State::ReadKv => {
                let Some((name, value)) = line.split_once(':') else {
                    warn!(line = i + 1, "property line without a ':' separator, skipping");
                    continue;
                };
                let name = name.trim().to_string();
                let prop = Property::new(value.trim());
                if indent_level(line) < next_indent {
                    pending = Some((name, prop));
                    state = State::ListProperty;
                } else {
                    rec.props.insert(name, prop);
                }
            }
            State::ListProperty => {
                if let Some((_, prop)) = pending.as_mut() {
                    prop.items.push(line.trim().to_string());
                }
                if indent_level(line) > next_indent && indent_level(line) <= 2 {
                    state = State::ReadKv;
                    if let Some((name, prop)) = pending.take() {
                        rec.props.insert(name, prop);
                    }
                }
            }
        }
    }

    // Input ended with a record still open: commit it, list property included.
    if let Some(mut rec) = record.take() {
        if let Some((name, prop)) = pending.take() {
            rec.props.insert(name, prop);
        }
        commit_record(rec, &mut out);
    }
    out
}

/// Read `path` once and parse it. The dmidecode invocation itself lives with
/// the caller; the core only ever sees the text.
pub fn parse_dmi_file<P: AsRef<Path>>(path: P) -> std::io::Result<DmiParse> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_dmi(&text))
}

fn commit_record(rec: Record, out: &mut DmiParse) {
    out.groups.entry(rec.type_id).or_default().push(rec.handle_id.clone());
    out.records.insert(rec.handle_id.clone(), rec);
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD_DUMP: &str = "Handle 0x0002, DMI type 2, 15 bytes\n\
Base Board Information\n\
\tManufacturer: Acme\n\
\tProduct Name: Magnesium\n\
\tVersion: 1234567890\n\
\tChassis Handle: 0x0003\n\
\tType: Motherboard\n\
\tContained Object Handles: 2\n\
\t\t0x009A\n\
\t\t0x009B\n\
\tCharacteristics:\n\
\t\tPCI is supported\n\
\t\tACPI is supported\n\
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
\t\t0x0125 (Group Associations)\n\
\n";

    #[test]
    fn parses_records_and_groups() {
        let parse = parse_dmi(BOARD_DUMP);
        assert_eq!(parse.records.len(), 3);
        assert!(parse.records.contains_key("0x0002"));
        assert_eq!(parse.handles_of_type(2), ["0x0002"]);
        assert_eq!(parse.handles_of_type(14), ["0x0125", "0x0126"]);
        assert!(parse.handles_of_type(17).is_empty());
    }

    #[test]
    fn scalar_and_list_properties() {
        let parse = parse_dmi(BOARD_DUMP);
        let board = &parse.records["0x0002"];
        assert_eq!(board.handle_id, "0x0002");
        assert_eq!(board.type_id, 2);

        let product = &board.props["Product Name"];
        assert_eq!(product.val, "Magnesium");
        assert!(product.items.is_empty());

        let contained = &board.props["Contained Object Handles"];
        assert_eq!(contained.val, "2");
        assert_eq!(contained.items, ["0x009A", "0x009B"]);

        // A list property can have an empty scalar value.
        let characteristics = &board.props["Characteristics"];
        assert_eq!(characteristics.val, "");
        assert_eq!(characteristics.items, ["PCI is supported", "ACPI is supported"]);
    }

    #[test]
    fn property_order_is_preserved() {
        let parse = parse_dmi(BOARD_DUMP);
        let names: Vec<&String> = parse.records["0x0002"].props.keys().collect();
        assert_eq!(
            names,
            [
                "Manufacturer",
                "Product Name",
                "Version",
                "Chassis Handle",
                "Type",
                "Contained Object Handles",
                "Characteristics"
            ]
        );
    }

    #[test]
    fn parsing_is_idempotent() {
        assert_eq!(parse_dmi(BOARD_DUMP), parse_dmi(BOARD_DUMP));
    }

    #[test]
    fn empty_input_yields_empty_maps() {
        let parse = parse_dmi("");
        assert!(parse.records.is_empty());
        assert!(parse.groups.is_empty());
    }

    #[test]
    fn property_line_at_end_of_input_commits_as_scalar() {
        let text = "Handle 0x0001, DMI type 0, 10 bytes\n\
BIOS Information\n\
\tVendor: Acme\n\
\tVersion: 1.2.3";
        let parse = parse_dmi(text);
        let record = &parse.records["0x0001"];
        assert_eq!(record.props["Version"].val, "1.2.3");
        assert!(record.props["Version"].items.is_empty());
    }

    #[test]
    fn list_item_at_end_of_input_commits_the_list() {
        let text = "Handle 0x0001, DMI type 14, 10 bytes\n\
Group Associations\n\
\tItems: 1\n\
\t\t0x0002 (Group Associations)";
        let parse = parse_dmi(text);
        let items = &parse.records["0x0001"].props["Items"].items;
        assert_eq!(items, &["0x0002 (Group Associations)"]);
    }

    #[test]
    fn line_without_separator_is_skipped() {
        let text = "Handle 0x0001, DMI type 0, 10 bytes\n\
BIOS Information\n\
\tVendor: Acme\n\
\tnot a property line\n\
\tVersion: 1.2.3\n\
\n";
        let parse = parse_dmi(text);
        let record = &parse.records["0x0001"];
        assert_eq!(record.props.len(), 2);
        assert_eq!(record.props["Version"].val, "1.2.3");
    }

    #[test]
    fn handle_ids_keep_their_printed_width() {
        let text = "Handle 0x3, DMI type 3, 10 bytes\n\
Chassis Information\n\
\tManufacturer: Acme\n\
\n";
        let parse = parse_dmi(text);
        assert!(parse.records.contains_key("0x3"));
        assert!(!parse.records.contains_key("0x0003"));
    }

    #[test]
    fn parse_file_matches_parse_str() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(BOARD_DUMP.as_bytes()).expect("write");
        let from_file = parse_dmi_file(file.path()).expect("parse file");
        assert_eq!(from_file, parse_dmi(BOARD_DUMP));
    }
}
