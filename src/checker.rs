//! Per-field record checkers: the closed set of predicate kinds a rule can
//! attach to a property, dispatched by a single [`Checker::validate`].
//!
//! Checkers are built from the static rule tables, so the regex patterns they
//! compile are hardcoded strings; pattern compilation failures there are
//! programming errors, not runtime conditions. All value matching is
//! case-insensitive and anchored to the full value (`fullmatch` semantics).

use crate::dmi::{Property, Record};
use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

/// The global record set checkers resolve handle references against.
pub type Records = IndexMap<String, Record>;

/// One per-field predicate. `validate` returns false both when the property
/// is absent and when it is present but fails the condition.
#[derive(Debug, Clone)]
pub enum Checker {
    /// Property exists and has a non-empty value or at least one item.
    Present { field: String },
    /// Property value fully matches the pattern, case-insensitive.
    ValueRegexp { field: String, pattern: Regex },
    /// Property value is a whitespace-separated sequence of allowed members
    /// (multi-flag fields); members may themselves contain spaces.
    ValueEnum { field: String, pattern: Regex },
    /// Property value, as an integer times `multiplier`, equals the item
    /// count; `compare` optionally bounds the raw count.
    ItemCount { field: String, multiplier: usize, compare: Option<fn(i64) -> bool> },
    /// Property items contain no duplicates.
    ItemUniqueness { field: String },
    /// Property value is a handle that must resolve (after zero-padding
    /// normalization to 4 hex digits) to a record of the expected type.
    HandleRef { field: String, type_id: u8 },
}

fn full_match(pattern: &str) -> Regex {
    RegexBuilder::new(&format!("^(?:{pattern})$"))
        .case_insensitive(true)
        .build()
        .expect("rule table pattern is valid")
}

impl Checker {
    pub fn present(field: &str) -> Self {
        Checker::Present { field: field.to_string() }
    }

    pub fn value_regexp(field: &str, pattern: &str) -> Self {
        Checker::ValueRegexp { field: field.to_string(), pattern: full_match(pattern) }
    }

    pub fn value_enum(field: &str, members: &[&str]) -> Self {
        let alternation = members.join("|");
        let pattern = format!(r"({alternation})(\s+({alternation}))*");
        Checker::ValueEnum { field: field.to_string(), pattern: full_match(&pattern) }
    }

    pub fn item_count(field: &str) -> Self {
        Checker::ItemCount { field: field.to_string(), multiplier: 1, compare: None }
    }

    /// Item count with a bound on the raw count, e.g. `|x| x >= 1`.
    pub fn item_count_bounded(field: &str, compare: fn(i64) -> bool) -> Self {
        Checker::ItemCount { field: field.to_string(), multiplier: 1, compare: Some(compare) }
    }

    /// Item count where each counted entry spans `multiplier` lines.
    pub fn item_count_multiplied(field: &str, multiplier: usize) -> Self {
        Checker::ItemCount { field: field.to_string(), multiplier, compare: None }
    }

    pub fn item_uniqueness(field: &str) -> Self {
        Checker::ItemUniqueness { field: field.to_string() }
    }

    pub fn handle_ref(field: &str, type_id: u8) -> Self {
        Checker::HandleRef { field: field.to_string(), type_id }
    }

    /// Evaluate this checker against one record, with the full record set
    /// available for handle resolution.
    pub fn validate(&self, record: &Record, records: &Records) -> bool {
        match self {
            Checker::Present { field } => {
                record.props.get(field).is_some_and(Property::is_populated)
            }
            Checker::ValueRegexp { field, pattern } | Checker::ValueEnum { field, pattern } => {
                record.props.get(field).is_some_and(|p| pattern.is_match(&p.val))
            }
            Checker::ItemCount { field, multiplier, compare } => {
                let Some(prop) = record.props.get(field) else { return false };
                let Ok(count) = prop.val.trim().parse::<i64>() else { return false };
                let mut valid = count * *multiplier as i64 == prop.items.len() as i64;
                if let Some(compare) = compare {
                    valid &= compare(count);
                }
                valid
            }
            Checker::ItemUniqueness { field } => {
                let Some(prop) = record.props.get(field) else { return false };
                let unique: HashSet<&String> = prop.items.iter().collect();
                unique.len() == prop.items.len()
            }
            Checker::HandleRef { field, type_id } => {
                let Some(prop) = record.props.get(field) else { return false };
                resolve_handle(prop.val.trim(), records)
                    .is_some_and(|target| target.type_id == *type_id)
            }
        }
    }
}

/// Look a handle value up in the record set, first as printed, then with the
/// width normalized to 4 hex digits so `"0x3"` finds `"0x0003"`.
fn resolve_handle<'a>(val: &str, records: &'a Records) -> Option<&'a Record> {
    if let Some(record) = records.get(val) {
        return Some(record);
    }
    let digits = val.strip_prefix("0x").or_else(|| val.strip_prefix("0X"))?;
    let numeric = u64::from_str_radix(digits, 16).ok()?;
    records.get(&format!("0x{numeric:04X}"))
}
