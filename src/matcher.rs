//! Predicates that decide which records a rule applies to.

use crate::dmi::Record;

/// A single condition over a record. Type equality is the only built-in;
/// the enum leaves room for more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    TypeIs(u8),
}

impl Predicate {
    fn matches(&self, record: &Record) -> bool {
        match self {
            Predicate::TypeIs(type_id) => record.type_id == *type_id,
        }
    }
}

/// Conjunction of predicates. A matcher with no predicates matches every
/// record, which is what the simplified per-type rule tables rely on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matcher {
    predicates: Vec<Predicate>,
}

impl Matcher {
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Matcher { predicates }
    }

    /// Matches every record.
    pub fn any() -> Self {
        Matcher::default()
    }

    /// Matches records of one DMI type.
    pub fn record_type(type_id: u8) -> Self {
        Matcher::new(vec![Predicate::TypeIs(type_id)])
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn record(type_id: u8) -> Record {
        Record { handle_id: "0x0001".to_string(), type_id, props: IndexMap::new() }
    }

    #[test]
    fn type_matcher() {
        let matcher = Matcher::record_type(14);
        assert!(matcher.matches(&record(14)));
        assert!(!matcher.matches(&record(2)));
    }

    #[test]
    fn empty_matcher_matches_everything() {
        let matcher = Matcher::any();
        assert!(matcher.matches(&record(0)));
        assert!(matcher.matches(&record(162)));
    }
}
