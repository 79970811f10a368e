//! Per-handle accumulation of validation errors.
//!
//! Several rules can fail on one record; the bucket groups every
//! `(error, action)` pair under the record's handle so a reporting
//! collaborator can print them together. The bucket is owned by the caller
//! and passed by mutable reference through the rule engine; there is no
//! process-wide state. Iteration is sorted by handle for deterministic
//! output.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBucket {
    bucket: BTreeMap<String, Vec<(String, String)>>,
}

impl ErrorBucket {
    pub fn new() -> Self {
        ErrorBucket::default()
    }

    pub fn add_error(&mut self, handle_id: &str, err_msg: &str, action_msg: &str) {
        self.bucket
            .entry(handle_id.to_string())
            .or_default()
            .push((err_msg.to_string(), action_msg.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.bucket.is_empty()
    }

    /// Total number of accumulated `(error, action)` pairs.
    pub fn len(&self) -> usize {
        self.bucket.values().map(Vec::len).sum()
    }

    /// Errors recorded for one handle, empty if none.
    pub fn errors_for(&self, handle_id: &str) -> &[(String, String)] {
        self.bucket.get(handle_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Handles and their errors, sorted by handle.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &[(String, String)])> {
        self.bucket.iter().map(|(handle, errs)| (handle, errs.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_errors_by_handle_in_sorted_order() {
        let mut bucket = ErrorBucket::new();
        bucket.add_error("0x0010", "FIELD ERROR: Name", "populate Name");
        bucket.add_error("0x0002", "FIELD ERROR: Vendor", "populate Vendor");
        bucket.add_error("0x0010", "FIELD ERROR: Items", "populate Items");

        assert_eq!(bucket.len(), 3);
        assert_eq!(bucket.errors_for("0x0010").len(), 2);
        assert!(bucket.errors_for("0x0099").is_empty());

        let handles: Vec<&String> = bucket.iter().map(|(h, _)| h).collect();
        assert_eq!(handles, ["0x0002", "0x0010"]);
    }

    #[test]
    fn empty_bucket() {
        let bucket = ErrorBucket::new();
        assert!(bucket.is_empty());
        assert_eq!(bucket.len(), 0);
    }
}
