//! Structural comparison of record instances
//!
//! Two instances are equal when they are of the same record type, agree on
//! the lock state, and render to the same token-less text. Tokens never
//! take part: an instance rebuilt from another's text compares equal to it.

use crate::record::RecordData;
use std::collections::BTreeSet;
use std::fmt;

/// One aspect in which two instances differ
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mismatch {
    /// Different record types; nothing else is compared
    Type,
    /// One is locked and the other is not
    LockState,
    /// Field values differ
    Value,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Type => f.write_str("type"),
            Mismatch::LockState => f.write_str("lock state"),
            Mismatch::Value => f.write_str("value"),
        }
    }
}

/// Result of comparing two instances
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    mismatches: BTreeSet<Mismatch>,
}

impl Comparison {
    /// True when no mismatch was found
    pub fn is_equal(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Mismatches in a stable order
    pub fn mismatches(&self) -> impl Iterator<Item = Mismatch> + '_ {
        self.mismatches.iter().copied()
    }

    /// True if `mismatch` was found
    pub fn has(&self, mismatch: Mismatch) -> bool {
        self.mismatches.contains(&mismatch)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_equal() {
            return f.write_str("equal");
        }
        let parts: Vec<String> = self.mismatches().map(|m| m.to_string()).collect();
        write!(f, "differ in {}", parts.join(", "))
    }
}

/// Compare two instances
///
/// A type mismatch short-circuits: lock state and values of unrelated
/// types are not meaningful to compare.
pub fn compare(left: &RecordData, right: &RecordData) -> Comparison {
    let mut mismatches = BTreeSet::new();

    if left.type_id() != right.type_id() {
        mismatches.insert(Mismatch::Type);
        return Comparison { mismatches };
    }

    if left.is_locked() != right.is_locked() {
        mismatches.insert(Mismatch::LockState);
    }

    if !left.same_values(right) && plain_text(left) != plain_text(right) {
        mismatches.insert(Mismatch::Value);
    }

    Comparison { mismatches }
}

// Keys are field names, so rendering only fails on a broken writer.
fn plain_text(data: &RecordData) -> Option<String> {
    serde_json::to_string(data).ok()
}
