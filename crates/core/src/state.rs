//! Per-field assignment state
//!
//! Each instance tracks, for every declared field, whether it has been
//! assigned. The tracker is a bitset indexed by declaration order and sized
//! from the schema when the instance is allocated.
//!
//! ## Invariant
//!
//! A field moves `Unset -> Set` at most once. There is no way back.

use smallvec::{smallvec, SmallVec};
use std::fmt;

const WORD_BITS: usize = 64;

/// State of a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// Not yet assigned
    Unset,
    /// Assigned (or finalised by a lock)
    Set,
}

impl FieldState {
    /// True for `Set`
    pub fn is_set(self) -> bool {
        self == FieldState::Set
    }
}

impl fmt::Display for FieldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldState::Unset => f.write_str("unset"),
            FieldState::Set => f.write_str("set"),
        }
    }
}

/// Fixed-size set/unset bitset, one bit per declared field
///
/// Records with up to 64 fields never allocate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStates {
    words: SmallVec<[u64; 1]>,
    len: usize,
}

impl FieldStates {
    /// All `len` fields start unset
    pub fn new(len: usize) -> Self {
        let word_count = ((len + WORD_BITS - 1) / WORD_BITS).max(1);
        FieldStates {
            words: smallvec![0; word_count],
            len,
        }
    }

    /// Number of tracked fields
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no fields are tracked
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// State of field `idx`
    ///
    /// # Panics
    ///
    /// Panics if `idx >= len()`.
    pub fn state(&self, idx: usize) -> FieldState {
        assert!(idx < self.len, "field index {idx} out of range");
        if self.words[idx / WORD_BITS] & (1u64 << (idx % WORD_BITS)) != 0 {
            FieldState::Set
        } else {
            FieldState::Unset
        }
    }

    /// Mark field `idx` set; returns false if it already was
    pub fn mark_set(&mut self, idx: usize) -> bool {
        if self.state(idx).is_set() {
            return false;
        }
        self.words[idx / WORD_BITS] |= 1u64 << (idx % WORD_BITS);
        true
    }

    /// Mark every field set
    pub fn mark_all(&mut self) {
        for idx in 0..self.len {
            self.words[idx / WORD_BITS] |= 1u64 << (idx % WORD_BITS);
        }
    }

    /// Number of set fields
    pub fn set_count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True once every field is set (vacuously true with no fields)
    pub fn all_set(&self) -> bool {
        self.set_count() == self.len
    }

    /// Iterate states in declaration order
    pub fn iter(&self) -> impl Iterator<Item = FieldState> + '_ {
        (0..self.len).map(move |idx| self.state(idx))
    }
}
