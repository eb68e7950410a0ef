//! Commit-time validation for ledger transactions
//!
//! Rules:
//! - First committer wins, decided by the READ set, not the write set
//! - Blind writes (write without read) do not conflict
//! - A range scan conflicts if any key entered, left, or changed version
//!   inside the scanned range (phantom read)
//! - Version 0 stands for "key absent"

use std::collections::BTreeMap;

use crate::snapshot::{range_listing, StateMap};

/// Types of conflicts that can occur during transaction validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictType {
    /// Key was read at one version but the committed version differs now
    ReadWriteConflict {
        /// The key that has a conflict
        key: String,
        /// Version recorded in the read set (0 = absent)
        read_version: u64,
        /// Committed version at validation time (0 = absent)
        current_version: u64,
    },

    /// The set of keys/versions inside a scanned range changed
    PhantomConflict {
        /// Inclusive range start ("" = unbounded)
        start: String,
        /// Exclusive range end ("" = unbounded)
        end: String,
    },
}

impl std::fmt::Display for ConflictType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictType::ReadWriteConflict {
                key,
                read_version,
                current_version,
            } => write!(
                f,
                "key {} read at version {} but is now at version {}",
                key, read_version, current_version
            ),
            ConflictType::PhantomConflict { start, end } => {
                write!(f, "range [{:?}, {:?}) changed since it was scanned", start, end)
            }
        }
    }
}

/// A range scan recorded for phantom detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRead {
    /// Inclusive start as passed to the scan
    pub start: String,
    /// Exclusive end as passed to the scan
    pub end: String,
    /// Keys and versions visible in the range at scan time
    pub observed: Vec<(String, u64)>,
}

/// Result of transaction validation
///
/// A transaction commits only if `is_valid()` returns true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// All conflicts detected during validation
    pub conflicts: Vec<ConflictType>,
}

impl ValidationResult {
    /// Create a successful validation result (no conflicts)
    pub fn ok() -> Self {
        ValidationResult {
            conflicts: Vec::new(),
        }
    }

    /// Create a validation result with a single conflict
    pub fn conflict(conflict: ConflictType) -> Self {
        ValidationResult {
            conflicts: vec![conflict],
        }
    }

    /// Check if validation passed (no conflicts)
    pub fn is_valid(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.conflicts.extend(other.conflicts);
    }

    /// Get the number of conflicts
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }

    /// One-line summary naming the first conflict
    pub fn summary(&self) -> String {
        match self.conflicts.first() {
            None => "no conflicts".to_string(),
            Some(first) if self.conflicts.len() == 1 => first.to_string(),
            Some(first) => format!("{} (and {} more)", first, self.conflicts.len() - 1),
        }
    }
}

/// Validate the read set against the committed state
pub fn validate_read_set(read_set: &BTreeMap<String, u64>, data: &StateMap) -> ValidationResult {
    let mut result = ValidationResult::ok();

    for (key, read_version) in read_set {
        let current_version = data.get(key).map(|sv| sv.version()).unwrap_or(0);
        if current_version != *read_version {
            result.conflicts.push(ConflictType::ReadWriteConflict {
                key: key.clone(),
                read_version: *read_version,
                current_version,
            });
        }
    }

    result
}

/// Re-run every recorded range scan and compare its listing
pub fn validate_range_set(range_set: &[RangeRead], data: &StateMap) -> ValidationResult {
    let mut result = ValidationResult::ok();

    for range in range_set {
        if range_listing(data, &range.start, &range.end) != range.observed {
            result.conflicts.push(ConflictType::PhantomConflict {
                start: range.start.clone(),
                end: range.end.clone(),
            });
        }
    }

    result
}

/// Validate a transaction's read and range sets
pub fn validate_transaction(
    read_set: &BTreeMap<String, u64>,
    range_set: &[RangeRead],
    data: &StateMap,
) -> ValidationResult {
    let mut result = validate_read_set(read_set, data);
    result.merge(validate_range_set(range_set, data));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stored_value::StoredValue;

    fn state(entries: &[(&str, u64)]) -> StateMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), StoredValue::new(Vec::new(), *v)))
            .collect()
    }

    #[test]
    fn test_unchanged_read_set_is_valid() {
        let data = state(&[("a", 1)]);
        let reads: BTreeMap<String, u64> = [("a".to_string(), 1), ("b".to_string(), 0)].into();
        assert!(validate_read_set(&reads, &data).is_valid());
    }

    #[test]
    fn test_changed_version_conflicts() {
        let data = state(&[("a", 2)]);
        let reads: BTreeMap<String, u64> = [("a".to_string(), 1)].into();
        let result = validate_read_set(&reads, &data);
        assert_eq!(
            result.conflicts,
            vec![ConflictType::ReadWriteConflict {
                key: "a".to_string(),
                read_version: 1,
                current_version: 2,
            }]
        );
    }

    #[test]
    fn test_key_created_after_absent_read_conflicts() {
        // Two concurrent creates of the same id: the loser read "absent"
        let data = state(&[("p1", 3)]);
        let reads: BTreeMap<String, u64> = [("p1".to_string(), 0)].into();
        assert!(!validate_read_set(&reads, &data).is_valid());
    }

    #[test]
    fn test_phantom_insert_conflicts() {
        let before = state(&[("a", 1)]);
        let range = RangeRead {
            start: String::new(),
            end: String::new(),
            observed: range_listing(&before, "", ""),
        };

        let after = state(&[("a", 1), ("b", 2)]);
        let result = validate_range_set(&[range.clone()], &after);
        assert_eq!(result.conflict_count(), 1);
        assert!(validate_range_set(&[range], &before).is_valid());
    }

    #[test]
    fn test_insert_outside_range_is_fine() {
        let before = state(&[("a", 1)]);
        let range = RangeRead {
            start: "a".to_string(),
            end: "b".to_string(),
            observed: range_listing(&before, "a", "b"),
        };
        let after = state(&[("a", 1), ("c", 2)]);
        assert!(validate_range_set(&[range], &after).is_valid());
    }

    #[test]
    fn test_summary_mentions_extra_conflicts() {
        let mut result = ValidationResult::conflict(ConflictType::PhantomConflict {
            start: String::new(),
            end: String::new(),
        });
        assert!(result.summary().contains("changed since it was scanned"));

        result.merge(ValidationResult::conflict(ConflictType::ReadWriteConflict {
            key: "x".to_string(),
            read_version: 0,
            current_version: 1,
        }));
        assert!(result.summary().ends_with("(and 1 more)"));
    }
}
