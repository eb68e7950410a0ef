//! Storage-layer value wrapper
//!
//! The contract sees plain bytes. The ledger additionally tracks the commit
//! version that last wrote each key, which is what MVCC validation compares.

/// Bytes stored under a key plus the commit version that wrote them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredValue {
    value: Vec<u8>,
    version: u64,
}

impl StoredValue {
    /// Create a new stored value
    pub fn new(value: Vec<u8>, version: u64) -> Self {
        StoredValue { value, version }
    }

    /// Get the raw bytes
    #[inline]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Get the commit version that wrote this value
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Consume and return the raw bytes
    #[inline]
    pub fn into_value(self) -> Vec<u8> {
        self.value
    }
}
