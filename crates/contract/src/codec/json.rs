//! JSON product codec.
//!
//! This is the canonical ledger encoding: one compact JSON object per product
//! with a fixed field order and RFC 3339 timestamps, readable by any off-ledger
//! tool.
//!
//! ```
//! use supplychain_contract::codec::{JsonCodec, ProductCodec};
//! use supplychain_contract::Product;
//! use supplychain_core::Timestamp;
//!
//! let p = Product::new("p1", "Laptop", "Created", "CompanyA", "", "Electronics", Timestamp::EPOCH);
//! let bytes = JsonCodec.encode(&p).unwrap();
//! assert!(bytes.starts_with(br#"{"id":"p1","name":"Laptop""#));
//! assert_eq!(JsonCodec.decode(&bytes).unwrap(), p);
//! ```

use super::traits::{CodecError, ProductCodec};
use crate::product::Product;

/// JSON codec - serde_json over the `Product` schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ProductCodec for JsonCodec {
    fn encode(&self, product: &Product) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(product).map_err(|e| CodecError::EncodeError(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Product, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::DecodeError(e.to_string()))
    }

    fn codec_id(&self) -> &str {
        "json"
    }
}
