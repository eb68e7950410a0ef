//! Product codec abstraction.
//!
//! The codec owns the on-ledger schema: every product the contract writes is
//! encoded through it and every value it reads is decoded through it.
//!
//! Uses `JsonCodec` by default. The trait keeps the schema in one place so
//! the contract logic never touches serialization directly.
//!
//! # Usage
//!
//! ```ignore
//! use supplychain_contract::codec::{ProductCodec, JsonCodec};
//!
//! let bytes = JsonCodec.encode(&product)?;
//! let decoded = JsonCodec.decode(&bytes)?;
//!
//! assert_eq!(product, decoded);
//! ```

mod json;
mod traits;

pub use json::JsonCodec;
pub use traits::{CodecError, ProductCodec};

/// Get a codec by its identifier.
///
/// # Known Codecs
///
/// - `"json"`: serde_json encoding of the product schema
pub fn get_codec(codec_id: &str) -> Result<Box<dyn ProductCodec>, CodecError> {
    match codec_id {
        "json" => Ok(Box::new(JsonCodec)),
        _ => Err(CodecError::UnknownCodec(codec_id.to_string())),
    }
}
