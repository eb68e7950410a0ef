//! Product codec trait definitions.

use supplychain_core::Error;

use crate::product::Product;

/// Product codec trait.
///
/// Converts a [`Product`] to and from the bytes stored under its key.
///
/// # Contract
///
/// For every product `p`, `decode(&encode(&p)?)? == p`. The byte layout is the
/// ledger's on-disk schema, so an implementation must be deterministic: equal
/// products always encode to equal bytes.
///
/// # Thread Safety
///
/// Codecs must be `Send + Sync` so one contract instance can serve concurrent
/// invocations.
pub trait ProductCodec: Send + Sync {
    /// Encode a product for storage.
    fn encode(&self, product: &Product) -> Result<Vec<u8>, CodecError>;

    /// Decode bytes read from storage.
    ///
    /// Returns an error if the bytes are not a valid encoding (corruption or
    /// foreign data under the key).
    fn decode(&self, bytes: &[u8]) -> Result<Product, CodecError>;

    /// Unique codec identifier.
    fn codec_id(&self) -> &str;
}

/// Codec errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Encoding failed.
    #[error("Encode error: {0}")]
    EncodeError(String),

    /// Decoding failed (invalid format, missing or unknown fields).
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Unknown codec identifier.
    #[error("Unknown codec: {0}")]
    UnknownCodec(String),
}

impl CodecError {
    /// Attach the store key and lift into the ledger error taxonomy
    pub fn for_key(self, key: &str) -> Error {
        match self {
            CodecError::EncodeError(reason) => Error::Encode {
                key: key.to_string(),
                reason,
            },
            CodecError::DecodeError(reason) => Error::Decode {
                key: key.to_string(),
                reason,
            },
            CodecError::UnknownCodec(id) => Error::invalid_argument(format!("unknown codec {}", id)),
        }
    }
}
