//! Codec Module
//!
//! Pluggable value encoding. Cache backends store opaque bytes and rely on a
//! [`Codec`] to turn caller values into bytes and back.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Failure raised by a codec while encoding or decoding.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Bincode(#[from] bincode::Error),
}

/// Encodes values to bytes and decodes bytes into a caller-chosen type.
pub trait Codec: Clone + Send + Sync + 'static {
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized;

    fn decode<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned;
}

// == JSON ==
/// JSON encoding via serde_json. The default codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized,
    {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned,
    {
        Ok(serde_json::from_slice(bytes)?)
    }
}

// == Bincode ==
/// Compact binary encoding via bincode.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized,
    {
        Ok(bincode::serialize(value)?)
    }

    fn decode<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned,
    {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Session {
        user: String,
        scopes: Vec<String>,
    }

    fn session() -> Session {
        Session {
            user: "alice".to_string(),
            scopes: vec!["read".to_string(), "write".to_string()],
        }
    }

    #[test]
    fn test_json_codec_struct() {
        let codec = JsonCodec;
        let bytes = codec.encode(&session()).unwrap();
        assert!(std::str::from_utf8(&bytes).unwrap().contains("alice"));

        let decoded: Session = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, session());
    }

    #[test]
    fn test_bincode_codec_struct() {
        let codec = BincodeCodec;
        let bytes = codec.encode(&session()).unwrap();
        let decoded: Session = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, session());
    }

    #[test]
    fn test_json_decode_wrong_type() {
        let codec = JsonCodec;
        let bytes = codec.encode("a string").unwrap();
        let result: Result<u64, _> = codec.decode(&bytes);
        assert!(matches!(result, Err(CodecError::Json(_))));
    }

    #[test]
    fn test_bincode_decode_truncated() {
        let codec = BincodeCodec;
        let result: Result<u64, _> = codec.decode(&[1, 2]);
        assert!(matches!(result, Err(CodecError::Bincode(_))));
    }
}
