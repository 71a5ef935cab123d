//! Opaque blob serialization for metadata and free records.

use std::fmt;

/// Failure reported by a [`BlobAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobError {
    reason: String,
}

impl BlobError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for BlobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for BlobError {}

/// Host-supplied serializer for blobs the codec stores but never inspects.
///
/// The codec frames every serialized blob with a `u32` length, so
/// `deserialize` always receives exactly the bytes `serialize` produced.
pub trait BlobAdapter {
    type Blob;

    fn serialize(&self, blob: &Self::Blob, out: &mut Vec<u8>) -> Result<(), BlobError>;

    fn deserialize(&self, bytes: &[u8]) -> Result<Self::Blob, BlobError>;
}

/// Blobs that are already bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawBlobs;

impl BlobAdapter for RawBlobs {
    type Blob = Vec<u8>;

    fn serialize(&self, blob: &Vec<u8>, out: &mut Vec<u8>) -> Result<(), BlobError> {
        out.extend_from_slice(blob);
        Ok(())
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Vec<u8>, BlobError> {
        Ok(bytes.to_vec())
    }
}
