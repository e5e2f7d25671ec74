use std::collections::BTreeMap;

use serde::Serialize;

/// Metadata entries padmark knows how to carry from decoder to encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataKey {
    /// Embedded ICC color profile.
    IccProfile,
    /// Raw EXIF block (TIFF-structured, without the `Exif\0\0` prefix).
    Exif,
}

/// Typed carrier for format metadata preserved across a re-encode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageMetadata {
    entries: BTreeMap<MetadataKey, Vec<u8>>,
}

impl ImageMetadata {
    /// Empty carrier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous entry. Empty payloads are ignored.
    pub fn insert(&mut self, key: MetadataKey, value: Vec<u8>) {
        if value.is_empty() {
            return;
        }
        self.entries.insert(key, value);
    }

    /// Drop the entry under `key`, returning its payload.
    pub fn remove(&mut self, key: MetadataKey) -> Option<Vec<u8>> {
        self.entries.remove(&key)
    }

    /// Borrow the payload stored under `key`.
    pub fn get(&self, key: MetadataKey) -> Option<&[u8]> {
        self.entries.get(&key).map(Vec::as_slice)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (MetadataKey, &[u8])> {
        self.entries.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Whether no metadata was captured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of captured entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
