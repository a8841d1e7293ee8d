//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character hexadecimal strings identifying blobs and
//! commits. Commit objects are stored in
//! `.vcs/objects/<first-2-chars>/<remaining-38-chars>`.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use sha1::{Digest, Sha1};
use std::path::PathBuf;

/// A 40-character hexadecimal SHA-1 identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string.
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("Invalid object ID length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("Invalid object ID characters: {}", id));
        }
        Ok(Self(id))
    }

    /// Hash an identity payload into an object ID.
    pub fn digest(payload: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(payload);
        let oid = hasher.finalize();
        Self(format!("{oid:x}"))
    }

    /// Convert to the fan-out storage path `XX/YYYY...` where XX is the
    /// first 2 characters.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// Abbreviated form: the first 7 characters of the hash.
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
