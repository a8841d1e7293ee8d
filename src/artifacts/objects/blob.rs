//! File content tracked by a commit
//!
//! A blob is one file's content at one point in history. The blob hash
//! covers the file *name* as well as the bytes, so identical content under
//! two names yields two distinct blobs. That is an inherited design choice
//! of the identity scheme, not an accident; do not dedup across names.

use crate::artifacts::objects::object_id::ObjectId;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Blob {
    oid: ObjectId,
    content: String,
}

impl Blob {
    /// Build a blob for `name`, hashing the name together with the content.
    pub fn new(name: &str, content: String) -> Self {
        let oid = Self::hash(name, &content);
        Blob { oid, content }
    }

    /// Rebuild a blob from storage without rehashing.
    pub(crate) fn from_parts(oid: ObjectId, content: String) -> Self {
        Blob { oid, content }
    }

    /// `sha1("blob <name> <content>")`
    pub fn hash(name: &str, content: &str) -> ObjectId {
        ObjectId::digest(format!("blob {} {}", name, content).as_bytes())
    }

    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
