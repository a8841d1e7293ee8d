//! Commit object
//!
//! A commit is an immutable snapshot of the whole file tree: a sorted
//! file-name to blob mapping, parent linkage, message, and timestamp. The
//! commit id is a pure function of those fields plus the parent ids, so the
//! graph is acyclic by construction.
//!
//! ## Format
//!
//! On disk, wrapped in the `commit <size>\0` loose-object header:
//!
//! ```text
//! parent <sha>              (absent for the root commit)
//! merge-parent <sha>        (merge commits only)
//! timestamp <unix-secs> <offset-secs>
//! blob <sha> <content-len> <name>
//! <content bytes>
//! ...
//! message <message-len>
//! <message bytes>
//! ```
//!
//! Blob contents are co-located with the commit rather than stored as
//! separate objects; the blob hash still identifies them individually.

use crate::areas::index::Index;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, Timelike};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// Slim representation of a commit
///
/// Only what ancestor searches need: identity, parent linkage, and the
/// timestamp used to order the traversal.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
    pub timestamp: DateTime<FixedOffset>,
}

/// An immutable snapshot node of the commit graph.
///
/// There is no mutating method on this type; all construction funnels
/// through [`CommitBuilder`], which computes the id last.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    id: ObjectId,
    parent: Option<ObjectId>,
    merge_parent: Option<ObjectId>,
    message: String,
    timestamp: DateTime<FixedOffset>,
    blobs: BTreeMap<String, Blob>,
}

impl Commit {
    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn merge_parent(&self) -> Option<&ObjectId> {
        self.merge_parent.as_ref()
    }

    /// Parent ids in order (primary first, merge parent second).
    pub fn parents(&self) -> Vec<ObjectId> {
        self.parent
            .iter()
            .chain(self.merge_parent.iter())
            .cloned()
            .collect()
    }

    pub fn is_merge(&self) -> bool {
        self.merge_parent.is_some()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Timestamp in the format log output uses, e.g.
    /// "Thu Jan 1 00:00:00 1970 +0000".
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format("%a %b %-d %H:%M:%S %Y %z").to_string()
    }

    pub fn tracks(&self, name: &str) -> bool {
        self.blobs.contains_key(name)
    }

    pub fn blob_oid(&self, name: &str) -> Option<&ObjectId> {
        self.blobs.get(name).map(Blob::oid)
    }

    pub fn content(&self, name: &str) -> Option<&str> {
        self.blobs.get(name).map(Blob::content)
    }

    /// Tracked file names in sorted order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.blobs.keys().map(String::as_str)
    }

    pub fn blobs(&self) -> &BTreeMap<String, Blob> {
        &self.blobs
    }

    fn compute_id(
        parent: Option<&ObjectId>,
        merge_parent: Option<&ObjectId>,
        message: &str,
        timestamp: &DateTime<FixedOffset>,
        blobs: &BTreeMap<String, Blob>,
    ) -> ObjectId {
        let parent_ref = parent.map_or("none", AsRef::as_ref);
        let merge_ref = merge_parent.map_or("none", AsRef::as_ref);
        let blob_oids = blobs
            .values()
            .map(|blob| blob.oid().as_ref())
            .collect::<Vec<_>>()
            .join(" ");

        ObjectId::digest(
            format!(
                "commit {} {} {} {} {}",
                parent_ref,
                merge_ref,
                message,
                timestamp.timestamp(),
                blob_oids
            )
            .as_bytes(),
        )
    }
}

/// Commit timestamps persist with second precision, so in-memory values
/// carry no sub-second component either.
fn now_to_the_second() -> DateTime<FixedOffset> {
    let now = chrono::Local::now().fixed_offset();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Staged construction of a [`Commit`].
///
/// Baseline blobs are inherited from the parent, then overridden by the
/// pending entries of the index; `finalize` computes the id over the final
/// field set, after which nothing can change.
#[derive(Debug)]
pub struct CommitBuilder {
    parent: Option<ObjectId>,
    merge_parent: Option<ObjectId>,
    message: String,
    timestamp: DateTime<FixedOffset>,
    blobs: BTreeMap<String, Blob>,
}

impl CommitBuilder {
    /// The root commit: no parent, pinned to the Unix epoch so the root id
    /// is identical across repositories.
    pub fn root(message: &str) -> Self {
        CommitBuilder {
            parent: None,
            merge_parent: None,
            message: message.to_string(),
            timestamp: DateTime::UNIX_EPOCH.fixed_offset(),
            blobs: BTreeMap::new(),
        }
    }

    /// A single-parent commit inheriting the parent's full blob set.
    pub fn from_parent(parent: &Commit, message: &str) -> Self {
        let mut builder = CommitBuilder {
            parent: Some(parent.id().clone()),
            merge_parent: None,
            message: message.to_string(),
            timestamp: now_to_the_second(),
            blobs: BTreeMap::new(),
        };
        builder.inherit_from(parent);
        builder
    }

    /// A two-parent merge commit; the baseline comes from the primary
    /// parent, the merge parent contributes identity only.
    pub fn merge(parent: &Commit, merge_parent: &Commit, message: &str) -> Self {
        let mut builder = Self::from_parent(parent, message);
        builder.merge_parent = Some(merge_parent.id().clone());
        builder
    }

    fn inherit_from(&mut self, parent: &Commit) {
        self.blobs = parent.blobs().clone();
    }

    /// Fold the index's staged entries over the inherited baseline.
    pub fn apply_staged(&mut self, index: &Index) {
        for (name, content) in index.staged() {
            self.blobs
                .insert(name.to_string(), Blob::new(name, content.to_string()));
        }
    }

    /// Drop the index's removed entries from the baseline. Applied after
    /// `apply_staged` so removal wins if a name somehow appears in both.
    pub fn apply_removed(&mut self, index: &Index) {
        for (name, _) in index.removed() {
            self.blobs.remove(name);
        }
    }

    /// Compute the id over the final field set and freeze the commit.
    pub fn finalize(self) -> Commit {
        let id = Commit::compute_id(
            self.parent.as_ref(),
            self.merge_parent.as_ref(),
            &self.message,
            &self.timestamp,
            &self.blobs,
        );

        Commit {
            id,
            parent: self.parent,
            merge_parent: self.merge_parent,
            message: self.message,
            timestamp: self.timestamp,
            blobs: self.blobs,
        }
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content: Vec<u8> = Vec::new();

        if let Some(parent) = &self.parent {
            writeln!(content, "parent {}", parent)?;
        }
        if let Some(merge_parent) = &self.merge_parent {
            writeln!(content, "merge-parent {}", merge_parent)?;
        }
        writeln!(
            content,
            "timestamp {} {}",
            self.timestamp.timestamp(),
            self.timestamp.offset().local_minus_utc()
        )?;

        for (name, blob) in &self.blobs {
            writeln!(
                content,
                "blob {} {} {}",
                blob.oid(),
                blob.content().len(),
                name
            )?;
            content.write_all(blob.content().as_bytes())?;
            content.push(b'\n');
        }

        writeln!(content, "message {}", self.message.len())?;
        content.write_all(self.message.as_bytes())?;

        let mut commit_bytes = Vec::new();
        write!(commit_bytes, "commit {}\0", content.len())?;
        commit_bytes.extend_from_slice(&content);

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut header = Vec::new();
        reader.read_until(0, &mut header)?;
        let header = std::str::from_utf8(&header)?;
        if !header.starts_with("commit ") {
            anyhow::bail!("Invalid commit object: bad header");
        }

        let mut parent = None;
        let mut merge_parent = None;
        let mut timestamp = None;
        let mut blobs = BTreeMap::new();
        let mut message = None;

        loop {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim_end_matches('\n');

            if let Some(oid) = line.strip_prefix("parent ") {
                parent = Some(ObjectId::try_parse(oid.to_string())?);
            } else if let Some(oid) = line.strip_prefix("merge-parent ") {
                merge_parent = Some(ObjectId::try_parse(oid.to_string())?);
            } else if let Some(rest) = line.strip_prefix("timestamp ") {
                let mut parts = rest.splitn(2, ' ');
                let secs: i64 = parts
                    .next()
                    .context("Invalid commit object: missing timestamp seconds")?
                    .parse()?;
                let offset_secs: i32 = parts
                    .next()
                    .context("Invalid commit object: missing timestamp offset")?
                    .parse()?;
                let offset = FixedOffset::east_opt(offset_secs)
                    .context("Invalid commit object: timestamp offset out of range")?;
                timestamp = Some(
                    DateTime::from_timestamp(secs, 0)
                        .context("Invalid commit object: timestamp out of range")?
                        .with_timezone(&offset),
                );
            } else if let Some(rest) = line.strip_prefix("blob ") {
                let mut parts = rest.splitn(3, ' ');
                let oid = parts
                    .next()
                    .context("Invalid commit object: missing blob oid")?;
                let len: usize = parts
                    .next()
                    .context("Invalid commit object: missing blob length")?
                    .parse()?;
                let name = parts
                    .next()
                    .context("Invalid commit object: missing blob name")?
                    .to_string();

                let mut content = vec![0u8; len];
                reader.read_exact(&mut content)?;
                // trailing newline after the content bytes
                let mut newline = [0u8; 1];
                reader.read_exact(&mut newline)?;

                let oid = ObjectId::try_parse(oid.to_string())?;
                let content = String::from_utf8(content)?;
                blobs.insert(name, Blob::from_parts(oid, content));
            } else if let Some(len) = line.strip_prefix("message ") {
                let len: usize = len.parse()?;
                let mut content = vec![0u8; len];
                reader.read_exact(&mut content)?;
                message = Some(String::from_utf8(content)?);
            } else {
                anyhow::bail!("Invalid commit object: unexpected line {:?}", line);
            }
        }

        if merge_parent.is_some() && parent.is_none() {
            anyhow::bail!("Invalid commit object: merge parent without primary parent");
        }
        let timestamp = timestamp.context("Invalid commit object: missing timestamp")?;
        let message = message.context("Invalid commit object: missing message")?;

        let id = Commit::compute_id(
            parent.as_ref(),
            merge_parent.as_ref(),
            &message,
            &timestamp,
            &blobs,
        );

        Ok(Commit {
            id,
            parent,
            merge_parent,
            message,
            timestamp,
            blobs,
        })
    }
}
