//! The staging index
//!
//! The index holds the content of files staged for addition and files
//! marked for removal, keyed by file name. A name is never in both maps:
//! staging clears a pending removal and vice versa.
//!
//! ## File Format
//!
//! `.vcs/index` is a text stanza format, checksummed:
//!
//! ```text
//! staged <content-len> <name>
//! <content bytes>
//! removed <content-len> <name>
//! <content bytes>
//! checksum <sha>
//! ```
//!
//! The checksum covers every byte before its own line; a mismatch on load
//! is a hard error rather than silent acceptance of a torn write.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use fake::rand;
use std::collections::BTreeMap;
use std::io::{BufRead, Cursor, Write};
use std::path::Path;

#[derive(Debug)]
pub struct Index {
    path: Box<Path>,
    staged: BTreeMap<String, String>,
    removed: BTreeMap<String, String>,
    changed: bool,
}

impl Index {
    /// A fresh, empty index that has not touched disk yet.
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            staged: BTreeMap::new(),
            removed: BTreeMap::new(),
            changed: false,
        }
    }

    /// Load the index file, or start empty if it does not exist.
    pub fn rehydrate(path: Box<Path>) -> anyhow::Result<Self> {
        let mut index = Self::new(path);
        if !index.path.exists() {
            return Ok(index);
        }

        let raw = std::fs::read(&index.path)
            .with_context(|| format!("Unable to read index at {}", index.path.display()))?;

        let checksum_start = raw
            .windows(b"checksum ".len())
            .rposition(|window| window == b"checksum ")
            .context("Corrupt index: missing checksum")?;
        let (body, trailer) = raw.split_at(checksum_start);

        let recorded = std::str::from_utf8(trailer)?
            .trim_end()
            .strip_prefix("checksum ")
            .context("Corrupt index: malformed checksum line")?;
        let recorded = ObjectId::try_parse(recorded.to_string())?;
        if recorded != ObjectId::digest(body) {
            anyhow::bail!("Corrupt index: checksum mismatch");
        }

        let mut reader = Cursor::new(body);
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim_end_matches('\n');

            let (kind, rest) = line
                .split_once(' ')
                .context("Corrupt index: malformed stanza header")?;
            let (len, name) = rest
                .split_once(' ')
                .context("Corrupt index: malformed stanza header")?;
            let len: usize = len.parse()?;

            let mut content = vec![0u8; len];
            std::io::Read::read_exact(&mut reader, &mut content)?;
            let mut newline = [0u8; 1];
            std::io::Read::read_exact(&mut reader, &mut newline)?;
            let content = String::from_utf8(content)?;

            match kind {
                "staged" => index.staged.insert(name.to_string(), content),
                "removed" => index.removed.insert(name.to_string(), content),
                _ => anyhow::bail!("Corrupt index: unknown stanza {:?}", kind),
            };
        }

        Ok(index)
    }

    /// Persist the index if anything changed since load, writing through a
    /// temp file so a torn write never replaces a good index.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let mut body: Vec<u8> = Vec::new();
        for (name, content) in &self.staged {
            writeln!(body, "staged {} {}", content.len(), name)?;
            body.extend_from_slice(content.as_bytes());
            body.push(b'\n');
        }
        for (name, content) in &self.removed {
            writeln!(body, "removed {} {}", content.len(), name)?;
            body.extend_from_slice(content.as_bytes());
            body.push(b'\n');
        }
        writeln!(body, "checksum {}", ObjectId::digest(&body))?;

        let parent = self
            .path
            .parent()
            .with_context(|| format!("Invalid index path {}", self.path.display()))?;
        let temp_path = parent.join(format!("tmp-index-{}", rand::random::<u32>()));
        std::fs::write(&temp_path, &body)
            .with_context(|| format!("Unable to write index at {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Unable to rename index to {}", self.path.display()))?;

        self.changed = false;
        Ok(())
    }

    /// Stage `name` for addition, clearing any pending removal of it.
    pub fn stage(&mut self, name: &str, content: String) {
        self.removed.remove(name);
        self.staged.insert(name.to_string(), content);
        self.changed = true;
    }

    /// Drop `name` from the staged set. Returns whether it was staged.
    pub fn unstage(&mut self, name: &str) -> bool {
        let was_staged = self.staged.remove(name).is_some();
        if was_staged {
            self.changed = true;
        }
        was_staged
    }

    /// Mark `name` for removal, clearing any staged addition of it.
    pub fn mark_removed(&mut self, name: &str, content: String) {
        self.staged.remove(name);
        self.removed.insert(name.to_string(), content);
        self.changed = true;
    }

    /// Drop `name` from the removed set, returning its recorded content.
    pub fn take_removed(&mut self, name: &str) -> Option<String> {
        let content = self.removed.remove(name);
        if content.is_some() {
            self.changed = true;
        }
        content
    }

    pub fn clear(&mut self) {
        if !self.staged.is_empty() || !self.removed.is_empty() {
            self.changed = true;
        }
        self.staged.clear();
        self.removed.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty() && self.removed.is_empty()
    }

    pub fn is_staged(&self, name: &str) -> bool {
        self.staged.contains_key(name)
    }

    pub fn is_removed(&self, name: &str) -> bool {
        self.removed.contains_key(name)
    }

    /// Staged (name, content) pairs in sorted name order.
    pub fn staged(&self) -> impl Iterator<Item = (&str, &str)> {
        self.staged
            .iter()
            .map(|(name, content)| (name.as_str(), content.as_str()))
    }

    /// Removed (name, content) pairs in sorted name order.
    pub fn removed(&self) -> impl Iterator<Item = (&str, &str)> {
        self.removed
            .iter()
            .map(|(name, content)| (name.as_str(), content.as_str()))
    }
}
