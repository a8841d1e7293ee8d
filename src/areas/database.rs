//! The loose object store
//!
//! Commits live under `.vcs/objects/<first-2>/<remaining-38>`, zlib
//! compressed. Writes go through a temp file in the same directory and a
//! rename, so a reader never sees a half-written object. The store is
//! append-only: an object, once written, is never modified.

use crate::artifacts::core::CommandError;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
    cache: RefCell<HashMap<ObjectId, Commit>>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database {
            path,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn store_commit(&self, commit: &Commit) -> anyhow::Result<()> {
        let object_path = self.path.join(commit.id().to_path());

        // append-only store, an existing object is already this content
        if !object_path.exists() {
            std::fs::create_dir_all(object_path.parent().context(format!(
                "Invalid object path {}",
                object_path.display()
            ))?)
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, commit.serialize()?)?;
        }

        self.cache
            .borrow_mut()
            .insert(commit.id().clone(), commit.clone());
        Ok(())
    }

    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        if let Some(commit) = self.cache.borrow().get(object_id) {
            return Ok(commit.clone());
        }

        let object_path = self.path.join(object_id.to_path());
        let object_content = self.read_object(object_path)?;
        let commit = Commit::deserialize(Cursor::new(object_content))?;

        if commit.id() != object_id {
            anyhow::bail!(
                "Corrupt object store: {} deserialized with id {}",
                object_id,
                commit.id()
            );
        }

        self.cache
            .borrow_mut()
            .insert(object_id.clone(), commit.clone());
        Ok(commit)
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.cache.borrow().contains_key(object_id)
            || self.path.join(object_id.to_path()).exists()
    }

    /// Parent linkage and timestamp only, for graph traversals.
    pub fn slim_commit(&self, object_id: &ObjectId) -> anyhow::Result<SlimCommit> {
        let commit = self.load_commit(object_id)?;
        Ok(SlimCommit {
            oid: commit.id().clone(),
            parents: commit.parents(),
            timestamp: commit.timestamp(),
        })
    }

    /// Every commit id in the store, in unspecified order.
    pub fn all_commit_ids(&self) -> anyhow::Result<Vec<ObjectId>> {
        let mut ids = Vec::new();

        if !self.path.exists() {
            return Ok(ids);
        }

        for dir_entry in std::fs::read_dir(&self.path)? {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_dir() {
                continue;
            }
            let dir_name = dir_entry.file_name().to_string_lossy().to_string();

            for file_entry in std::fs::read_dir(dir_entry.path())? {
                let file_entry = file_entry?;
                let file_name = file_entry.file_name().to_string_lossy().to_string();

                if let Ok(oid) = ObjectId::try_parse(format!("{}{}", dir_name, file_name)) {
                    ids.push(oid);
                }
            }
        }

        Ok(ids)
    }

    /// Resolve an abbreviated commit id to its unique full form.
    ///
    /// The prefix must be at least two characters so the fan-out directory
    /// is known; shorter prefixes resolve to nothing.
    pub fn find_by_prefix(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        let mut matches = Vec::new();

        if prefix.len() >= 2 {
            let dir_name = &prefix[..2];
            let file_prefix = &prefix[2..];
            let dir_path = self.path.join(dir_name);

            if dir_path.is_dir() {
                for entry in std::fs::read_dir(&dir_path)? {
                    let entry = entry?;
                    let file_name = entry.file_name();
                    let file_name_str = file_name.to_string_lossy();

                    if file_name_str.starts_with(file_prefix) {
                        let full_oid = format!("{}{}", dir_name, file_name_str);
                        if let Ok(oid) = ObjectId::try_parse(full_oid) {
                            matches.push(oid);
                        }
                    }
                }
            }
        }

        match matches.len() {
            0 => Err(CommandError::NoSuchCommit.into()),
            1 => Ok(matches.remove(0)),
            _ => Err(CommandError::AmbiguousCommitRef.into()),
        }
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file onto the object path to make the write atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
