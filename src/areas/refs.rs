//! Branch pointers and HEAD
//!
//! Branches are files under `.vcs/refs/heads/` holding a 40-character
//! commit id. `HEAD` is always symbolic, `ref: refs/heads/<branch>`;
//! detached heads do not exist here, so moving the head always moves the
//! current branch's pointer with it.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use fake::rand;
use std::path::Path;
use walkdir::WalkDir;

const SYMREF_REGEX: &str = r"^ref: refs/heads/(.+)$";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (`.vcs`)
    path: Box<Path>,
}

impl Refs {
    /// Point `HEAD` at `branch` without touching the branch file.
    pub fn set_head(&self, branch: &str) -> anyhow::Result<()> {
        self.update_ref_file(&self.head_path(), &format!("ref: refs/heads/{}", branch))
    }

    /// The branch `HEAD` names.
    pub fn current_branch(&self) -> anyhow::Result<String> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {}", head_path.display()))?;
        let content = content.trim();

        let captures = regex::Regex::new(SYMREF_REGEX)?
            .captures(content)
            .with_context(|| format!("HEAD is not a symbolic ref: {:?}", content))?;
        Ok(captures[1].to_string())
    }

    /// The commit id of the current branch's tip, `None` before the first
    /// pointer write.
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_branch(&self.current_branch()?)
    }

    /// Move the current branch's pointer to `oid`, through the `HEAD`
    /// symref.
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        let branch = self.current_branch()?;
        self.update_ref_file(&self.heads_path().join(&branch), oid.as_ref())
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        self.heads_path().join(name).is_file()
    }

    pub fn create_branch(&self, name: &BranchName, source_oid: &ObjectId) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(name.as_ref());

        if branch_path.exists() {
            anyhow::bail!("branch {} already exists", name);
        }

        self.update_ref_file(&branch_path, source_oid.as_ref())
    }

    pub fn delete_branch(&self, name: &str) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(name);
        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))
    }

    pub fn read_branch(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.heads_path().join(name);
        if !branch_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("failed to read ref file at {:?}", branch_path))?;
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(ObjectId::try_parse(content.to_string())?))
    }

    /// All branch names in sorted order.
    pub fn list_branches(&self) -> anyhow::Result<Vec<String>> {
        let heads_path = self.heads_path();
        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                if entry.path().is_file() {
                    let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                    Some(relative_path.to_string_lossy().to_string())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();

        branches.sort();
        Ok(branches)
    }

    fn update_ref_file(&self, path: &Path, raw_ref: &str) -> anyhow::Result<()> {
        let parent = path.parent().with_context(|| {
            format!("failed to resolve parent directory for ref file at {:?}", path)
        })?;
        std::fs::create_dir_all(parent)?;

        // write through a temp file so a crash never leaves a torn ref
        let temp_path = parent.join(format!("tmp-ref-{}", rand::random::<u32>()));
        std::fs::write(&temp_path, raw_ref)
            .with_context(|| format!("failed to write ref file at {:?}", temp_path))?;
        std::fs::rename(&temp_path, path)
            .with_context(|| format!("failed to rename ref file to {:?}", path))?;

        Ok(())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join("HEAD").into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}
