//! The working tree
//!
//! The working tree is flat: only plain files directly in the repository
//! root are eligible for tracking. Subdirectories and the `.vcs` metadata
//! directory are ignored.

use anyhow::Context;
use std::path::{Path, PathBuf};

use crate::areas::repository::VCS_DIR;

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn root(&self) -> &Path {
        &self.path
    }

    /// Sorted names of the plain files in the working tree.
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        let mut files = Vec::new();

        for entry in std::fs::read_dir(&self.path)
            .with_context(|| format!("Unable to read working tree at {}", self.path.display()))?
        {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();

            if name == VCS_DIR {
                continue;
            }
            if entry.file_type()?.is_file() {
                files.push(name);
            }
        }

        files.sort();
        Ok(files)
    }

    pub fn file_exists(&self, name: &str) -> bool {
        self.file_path(name).is_file()
    }

    pub fn read_file(&self, name: &str) -> anyhow::Result<String> {
        std::fs::read_to_string(self.file_path(name))
            .with_context(|| format!("Unable to read file {}", name))
    }

    pub fn write_file(&self, name: &str, content: &str) -> anyhow::Result<()> {
        std::fs::write(self.file_path(name), content)
            .with_context(|| format!("Unable to write file {}", name))
    }

    pub fn delete_file(&self, name: &str) -> anyhow::Result<()> {
        let path = self.file_path(name);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Unable to delete file {}", name))?;
        }
        Ok(())
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}
