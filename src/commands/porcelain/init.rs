use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::CommitBuilder;
use anyhow::Context;
use std::fs;

pub const DEFAULT_BRANCH: &str = "master";
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

impl Repository {
    /// Create the metadata layout and the shared root commit.
    ///
    /// Every repository starts from the same root commit (empty tree,
    /// epoch timestamp), so unrelated repositories still share one common
    /// ancestor.
    pub fn init(&mut self) -> anyhow::Result<()> {
        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create refs/heads directory")?;

        let root = CommitBuilder::root(INITIAL_COMMIT_MESSAGE).finalize();
        self.database().store_commit(&root)?;

        self.refs()
            .set_head(DEFAULT_BRANCH)
            .context("Failed to create initial HEAD reference")?;
        self.refs().update_head(root.id())?;

        Ok(())
    }
}
