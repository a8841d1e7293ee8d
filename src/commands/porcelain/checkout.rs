use crate::areas::repository::Repository;
use crate::artifacts::core::CommandError;
use crate::artifacts::objects::commit::Commit;
use anyhow::Context;

impl Repository {
    /// Restore one file from the head commit.
    pub fn checkout_file(&mut self, path: &str) -> anyhow::Result<()> {
        let head = self.head_commit()?;
        self.checkout_file_from(&head, path)
    }

    /// Restore one file from an arbitrary commit.
    pub fn checkout_commit_file(&mut self, commit_ref: &str, path: &str) -> anyhow::Result<()> {
        let commit = self.resolve_commit_ref(commit_ref)?;
        self.checkout_file_from(&commit, path)
    }

    /// Switch to another branch, replacing the working tree with its tip
    /// commit's tracked files and clearing the index.
    pub fn checkout_branch(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.refs().branch_exists(name) {
            return Err(CommandError::NoSuchBranch.into());
        }
        if name == self.refs().current_branch()? {
            return Err(CommandError::SameBranch.into());
        }

        let target_oid = self
            .refs()
            .read_branch(name)?
            .with_context(|| format!("branch {} has no commit", name))?;
        let target = self.database().load_commit(&target_oid)?;

        self.assert_no_untracked_conflict(&target)?;
        self.migrate_to(&target)?;
        self.refs().set_head(name)
    }

    fn checkout_file_from(&mut self, commit: &Commit, path: &str) -> anyhow::Result<()> {
        let content = commit
            .content(path)
            .ok_or(CommandError::FileNotInCommit)?;
        self.workspace().write_file(path, content)
    }

    /// Refuse to overwrite a working-tree file the head commit does not
    /// track but the target commit does.
    pub(crate) fn assert_no_untracked_conflict(&self, target: &Commit) -> anyhow::Result<()> {
        let head = self.head_commit()?;

        for name in self.workspace().list_files()? {
            if target.tracks(&name) && !head.tracks(&name) {
                return Err(CommandError::UntrackedFileConflict.into());
            }
        }

        Ok(())
    }

    /// Reshape the working tree to the target commit's tracked set and
    /// clear the index. The untracked-conflict guard must have passed.
    pub(crate) fn migrate_to(&mut self, target: &Commit) -> anyhow::Result<()> {
        let head = self.head_commit()?;

        for (name, blob) in target.blobs() {
            self.workspace().write_file(name, blob.content())?;
        }
        for name in head.file_names() {
            if !target.tracks(name) {
                self.workspace().delete_file(name)?;
            }
        }

        let mut index = self.index();
        index.clear();
        index.write_updates()
    }
}
