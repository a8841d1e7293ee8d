use crate::areas::repository::Repository;
use crate::artifacts::core::CommandError;
use crate::artifacts::objects::commit::CommitBuilder;

impl Repository {
    /// Record the pending index entries as a new commit on the current
    /// branch.
    pub fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        if message.trim().is_empty() {
            return Err(CommandError::EmptyMessage.into());
        }
        if self.index().is_empty() {
            return Err(CommandError::NothingToCommit.into());
        }

        let head = self.head_commit()?;
        let commit = {
            let index = self.index();
            let mut builder = CommitBuilder::from_parent(&head, message);
            builder.apply_staged(&index);
            builder.apply_removed(&index);
            builder.finalize()
        };

        self.database().store_commit(&commit)?;
        self.refs().update_head(commit.id())?;

        let mut index = self.index();
        index.clear();
        index.write_updates()
    }
}
