use crate::areas::repository::Repository;
use crate::artifacts::core::CommandError;

impl Repository {
    /// Unstage a file, or mark a tracked file for removal and delete it
    /// from the working tree.
    pub fn remove(&mut self, path: &str) -> anyhow::Result<()> {
        let head = self.head_commit()?;
        let mut index = self.index();

        let was_staged = index.unstage(path);

        if head.tracks(path) {
            let content = head
                .content(path)
                .unwrap_or_default()
                .to_string();
            index.mark_removed(path, content);
            drop(index);

            self.workspace().delete_file(path)?;
            return self.index().write_updates();
        }

        if !was_staged {
            return Err(CommandError::NothingToRemove.into());
        }

        index.write_updates()
    }
}
