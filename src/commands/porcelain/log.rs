use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use std::io::Write;

impl Repository {
    /// Print the first-parent history of the current branch, newest
    /// first. Merge commits show both parents abbreviated; the merge
    /// parent's own history is not followed.
    pub fn log(&mut self) -> anyhow::Result<()> {
        let mut cursor = Some(self.head_commit()?);
        let mut first = true;

        while let Some(commit) = cursor {
            self.print_log_entry(&commit, first)?;
            first = false;

            cursor = match commit.parent() {
                Some(parent) => Some(self.database().load_commit(parent)?),
                None => None,
            };
        }

        Ok(())
    }

    /// Print every commit in the store, in no particular order.
    pub fn global_log(&mut self) -> anyhow::Result<()> {
        let mut first = true;

        for oid in self.database().all_commit_ids()? {
            let commit = self.database().load_commit(&oid)?;
            self.print_log_entry(&commit, first)?;
            first = false;
        }

        Ok(())
    }

    fn print_log_entry(&self, commit: &Commit, first: bool) -> anyhow::Result<()> {
        let mut writer = self.writer();

        if !first {
            writeln!(writer)?;
        }
        writeln!(writer, "===")?;
        writeln!(writer, "commit {}", commit.id())?;
        if let (Some(parent), Some(merge_parent)) = (commit.parent(), commit.merge_parent()) {
            writeln!(
                writer,
                "Merge: {} {}",
                parent.to_short_oid(),
                merge_parent.to_short_oid()
            )?;
        }
        writeln!(writer, "Date: {}", commit.readable_timestamp())?;
        writeln!(writer, "{}", commit.message())?;

        Ok(())
    }
}
