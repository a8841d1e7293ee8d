use crate::areas::repository::Repository;

impl Repository {
    /// Move the current branch's pointer to an arbitrary commit and
    /// reshape the working tree to match it.
    ///
    /// Only the pointer moves; the checked-out branch itself does not
    /// change.
    pub fn reset(&mut self, commit_ref: &str) -> anyhow::Result<()> {
        let target = self.resolve_commit_ref(commit_ref)?;

        self.assert_no_untracked_conflict(&target)?;
        self.migrate_to(&target)?;
        self.refs().update_head(target.id())
    }
}
