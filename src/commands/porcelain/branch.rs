use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::CommandError;

impl Repository {
    /// Create a branch pointing at the current head commit. The branch is
    /// not checked out.
    pub fn branch(&mut self, name: &str) -> anyhow::Result<()> {
        let branch_name =
            BranchName::try_parse(name).map_err(|_| CommandError::InvalidBranchName)?;

        if self.refs().branch_exists(name) {
            return Err(CommandError::BranchExists.into());
        }

        let head = self.head_commit()?;
        self.refs().create_branch(&branch_name, head.id())
    }

    /// Delete a branch pointer. The commits it pointed at stay in the
    /// store.
    pub fn remove_branch(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.refs().branch_exists(name) {
            return Err(CommandError::NoSuchBranch.into());
        }
        if name == self.refs().current_branch()? {
            return Err(CommandError::CannotRemoveCurrent.into());
        }

        self.refs().delete_branch(name)
    }
}
