//! Command-level failure conditions and merge outcomes
//!
//! Every reportable failure of a porcelain command maps to exactly one
//! [`CommandError`] variant; the `Display` text is the user-facing message,
//! verbatim. Internal errors (I/O, corrupt objects) stay on the plain
//! `anyhow` path instead.

/// Reportable failure of a porcelain command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// `add`/`rm` named a file absent from the worktree and the index.
    NotFound,
    /// `commit` called with a blank message.
    EmptyMessage,
    /// `commit`/`merge` found the index empty.
    NothingToCommit,
    /// `rm` named a file neither staged nor tracked by the head commit.
    NothingToRemove,
    /// A commit reference resolved to no stored commit.
    NoSuchCommit,
    /// A commit id prefix matched more than one stored commit.
    AmbiguousCommitRef,
    /// A branch operation named a branch that does not exist.
    NoSuchBranch,
    /// `branch` named a branch that already exists.
    BranchExists,
    /// `rm-branch` named the checked-out branch.
    CannotRemoveCurrent,
    /// `checkout` named the branch already checked out.
    SameBranch,
    /// `merge` named the current branch.
    SelfMerge,
    /// `merge` refused to run with staged or removed entries pending.
    UncommittedChanges,
    /// `checkout`/`reset`/`merge` would overwrite an untracked file.
    UntrackedFileConflict,
    /// `checkout -p` named a file the target commit does not track.
    FileNotInCommit,
    /// `branch` was given a name the ref format rejects.
    InvalidBranchName,
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            CommandError::NotFound => "File does not exist.",
            CommandError::EmptyMessage => "Please enter a commit message.",
            CommandError::NothingToCommit => "No changes added to the commit.",
            CommandError::NothingToRemove => "No reason to remove the file.",
            CommandError::NoSuchCommit => "No commit with that id exists.",
            CommandError::AmbiguousCommitRef => "Ambiguous commit id prefix.",
            CommandError::NoSuchBranch => "A branch with that name does not exist.",
            CommandError::BranchExists => "A branch with that name already exists.",
            CommandError::CannotRemoveCurrent => "Cannot remove the current branch.",
            CommandError::SameBranch => "No need to checkout the current branch.",
            CommandError::SelfMerge => "Cannot merge a branch with itself.",
            CommandError::UncommittedChanges => "You have uncommitted changes.",
            CommandError::UntrackedFileConflict => {
                "There is an untracked file in the way; delete it, or add and commit it first."
            }
            CommandError::FileNotInCommit => "File does not exist in that commit.",
            CommandError::InvalidBranchName => "Invalid branch name.",
        };
        write!(f, "{}", message)
    }
}

impl std::error::Error for CommandError {}

/// How a merge concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The target tip was already reachable from the head; nothing to do.
    AlreadyMerged,
    /// The head was an ancestor of the target; the branch pointer moved,
    /// no commit was created.
    FastForwarded,
    /// A merge commit was created with no conflicting files.
    Merged,
    /// A merge commit was created and at least one file carries conflict
    /// markers.
    MergedWithConflict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_user_facing_messages() {
        assert_eq!(CommandError::NotFound.to_string(), "File does not exist.");
        assert_eq!(
            CommandError::NothingToCommit.to_string(),
            "No changes added to the commit."
        );
        assert_eq!(
            CommandError::SameBranch.to_string(),
            "No need to checkout the current branch."
        );
    }
}
