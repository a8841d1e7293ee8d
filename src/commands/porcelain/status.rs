use crate::areas::repository::Repository;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Print the repository status: branches, staged and removed files,
    /// and untracked working-tree files.
    ///
    /// The "Modifications Not Staged For Commit" section is a permanently
    /// empty placeholder kept for output-shape compatibility.
    pub fn status(&mut self) -> anyhow::Result<()> {
        let current_branch = self.refs().current_branch()?;
        let branches = self.refs().list_branches()?;
        let head = self.head_commit()?;

        let (staged, removed) = {
            let index = self.index();
            let staged: Vec<String> = index.staged().map(|(name, _)| name.to_string()).collect();
            let removed: Vec<String> = index.removed().map(|(name, _)| name.to_string()).collect();
            (staged, removed)
        };

        let untracked: Vec<String> = self
            .workspace()
            .list_files()?
            .into_iter()
            .filter(|name| !head.tracks(name) && !staged.contains(name))
            .collect();

        let mut writer = self.writer();

        writeln!(writer, "=== Branches ===")?;
        for branch in &branches {
            if branch == &current_branch {
                writeln!(writer, "{}", format!("*{}", branch).green())?;
            } else {
                writeln!(writer, "{}", branch)?;
            }
        }
        writeln!(writer)?;

        writeln!(writer, "=== Staged Files ===")?;
        for name in &staged {
            writeln!(writer, "{}", name)?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Removed Files ===")?;
        for name in &removed {
            writeln!(writer, "{}", name)?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Modifications Not Staged For Commit ===")?;
        writeln!(writer)?;

        writeln!(writer, "=== Untracked Files ===")?;
        for name in &untracked {
            writeln!(writer, "{}", name)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
