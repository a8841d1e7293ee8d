use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// Print the ids of every commit whose message matches exactly.
    ///
    /// Finding nothing is reported on the same output stream, not as a
    /// failure.
    pub fn find(&mut self, message: &str) -> anyhow::Result<()> {
        let mut found = false;

        for oid in self.database().all_commit_ids()? {
            let commit = self.database().load_commit(&oid)?;
            if commit.message() == message {
                writeln!(self.writer(), "{}", commit.id())?;
                found = true;
            }
        }

        if !found {
            writeln!(self.writer(), "Found no commit with that message.")?;
        }

        Ok(())
    }
}
