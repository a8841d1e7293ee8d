use crate::areas::repository::Repository;
use crate::artifacts::core::CommandError;
use crate::artifacts::objects::blob::Blob;

impl Repository {
    /// Stage a working-tree file for the next commit.
    ///
    /// Adding always cancels a pending removal of the same name first.
    /// If the file's content hash matches what the head commit already
    /// tracks, there is nothing to record and any staged copy is dropped.
    pub fn add(&mut self, path: &str) -> anyhow::Result<()> {
        if !self.workspace().file_exists(path) {
            return Err(CommandError::NotFound.into());
        }

        let content = self.workspace().read_file(path)?;
        let head = self.head_commit()?;

        let mut index = self.index();
        index.take_removed(path);

        if head.blob_oid(path) == Some(&Blob::hash(path, &content)) {
            index.unstage(path);
        } else {
            index.stage(path, content);
        }

        index.write_updates()
    }
}
