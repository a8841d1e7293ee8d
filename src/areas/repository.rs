use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::CommandError;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::Path;

/// Name of the metadata directory at the repository root.
pub const VCS_DIR: &str = ".vcs";

/// Shortest commit id prefix `resolve_commit_ref` accepts.
pub const MIN_PREFIX_LENGTH: usize = 7;

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path).canonicalize()?;

        let index = Index::rehydrate(path.join(VCS_DIR).join("index").into_boxed_path())?;
        let database = Database::new(path.join(VCS_DIR).join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(path.join(VCS_DIR).into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn is_initialized(&self) -> bool {
        self.path.join(VCS_DIR).is_dir()
    }

    /// The commit the current branch points at.
    pub fn head_commit(&self) -> anyhow::Result<Commit> {
        let head_oid = self
            .refs
            .read_head()?
            .context("HEAD points at no commit; repository metadata is corrupt")?;
        self.database.load_commit(&head_oid)
    }

    /// Resolve a user-supplied commit reference, full or abbreviated.
    ///
    /// Full 40-character ids load directly. Abbreviations need at least
    /// seven characters and must match exactly one stored commit;
    /// anything shorter, unmatched, or ambiguous reports a
    /// [`CommandError`].
    pub fn resolve_commit_ref(&self, commit_ref: &str) -> anyhow::Result<Commit> {
        if commit_ref.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(commit_ref.to_string())
                .map_err(|_| CommandError::NoSuchCommit)?;
            if !self.database.contains(&oid) {
                return Err(CommandError::NoSuchCommit.into());
            }
            return self.database.load_commit(&oid);
        }

        if commit_ref.len() < MIN_PREFIX_LENGTH
            || !commit_ref.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(CommandError::NoSuchCommit.into());
        }

        let oid = self.database.find_by_prefix(commit_ref)?;
        self.database.load_commit(&oid)
    }
}
