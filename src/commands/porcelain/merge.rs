use crate::areas::repository::Repository;
use crate::artifacts::core::{CommandError, MergeOutcome};
use crate::artifacts::merge::bca_finder::BCAFinder;
use crate::artifacts::merge::reconcile::{Resolution, classify, conflict_markers};
use crate::artifacts::objects::commit::CommitBuilder;
use anyhow::Context;
use std::collections::BTreeSet;
use std::io::Write;

impl Repository {
    /// Merge another branch into the current one.
    ///
    /// The split point is the best common ancestor of the two tips. Each
    /// file in the union of the three tracked sets is reconciled by
    /// content hash; conflicting files get marker text and are staged
    /// like any other change. Unless the merge short-circuits as already
    /// merged or a fast-forward, a two-parent commit records the result.
    pub fn merge(&mut self, branch: &str) -> anyhow::Result<MergeOutcome> {
        if !self.index().is_empty() {
            return Err(CommandError::UncommittedChanges.into());
        }
        if !self.refs().branch_exists(branch) {
            return Err(CommandError::NoSuchBranch.into());
        }
        let current_branch = self.refs().current_branch()?;
        if branch == current_branch {
            return Err(CommandError::SelfMerge.into());
        }

        let target_oid = self
            .refs()
            .read_branch(branch)?
            .with_context(|| format!("branch {} has no commit", branch))?;
        let target = self.database().load_commit(&target_oid)?;
        let head = self.head_commit()?;

        self.assert_no_untracked_conflict(&target)?;

        let base_oid = {
            let database = self.database();
            let finder = BCAFinder::new(|oid| {
                database.slim_commit(oid).expect("Failed to load commit")
            });
            finder
                .find_best_common_ancestor(head.id(), target.id())
                .context("no common ancestor found between the branch tips")?
        };

        if &base_oid == target.id() {
            writeln!(
                self.writer(),
                "Given branch is an ancestor of the current branch."
            )?;
            return Ok(MergeOutcome::AlreadyMerged);
        }
        if &base_oid == head.id() {
            self.refs().update_head(target.id())?;
            writeln!(self.writer(), "Current branch fast-forwarded.")?;
            return Ok(MergeOutcome::FastForwarded);
        }

        let base = self.database().load_commit(&base_oid)?;

        let file_names: BTreeSet<&str> = base
            .file_names()
            .chain(head.file_names())
            .chain(target.file_names())
            .collect();

        let mut conflicted = false;
        for name in file_names {
            let resolution = classify(
                base.blob_oid(name),
                head.blob_oid(name),
                target.blob_oid(name),
            );

            match resolution {
                Resolution::Keep => {}
                Resolution::TakeTarget => {
                    let content = target
                        .content(name)
                        .context("target commit lost a tracked blob")?;
                    self.workspace().write_file(name, content)?;
                    self.index().stage(name, content.to_string());
                }
                Resolution::Remove => {
                    let content = head.content(name).unwrap_or_default().to_string();
                    self.workspace().delete_file(name)?;
                    self.index().mark_removed(name, content);
                }
                Resolution::Conflict => {
                    let merged = conflict_markers(head.content(name), target.content(name));
                    self.workspace().write_file(name, &merged)?;
                    self.index().stage(name, merged);
                    conflicted = true;
                }
            }
        }

        if self.index().is_empty() {
            return Err(CommandError::NothingToCommit.into());
        }

        let commit = {
            let index = self.index();
            let message = format!("Merged {} into {}.", branch, current_branch);
            let mut builder = CommitBuilder::merge(&head, &target, &message);
            builder.apply_staged(&index);
            builder.apply_removed(&index);
            builder.finalize()
        };

        self.database().store_commit(&commit)?;
        self.refs().update_head(commit.id())?;

        let mut index = self.index();
        index.clear();
        index.write_updates()?;
        drop(index);

        if conflicted {
            writeln!(self.writer(), "Encountered a merge conflict.")?;
            Ok(MergeOutcome::MergedWithConflict)
        } else {
            Ok(MergeOutcome::Merged)
        }
    }
}
