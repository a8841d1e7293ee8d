//! Best common ancestor search for three-way merges
//!
//! The split point of a merge is the best common ancestor (BCA) of the two
//! branch tips: a common ancestor that is not itself an ancestor of any
//! other common ancestor. Walking a single parent chain is not enough once
//! merge commits give nodes two parents, so the search is a proper graph
//! traversal.
//!
//! Two phases:
//!
//! 1. Bidirectional traversal over the commit graph, processing commits in
//!    reverse chronological order from a priority queue, marking each as
//!    visited from the source side, the target side, or both. A commit seen
//!    from both sides is a common ancestor; its own ancestors are marked
//!    stale to prune the search.
//! 2. Redundancy filter: any common ancestor reachable from another common
//!    ancestor is discarded. Whatever survives is a best common ancestor.
//!
//! Criss-cross histories can leave more than one survivor; one is returned.
//! Git recurses to a virtual merge base in that case, which is out of scope
//! here.
//!
//! Debug logging of the traversal is compiled in with the `debug_merge`
//! feature flag.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;

macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(any(feature = "debug_merge"))]
        {
            eprintln!($($arg)*);
        }
    };
}

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b00;
        const VISITED_FROM_SOURCE = 0b01;
        const VISITED_FROM_TARGET = 0b10;
        const VISITED_FROM_BOTH = Self::VISITED_FROM_SOURCE.bits() | Self::VISITED_FROM_TARGET.bits();
        const STALE = 0b100; // ancestors of an already-found common ancestor
        const RESULT = 0b1000; // identified as a common ancestor
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::VISITED_FROM_SOURCE) {
            flags.push("SOURCE");
        }
        if self.contains(VisitState::VISITED_FROM_TARGET) {
            flags.push("TARGET");
        }
        if self.contains(VisitState::STALE) {
            flags.push("STALE");
        }
        if self.contains(VisitState::RESULT) {
            flags.push("RESULT");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Bidirectional traversal over the commit graph (phase 1).
///
/// Generic over the commit loader so the algorithm works against the loose
/// object store in production and an in-memory graph in tests.
#[derive(Debug, Clone)]
struct CommonAncestorsFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> SlimCommit,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> CommonAncestorsFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> SlimCommit,
{
    fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Returns every commit reachable from both sides, keyed by visit
    /// state, with stale entries already filtered out.
    fn find_common_ancestors(
        &self,
        source_commit_id: &ObjectId,
        target_commit_ids: HashSet<&ObjectId>,
    ) -> HashMap<ObjectId, VisitState> {
        if target_commit_ids.contains(source_commit_id) {
            // The source commit is itself a target, hence the common ancestor
            return HashMap::from([(source_commit_id.clone(), VisitState::RESULT)]);
        }

        let mut ancestors_states = HashMap::<ObjectId, VisitState>::new();
        let mut priority_queue = std::collections::BinaryHeap::new();

        // Seed both sides; the max heap pops newest commits first
        let source_commit = (self.commit_loader)(source_commit_id);
        ancestors_states.insert(source_commit.oid.clone(), VisitState::VISITED_FROM_SOURCE);
        priority_queue.push((source_commit.timestamp, source_commit.oid));

        for &target_commit_id in target_commit_ids.iter() {
            ancestors_states.insert(target_commit_id.clone(), VisitState::VISITED_FROM_TARGET);

            let target_commit = (self.commit_loader)(target_commit_id);
            priority_queue.push((target_commit.timestamp, target_commit.oid));
        }

        while let Some((_, commit_id)) = priority_queue.pop() {
            let current_state = ancestors_states
                .get(&commit_id)
                .copied()
                .unwrap_or(VisitState::NONE);

            debug_log!("Processing commit {}: state={}", &commit_id, current_state);

            if current_state.contains(VisitState::STALE) {
                continue;
            }

            let is_common_ancestor = if current_state.contains(VisitState::VISITED_FROM_BOTH) {
                ancestors_states
                    .entry(commit_id.clone())
                    .and_modify(|state| *state |= VisitState::RESULT);
                true
            } else {
                false
            };

            let current_commit = (self.commit_loader)(&commit_id);

            for parent_id in &current_commit.parents {
                let parent_commit = (self.commit_loader)(parent_id);
                let parent_state = ancestors_states
                    .get(parent_id)
                    .copied()
                    .unwrap_or(VisitState::NONE);

                // Parents inherit the visit state of the current commit
                let mut new_state = parent_state | current_state;
                if is_common_ancestor {
                    new_state |= VisitState::STALE;
                }

                // Re-queue only when this visit adds a new side
                if !parent_state.contains(current_state) {
                    ancestors_states.insert(parent_id.clone(), new_state);
                    priority_queue.push((parent_commit.timestamp, parent_id.clone()));
                }
            }
        }

        debug_log!(
            "Final ancestors states: {}",
            ancestors_states
                .iter()
                .map(|(oid, state)| format!("{}: {}", oid, state))
                .collect::<Vec<_>>()
                .join(", ")
        );

        ancestors_states
            .into_iter()
            .filter(|(_, state)| {
                !state.contains(VisitState::STALE) && state.contains(VisitState::RESULT)
            })
            .collect()
    }
}

/// Best common ancestor finder (phase 1 + phase 2).
pub struct BCAFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> SlimCommit,
{
    inner: CommonAncestorsFinder<CommitLoaderFn>,
}

impl<CommitLoaderFn> BCAFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> SlimCommit,
{
    /// `commit_loader` must return a parentless [`SlimCommit`] for root
    /// commits.
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self {
            inner: CommonAncestorsFinder::new(commit_loader),
        }
    }

    /// Finds a best common ancestor of the two commits.
    ///
    /// Returns `None` only when the commits share no history at all. When
    /// several best common ancestors exist (criss-cross merges), one of
    /// them is returned.
    pub fn find_best_common_ancestor(
        &self,
        source_commit_id: &ObjectId,
        target_commit_id: &ObjectId,
    ) -> Option<ObjectId> {
        let target_commit_ids = HashSet::from([target_commit_id]);
        let common_ancestors = self
            .inner
            .find_common_ancestors(source_commit_id, target_commit_ids)
            .into_keys()
            .collect::<HashSet<_>>();

        if common_ancestors.is_empty() {
            return None;
        }

        debug_log!(
            "Found common ancestors: {}",
            common_ancestors
                .iter()
                .map(|oid| oid.as_ref())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut redundant_ancestors = HashSet::<ObjectId>::new();
        for commit in &common_ancestors {
            debug_log!("Evaluating common ancestor {} for redundancy", commit);

            if redundant_ancestors.contains(commit) {
                continue;
            }

            let others = common_ancestors
                .iter()
                .filter(|other| *other != commit && !redundant_ancestors.contains(*other))
                .collect::<HashSet<_>>();
            let common_states = self.inner.find_common_ancestors(commit, others.clone());

            if common_states
                .get(commit)
                .unwrap_or(&VisitState::NONE)
                .contains(VisitState::VISITED_FROM_TARGET)
            {
                redundant_ancestors.insert(commit.clone());
            }

            for other in others {
                if common_states
                    .get(other)
                    .unwrap_or(&VisitState::NONE)
                    .contains(VisitState::VISITED_FROM_SOURCE)
                {
                    redundant_ancestors.insert(other.clone());
                }
            }
        }

        debug_log!(
            "Redundant ancestors: {}",
            redundant_ancestors
                .iter()
                .map(|oid| oid.as_ref())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let best_common_ancestors = common_ancestors
            .into_iter()
            .filter(|commit| !redundant_ancestors.contains(commit))
            .collect::<Vec<_>>();

        debug_log!(
            "Best common ancestors: {}",
            best_common_ancestors
                .iter()
                .map(|oid| oid.as_ref())
                .collect::<Vec<_>>()
                .join(", ")
        );

        best_common_ancestors.into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, TimeZone};
    use rstest::*;
    use std::collections::HashMap;

    /// In-memory commit graph standing in for the loose object store.
    #[derive(Debug, Clone, Default)]
    struct InMemoryCommitStore {
        commits: HashMap<ObjectId, SlimCommit>,
    }

    impl InMemoryCommitStore {
        fn new() -> Self {
            Self::default()
        }

        fn add_commit(&mut self, commit_id: ObjectId, parents: Vec<ObjectId>) {
            // Incrementally increasing timestamps keep the traversal order
            // deterministic: children are always newer than parents
            let timestamp_offset = self.commits.len() as i64 * 3600;
            let timestamp = FixedOffset::east_opt(0)
                .unwrap()
                .timestamp_opt(1_640_995_200 + timestamp_offset, 0)
                .unwrap();
            self.add_commit_with_timestamp(commit_id, parents, timestamp);
        }

        fn add_commit_with_timestamp(
            &mut self,
            commit_id: ObjectId,
            parents: Vec<ObjectId>,
            timestamp: DateTime<FixedOffset>,
        ) {
            self.commits.insert(
                commit_id.clone(),
                SlimCommit {
                    oid: commit_id,
                    parents,
                    timestamp,
                },
            );
        }

        fn get_slim_commit(&self, commit_id: &ObjectId) -> SlimCommit {
            self.commits
                .get(commit_id)
                .expect("Commit not found in test store")
                .clone()
        }
    }

    /// Deterministic 40-character hex id from a readable name.
    fn create_oid(id: &str) -> ObjectId {
        let mut hex_string = String::new();
        for byte in id.as_bytes().iter() {
            hex_string.push_str(&format!("{:02x}", byte));
        }
        while hex_string.len() < 40 {
            hex_string.push('0');
        }
        hex_string.truncate(40);

        ObjectId::try_parse(hex_string).expect("Invalid test ObjectId")
    }

    #[fixture]
    fn linear_history() -> (InMemoryCommitStore, Vec<ObjectId>) {
        // A <- B <- C <- D
        let mut store = InMemoryCommitStore::new();
        let a = create_oid("commit_a");
        let b = create_oid("commit_b");
        let c = create_oid("commit_c");
        let d = create_oid("commit_d");

        store.add_commit(a.clone(), vec![]);
        store.add_commit(b.clone(), vec![a.clone()]);
        store.add_commit(c.clone(), vec![b.clone()]);
        store.add_commit(d.clone(), vec![c.clone()]);

        (store, vec![a, b, c, d])
    }

    #[fixture]
    fn forked_history() -> (InMemoryCommitStore, Vec<ObjectId>) {
        //     A
        //    / \
        //   B   C
        //   |   |
        //   D   E
        let mut store = InMemoryCommitStore::new();
        let a = create_oid("commit_a");
        let b = create_oid("commit_b");
        let c = create_oid("commit_c");
        let d = create_oid("commit_d");
        let e = create_oid("commit_e");

        store.add_commit(a.clone(), vec![]);
        store.add_commit(b.clone(), vec![a.clone()]);
        store.add_commit(c.clone(), vec![a.clone()]);
        store.add_commit(d.clone(), vec![b.clone()]);
        store.add_commit(e.clone(), vec![c.clone()]);

        (store, vec![a, b, c, d, e])
    }

    #[fixture]
    fn merged_history() -> (InMemoryCommitStore, Vec<ObjectId>) {
        //     A
        //    / \
        //   B   C
        //    \ / \
        //     M   E
        let mut store = InMemoryCommitStore::new();
        let a = create_oid("commit_a");
        let b = create_oid("commit_b");
        let c = create_oid("commit_c");
        let m = create_oid("commit_m");
        let e = create_oid("commit_e");

        store.add_commit(a.clone(), vec![]);
        store.add_commit(b.clone(), vec![a.clone()]);
        store.add_commit(c.clone(), vec![a.clone()]);
        store.add_commit(m.clone(), vec![b.clone(), c.clone()]);
        store.add_commit(e.clone(), vec![c.clone()]);

        (store, vec![a, b, c, m, e])
    }

    #[fixture]
    fn criss_cross_history() -> (InMemoryCommitStore, Vec<ObjectId>) {
        //     A
        //    / \
        //   B   C
        //   |\ /|
        //   | X |
        //   |/ \|
        //   D   E
        let mut store = InMemoryCommitStore::new();
        let a = create_oid("commit_a");
        let b = create_oid("commit_b");
        let c = create_oid("commit_c");
        let d = create_oid("commit_d");
        let e = create_oid("commit_e");

        store.add_commit(a.clone(), vec![]);
        store.add_commit(b.clone(), vec![a.clone()]);
        store.add_commit(c.clone(), vec![a.clone()]);
        store.add_commit(d.clone(), vec![b.clone(), c.clone()]);
        store.add_commit(e.clone(), vec![c.clone(), b.clone()]);

        (store, vec![a, b, c, d, e])
    }

    #[rstest]
    fn ancestor_of_the_other_commit_is_the_bca(linear_history: (InMemoryCommitStore, Vec<ObjectId>)) {
        let (store, ids) = linear_history;
        let [_, b, _, d] = [&ids[0], &ids[1], &ids[2], &ids[3]];

        let finder = BCAFinder::new(|oid: &ObjectId| store.get_slim_commit(oid));

        assert_eq!(finder.find_best_common_ancestor(b, d), Some(b.clone()));
        assert_eq!(finder.find_best_common_ancestor(d, b), Some(b.clone()));
    }

    #[rstest]
    fn fork_point_is_the_bca_of_two_branches(forked_history: (InMemoryCommitStore, Vec<ObjectId>)) {
        let (store, ids) = forked_history;
        let a = &ids[0];
        let d = &ids[3];
        let e = &ids[4];

        let finder = BCAFinder::new(|oid: &ObjectId| store.get_slim_commit(oid));

        assert_eq!(finder.find_best_common_ancestor(d, e), Some(a.clone()));
    }

    #[rstest]
    fn merge_commit_sees_through_both_parents(merged_history: (InMemoryCommitStore, Vec<ObjectId>)) {
        let (store, ids) = merged_history;
        let c = &ids[2];
        let m = &ids[3];
        let e = &ids[4];

        let finder = BCAFinder::new(|oid: &ObjectId| store.get_slim_commit(oid));

        // M reaches C through its merge parent, so the fork point A is
        // redundant and C itself is the split point
        assert_eq!(finder.find_best_common_ancestor(m, e), Some(c.clone()));
    }

    #[rstest]
    fn criss_cross_returns_one_of_the_tied_ancestors(
        criss_cross_history: (InMemoryCommitStore, Vec<ObjectId>),
    ) {
        let (store, ids) = criss_cross_history;
        let b = &ids[1];
        let c = &ids[2];
        let d = &ids[3];
        let e = &ids[4];

        let finder = BCAFinder::new(|oid: &ObjectId| store.get_slim_commit(oid));

        let bca = finder.find_best_common_ancestor(d, e);
        assert!(
            bca == Some(b.clone()) || bca == Some(c.clone()),
            "expected B or C, got {:?}",
            bca
        );
    }

    #[rstest]
    fn disjoint_roots_have_no_common_ancestor() {
        let mut store = InMemoryCommitStore::new();
        let a = create_oid("commit_a");
        let b = create_oid("commit_b");
        store.add_commit(a.clone(), vec![]);
        store.add_commit(b.clone(), vec![]);

        let finder = BCAFinder::new(|oid: &ObjectId| store.get_slim_commit(oid));

        assert_eq!(finder.find_best_common_ancestor(&a, &b), None);
    }

    #[rstest]
    fn a_commit_is_its_own_bca() {
        let mut store = InMemoryCommitStore::new();
        let a = create_oid("commit_a");
        store.add_commit(a.clone(), vec![]);

        let finder = BCAFinder::new(|oid: &ObjectId| store.get_slim_commit(oid));

        assert_eq!(finder.find_best_common_ancestor(&a, &a), Some(a.clone()));
    }
}
