//! Per-file three-way reconciliation
//!
//! Given the blob hash a file carries in the split point (base), the head
//! commit (ours), and the target branch tip (theirs), `classify` decides
//! what the merged tree does with it. Absence is a first-class state, so
//! every decision is over `Option`s.

use crate::artifacts::objects::object_id::ObjectId;

/// What the merge does with one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The head version stands; nothing to stage.
    Keep,
    /// The target version wins; write and stage it.
    TakeTarget,
    /// The file leaves the merged tree; remove and mark removed.
    Remove,
    /// Both sides changed it differently; write conflict markers and stage.
    Conflict,
}

/// Three-way decision table over blob hashes.
///
/// Changed-ness is judged per side against the base: a side "changed" the
/// file if its hash differs from the base's (absence counts as a change).
/// Only one case resolves in the target's favor without conflict: the
/// target changed it and the head did not.
pub fn classify(
    base: Option<&ObjectId>,
    ours: Option<&ObjectId>,
    theirs: Option<&ObjectId>,
) -> Resolution {
    if ours == theirs {
        // Same content or same absence on both sides; nothing to decide
        return Resolution::Keep;
    }

    let we_changed = ours != base;
    let they_changed = theirs != base;

    match (we_changed, they_changed) {
        (false, true) => match theirs {
            Some(_) => Resolution::TakeTarget,
            None => Resolution::Remove,
        },
        (true, false) => Resolution::Keep,
        (true, true) => Resolution::Conflict,
        // ours == base == theirs contradicts ours != theirs
        (false, false) => Resolution::Keep,
    }
}

/// Conflict marker text for a file both sides changed. An absent side
/// contributes an empty section.
pub fn conflict_markers(ours: Option<&str>, theirs: Option<&str>) -> String {
    let ours = ours.unwrap_or_default();
    let theirs = theirs.unwrap_or_default();
    format!("<<<<<<< HEAD\n{ours}=======\n{theirs}>>>>>>>")
}
