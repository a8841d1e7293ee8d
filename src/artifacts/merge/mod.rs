//! Three-way merge machinery: split-point discovery over the commit graph
//! and per-file reconciliation against it.

pub mod bca_finder;
pub mod reconcile;
