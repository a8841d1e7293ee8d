//! Version-control data structures and algorithms
//!
//! - `branch`: branch name validation
//! - `core`: shared command error and outcome types
//! - `merge`: split-point search and three-way reconciliation
//! - `objects`: commit snapshots and content hashing

pub mod branch;
pub mod core;
pub mod merge;
pub mod objects;
