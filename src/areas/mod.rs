//! Storage areas of a repository
//!
//! - **Workspace**: the user-visible working tree (flat, top-level files)
//! - **Database**: the loose object store under `.vcs/objects`
//! - **Index**: pending additions and removals, `.vcs/index`
//! - **Refs**: branch pointers and the symbolic `HEAD`
//! - **Repository**: ties the areas together and resolves commit refs

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
