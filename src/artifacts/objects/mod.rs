//! Repository object types
//!
//! Everything the engine stores is content-addressed by a SHA-1 hash:
//!
//! - **Blob**: one file's content at one point in history, hashed together
//!   with its name
//! - **Commit**: an immutable snapshot carrying its full name-to-blob
//!   mapping, parent linkage, message, and timestamp
//!
//! Commits serialize to the loose-object format `commit <size>\0<content>`.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
