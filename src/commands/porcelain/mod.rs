//! User-facing commands, one `impl Repository` block per file.

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod find;
pub mod init;
pub mod log;
pub mod merge;
pub mod remove;
pub mod reset;
pub mod status;
