//! Traceline Store - file-backed persistence for alignment records
//!
//! Alignment records live in `alignments.json`, project metadata in
//! `metadata.json`. Both use whole-file read-modify-overwrite through an
//! atomic temp-file rename; there is no locking, the surrounding shell is
//! expected to serialize writers per project.

mod alignments;
mod atomic;
mod error;
mod project;

pub use alignments::{AlignmentRecord, AlignmentStore};
pub use error::{Error, Result};
pub use project::ProjectMeta;
