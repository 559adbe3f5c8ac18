//! Collision resolution and filesystem placement
//!
//! Everything after a destination has been chosen: deciding the final name
//! against what is already on disk, creating the directory chain, and
//! moving the file into place with restrictive modes and ownership.

pub mod collision;
pub mod digest;
pub mod executor;

pub use collision::{resolve_collision, MAX_DISAMBIGUATION};
pub use digest::file_digest;
pub use executor::{
    OwnerIds, OwnershipResolver, PlacementExecutor, SystemOwnership, DIR_MODE, FILE_MODE,
};

use std::path::PathBuf;

/// Final placement choice for one file; the only value that triggers
/// filesystem mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementDecision {
    /// Absolute destination path, collision-resolved
    pub destination: PathBuf,
    /// Owner account name recorded for the placement
    pub owner: String,
    /// Group name recorded for the placement
    pub group: String,
}
