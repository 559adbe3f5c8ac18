use crate::error::{Result, SortError};
use crate::placement::PlacementDecision;
use crate::routing::Account;
use log::{debug, warn};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Mode for created directories: owner/group full access, no world access
pub const DIR_MODE: u32 = 0o770;

/// Mode for placed files: owner/group read-write, no world access
pub const FILE_MODE: u32 = 0o660;

/// Numeric identity a resolved account maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerIds {
    pub uid: u32,
    pub gid: u32,
}

/// Resolves account names to numeric identities and applies them
///
/// Injected so placement logic can be tested without touching real system
/// accounts or requiring root.
pub trait OwnershipResolver {
    /// Maps owner/group names to uid/gid, `None` if either fails to resolve
    /// or resolves to a privileged identity
    fn resolve(&self, owner: &str, group: &str) -> Option<OwnerIds>;

    /// Applies the identity to a path
    fn apply(&self, path: &Path, ids: &OwnerIds) -> std::io::Result<()>;
}

/// Ownership resolver backed by the system account database
pub struct SystemOwnership;

impl OwnershipResolver for SystemOwnership {
    fn resolve(&self, owner: &str, group: &str) -> Option<OwnerIds> {
        let user = nix::unistd::User::from_name(owner).ok().flatten()?;
        let group = nix::unistd::Group::from_name(group).ok().flatten()?;
        let ids = OwnerIds {
            uid: user.uid.as_raw(),
            gid: group.gid.as_raw(),
        };
        // a name that resolves to root must never be applied to placed data
        if ids.uid == 0 || ids.gid == 0 {
            return None;
        }
        Some(ids)
    }

    fn apply(&self, path: &Path, ids: &OwnerIds) -> std::io::Result<()> {
        nix::unistd::chown(
            path,
            Some(nix::unistd::Uid::from_raw(ids.uid)),
            Some(nix::unistd::Gid::from_raw(ids.gid)),
        )
        .map_err(std::io::Error::from)
    }
}

/// Applies placement decisions to the filesystem
///
/// The only component that mutates anything: creates destination chains,
/// moves files into place, and applies modes and ownership.
pub struct PlacementExecutor<'a> {
    ownership: &'a dyn OwnershipResolver,
}

impl<'a> PlacementExecutor<'a> {
    pub fn new(ownership: &'a dyn OwnershipResolver) -> Self {
        Self { ownership }
    }

    /// Resolves an account, downgrading to the fallback when needed
    ///
    /// Returns `None` when even the fallback cannot be resolved; ownership
    /// application is then skipped entirely rather than aborting placement.
    pub fn resolve_account(&self, account: &Account, fallback: &Account) -> Option<OwnerIds> {
        if let Some(ids) = self.ownership.resolve(&account.owner, &account.group) {
            return Some(ids);
        }
        warn!(
            "cannot resolve {}:{}, falling back to {}:{}",
            account.owner, account.group, fallback.owner, fallback.group
        );
        let ids = self.ownership.resolve(&fallback.owner, &fallback.group);
        if ids.is_none() {
            warn!(
                "fallback account {}:{} does not resolve either, skipping ownership",
                fallback.owner, fallback.group
            );
        }
        ids
    }

    /// Ensures the destination directory chain exists
    ///
    /// Creates each missing segment with [`DIR_MODE`] (set explicitly so the
    /// umask cannot interfere) and the resolved identity. Segments that
    /// already exist are left untouched.
    ///
    /// # Errors
    ///
    /// Returns a placement error if a segment cannot be created; the file
    /// being placed is skipped, the run continues.
    pub fn ensure_directory(&self, dir: &Path, ids: Option<&OwnerIds>) -> Result<()> {
        let mut missing: Vec<PathBuf> = Vec::new();
        let mut cursor = dir;
        while !cursor.exists() {
            missing.push(cursor.to_path_buf());
            cursor = cursor.parent().ok_or_else(|| {
                SortError::Placement(format!("no existing ancestor for {}", dir.display()))
            })?;
        }

        for segment in missing.iter().rev() {
            fs::create_dir(segment).map_err(|e| {
                SortError::Placement(format!("cannot create {}: {}", segment.display(), e))
            })?;
            let perms = fs::Permissions::from_mode(DIR_MODE);
            fs::set_permissions(segment, perms).map_err(|e| {
                SortError::Placement(format!(
                    "cannot set mode on {}: {}",
                    segment.display(),
                    e
                ))
            })?;
            self.apply_ownership(segment, ids);
            debug!("created {}", segment.display());
        }
        Ok(())
    }

    /// Moves the source file to its final destination
    ///
    /// The rename lands the file under its resolved name, then restrictive
    /// permissions and ownership are applied. Rename failure is fatal for
    /// the whole run: it means a cross-device destination or a permission
    /// misconfiguration that every remaining file would hit too.
    pub fn place(
        &self,
        source: &Path,
        decision: &PlacementDecision,
        ids: Option<&OwnerIds>,
    ) -> Result<()> {
        fs::rename(source, &decision.destination).map_err(|e| SortError::MoveFailed {
            from: source.to_path_buf(),
            to: decision.destination.clone(),
            source: e,
        })?;

        let perms = fs::Permissions::from_mode(FILE_MODE);
        if let Err(e) = fs::set_permissions(&decision.destination, perms) {
            warn!(
                "cannot set mode on {}: {}",
                decision.destination.display(),
                e
            );
        }
        self.apply_ownership(&decision.destination, ids);
        Ok(())
    }

    fn apply_ownership(&self, path: &Path, ids: Option<&OwnerIds>) {
        if let Some(ids) = ids {
            if let Err(e) = self.ownership.apply(path, ids) {
                warn!("cannot chown {}: {}", path.display(), e);
            }
        }
    }
}
