use crate::error::{Result, SortError};
use crate::extraction::MetadataSource;
use crate::naming::synthesize_stem;
use crate::placement::collision::resolve_collision;
use crate::placement::{OwnershipResolver, PlacementDecision, PlacementExecutor};
use crate::routing::{Account, PolicyTable, Router, RoutingConfig};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Extension applied to every placed file
pub const PLACED_EXTENSION: &str = "dcm";

/// Result of processing one file of a study
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Moved into place under its final name
    Placed {
        source: PathBuf,
        destination: PathBuf,
    },
    /// Left where it was; the rest of the study continued
    Failed { source: PathBuf, reason: String },
}

/// Aggregated per-file outcomes of one run
///
/// One corrupt file must not abort an entire study's placement, so the
/// driver records failures instead of propagating them; only structural
/// errors (a failed move) abort the run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<FileOutcome>,
}

impl RunSummary {
    /// Number of files moved into place
    pub fn placed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Placed { .. }))
            .count()
    }

    /// Number of files left behind
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.placed()
    }

    /// Whether every file was placed
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }
}

/// Per-study pipeline driver
///
/// Wires the metadata source, naming, routing, collision resolution, and
/// placement together: one pass over a study directory, one outcome per
/// file, directory removed once emptied.
pub struct StudySorter<'a> {
    source: &'a dyn MetadataSource,
    policy: &'a PolicyTable,
    config: &'a RoutingConfig,
    ownership: &'a dyn OwnershipResolver,
}

impl<'a> StudySorter<'a> {
    pub fn new(
        source: &'a dyn MetadataSource,
        policy: &'a PolicyTable,
        config: &'a RoutingConfig,
        ownership: &'a dyn OwnershipResolver,
    ) -> Self {
        Self {
            source,
            policy,
            config,
            ownership,
        }
    }

    /// Places every file of one study directory
    ///
    /// Files are visited in name order so repeated runs behave the same.
    /// Per-file failures are recorded and skipped; a failed move aborts the
    /// run because it signals a structural misconfiguration.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read or a move fails.
    pub fn sort_study(&self, study_dir: &Path) -> Result<RunSummary> {
        let files = collect_study_files(study_dir)?;
        info!(
            "processing {} files from {}",
            files.len(),
            study_dir.display()
        );

        let mut summary = RunSummary::default();
        for file in files {
            match self.place_file(&file) {
                Ok(destination) => {
                    info!("{} -> {}", file.display(), destination.display());
                    summary.outcomes.push(FileOutcome::Placed {
                        source: file,
                        destination,
                    });
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("skipping {}: {}", file.display(), e);
                    summary.outcomes.push(FileOutcome::Failed {
                        source: file,
                        reason: e.to_string(),
                    });
                }
            }
        }

        remove_if_empty(study_dir);
        Ok(summary)
    }

    /// Runs the pipeline for a single file
    fn place_file(&self, file: &Path) -> Result<PathBuf> {
        let fields = self.source.field_map(file)?;

        let stem = synthesize_stem(&fields);
        let route = Router::new(self.policy, self.config).resolve(&fields);
        let directory = route.directory();

        let executor = PlacementExecutor::new(self.ownership);
        let account = Account::new(route.owner.clone(), route.group.clone());
        let ids = executor.resolve_account(&account, &self.config.fallback_account);

        executor.ensure_directory(&directory, ids.as_ref())?;

        let name = resolve_collision(&directory, &stem, PLACED_EXTENSION, file)?;
        let decision = PlacementDecision {
            destination: directory.join(name),
            owner: route.owner,
            group: route.group,
        };
        executor.place(file, &decision, ids.as_ref())?;
        Ok(decision.destination)
    }
}

/// Collects the study's files in deterministic order
fn collect_study_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| {
        SortError::Config(format!(
            "cannot read study directory {}: {}",
            dir.display(),
            e
        ))
    })? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Removes the study directory if the run emptied it
fn remove_if_empty(dir: &Path) {
    match std::fs::read_dir(dir) {
        Ok(mut entries) => {
            if entries.next().is_none() {
                match std::fs::remove_dir(dir) {
                    Ok(()) => info!("removed emptied study directory {}", dir.display()),
                    Err(e) => warn!("cannot remove {}: {}", dir.display(), e),
                }
            } else {
                info!("{} not emptied, leaving in place", dir.display());
            }
        }
        Err(e) => warn!("cannot re-read {}: {}", dir.display(), e),
    }
}
