//! Destination path resolution
//!
//! Derives the directory a file belongs in from its extracted fields, a
//! region-keyed policy table, and two hard-coded device-class overrides.

pub mod overrides;
pub mod policy;

pub use overrides::{Account, InstitutionOverride, RoutingConfig, StationOverride};
pub use policy::{PolicyEntry, PolicyTable};

use crate::extraction::fields::{
    FieldMap, INSTITUTION_NAME, PATIENT_NAME, SERIES_DATE, STATION_NAME, STUDY_DESCRIPTION,
};
use crate::naming::sanitize::{sanitize_path_component, underscore_unsafe};
use crate::naming::stem::series_title;
use log::debug;
use std::path::PathBuf;

/// Resolved destination for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Destination root chosen by override or policy
    pub root: PathBuf,
    /// `<region>/<exam>/<subject>/<series-date>/<series-title>`
    pub relative: PathBuf,
    /// Owner account name to apply to created paths
    pub owner: String,
    /// Group name to apply to created paths
    pub group: String,
}

impl Route {
    /// Full destination directory
    pub fn directory(&self) -> PathBuf {
        self.root.join(&self.relative)
    }
}

/// Splits a study description into its region and exam halves
///
/// The description is conventionally `<region>^<exam>`; splitting happens
/// before sanitization because the sanitizer deletes carets. Without a
/// caret, both halves take the whole sanitized description.
pub fn split_study_description(description: &str) -> (String, String) {
    match description.split_once('^') {
        Some((region, exam)) => (
            sanitize_path_component(region),
            sanitize_path_component(exam),
        ),
        None => {
            let whole = sanitize_path_component(description);
            (whole.clone(), whole)
        }
    }
}

/// Derives destination directories from field maps
///
/// Override rules take precedence over the policy table, in a fixed order:
/// station match, then institution match, then region lookup.
pub struct Router<'a> {
    policy: &'a PolicyTable,
    config: &'a RoutingConfig,
}

impl<'a> Router<'a> {
    pub fn new(policy: &'a PolicyTable, config: &'a RoutingConfig) -> Self {
        Self { policy, config }
    }

    /// Resolves the destination for one file
    pub fn resolve(&self, fields: &FieldMap) -> Route {
        let (region, exam) = split_study_description(fields.get(STUDY_DESCRIPTION));
        let subject = underscore_unsafe(fields.get(PATIENT_NAME));
        let title = series_title(fields);
        let relative: PathBuf = [
            region.as_str(),
            exam.as_str(),
            subject.as_str(),
            fields.get(SERIES_DATE),
            title.as_str(),
        ]
        .iter()
        .collect();

        let (root, account) = self.resolve_root(fields, &region);
        debug!(
            "routed region {:?} to {} as {}:{}",
            region,
            root.display(),
            account.owner,
            account.group
        );

        Route {
            root,
            relative,
            owner: account.owner,
            group: account.group,
        }
    }

    fn resolve_root(&self, fields: &FieldMap, region: &str) -> (PathBuf, Account) {
        let station = &self.config.station_override;
        if fields.get(STATION_NAME) == station.station {
            return (station.root.clone(), station.account.clone());
        }

        let institution = &self.config.institution_override;
        if institution
            .institutions
            .iter()
            .any(|name| name == fields.get(INSTITUTION_NAME))
        {
            let station_dir = underscore_unsafe(fields.get(STATION_NAME));
            return (
                institution.root.join(station_dir),
                institution.account.clone(),
            );
        }

        match self.policy.lookup(region) {
            Some(entry) => (
                entry.base_path.clone(),
                Account::new(entry.owner.clone(), entry.group.clone()),
            ),
            None => (
                self.config.default_root.clone(),
                self.config.fallback_account.clone(),
            ),
        }
    }
}
