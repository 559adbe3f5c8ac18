use std::path::PathBuf;

/// Owner and group account names applied to placed files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub owner: String,
    pub group: String,
}

impl Account {
    pub fn new(owner: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            group: group.into(),
        }
    }
}

/// Routing rule for a source device identified by its station name
///
/// The console embeds enough identity in StationName to bypass the
/// region-based policy table entirely; its output always lands under a
/// fixed, known-safe root.
#[derive(Debug, Clone)]
pub struct StationOverride {
    pub station: String,
    pub root: PathBuf,
    pub account: Account,
}

/// Routing rule for devices identified by their institution name
///
/// Matches either spelling the affiliated site reports; output is grouped
/// per station under a common root.
#[derive(Debug, Clone)]
pub struct InstitutionOverride {
    pub institutions: [String; 2],
    pub root: PathBuf,
    pub account: Account,
}

/// Immutable routing configuration injected into the router
///
/// Holds the device-class override rules, the account used when neither an
/// override nor a policy entry resolves one, and the root for regions absent
/// from the policy table. Built once at startup and read thereafter.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    pub station_override: StationOverride,
    pub institution_override: InstitutionOverride,
    pub fallback_account: Account,
    pub default_root: PathBuf,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            station_override: StationOverride {
                station: "AWP45117".to_string(),
                root: PathBuf::from("/data/dicom/satellite"),
                account: Account::new("satellite", "mri"),
            },
            institution_override: InstitutionOverride {
                institutions: [
                    "NMR Imaging Center".to_string(),
                    "NMR-Imaging-Center".to_string(),
                ],
                root: PathBuf::from("/data/dicom/partner"),
                account: Account::new("partner", "mri"),
            },
            fallback_account: Account::new("dicom", "dicom"),
            default_root: PathBuf::from("/data/dicom/unsorted"),
        }
    }
}
