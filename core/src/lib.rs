pub mod api;
pub mod cli;
pub mod error;
pub mod extraction;
pub mod lock;
pub mod naming;
pub mod placement;
pub mod routing;

pub use api::{FileOutcome, RunSummary, StudySorter, PLACED_EXTENSION};
pub use cli::report::TextReport;
pub use error::{Result, SortError};
pub use extraction::{DcmdumpSource, FieldMap, MetadataSource};
pub use lock::{FileRunLock, RunLock};
pub use naming::synthesize_stem;
pub use placement::{PlacementDecision, SystemOwnership};
pub use routing::{PolicyEntry, PolicyTable, Route, Router, RoutingConfig};
