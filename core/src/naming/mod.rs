//! Filename synthesis
//!
//! Turns extracted fields into a deterministic, sortable, filesystem-safe
//! filename stem. Everything here is pure string work; collision handling
//! against files already on disk lives in [`crate::placement`].

pub mod sanitize;
pub mod stem;

pub use sanitize::{sanitize_description, sanitize_path_component, strip_reserved, underscore_unsafe};
pub use stem::{pad_instance, series_title, synthesize_stem, truncate_time};
