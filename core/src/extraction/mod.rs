pub mod dump;
pub mod fields;
pub mod source;

pub use dump::parse_dump;
pub use fields::*;
pub use source::{DcmdumpSource, MetadataSource};
