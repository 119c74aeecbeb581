pub mod properties;
pub mod query;
pub mod scan_pos;
pub mod term;

pub use properties::PropertiesError;
pub use scan_pos::{ScanPos, ScanPosError};
pub use term::SplitTerm;
