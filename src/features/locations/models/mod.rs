mod bounds;
mod location;

pub use bounds::{Bounds, SearchArea};
pub use location::{LogEntry, RubbishLocation};
