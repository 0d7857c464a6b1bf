pub mod classify;
pub mod diff;
pub mod differ;
pub mod output;
pub mod reconcile;
pub mod render;
pub mod source;

pub use differ::Differ;
pub use reconcile::ComparisonUnit;
pub use source::{DiffSource, SourceEntry};
