//! In-memory location index backed by a GeoNames gazetteer file.

pub mod error;
pub mod gazetteer;

/// Index error type.
pub use error::IndexError;
/// Gazetteer-backed index implementing `LocationIndex`.
pub use gazetteer::GazetteerIndex;
