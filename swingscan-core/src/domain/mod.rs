//! Domain types for swingscan

pub mod bar;
pub mod ids;

pub use bar::{validate_bars, Bar, BarError};
pub use ids::{ConfigFingerprint, DatasetHash, RunId};

/// Symbol type alias
pub type Symbol = String;
