//! Report module - stage summaries, run reports and GeoJSON export

pub mod geojson;
pub mod run_report;
pub mod summary;

pub use geojson::*;
pub use run_report::*;
pub use summary::*;
