//! Pipeline module - region lookup, classification, rebalancing, locations and table I/O

pub mod concentration;
pub mod error;
pub mod loader;
pub mod locations;
pub mod rebalance;
pub mod regions;
pub mod schema;
pub mod stages;
pub mod synthetic;

pub use concentration::*;
pub use error::*;
pub use loader::*;
pub use locations::*;
pub use rebalance::*;
pub use regions::*;
pub use schema::*;
pub use stages::*;
pub use synthetic::*;
