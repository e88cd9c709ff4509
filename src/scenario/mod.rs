//! Archive loading and scenario construction.
//!
//! A scenario is the ordered load plan derived from a captured session:
//! pages in declaration order, each holding its recorded requests in archive
//! order. Order is execution order, so nothing here ever sorts or dedups.
mod builder;
mod loader;
mod types;


pub use builder::build_scenario;
pub use loader::load_archive;
pub use types::{Entry, HttpMethod, Page, QueryParam, Scenario};
