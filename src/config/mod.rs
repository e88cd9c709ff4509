//! Configuration loading, application, and the resolved run configuration.
mod apply;
mod loader;
mod run;
pub mod types;


pub use apply::apply_config;
pub use loader::load_config;
pub use run::{OutputTarget, RunConfig};

#[cfg(test)]
pub(crate) use loader::load_config_file;
