mod app;
mod config;
mod report;
mod scenario;
mod token;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use report::ReportError;
pub use scenario::ScenarioError;
pub use token::TokenError;
pub use validation::ValidationError;
