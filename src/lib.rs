pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod git;
pub mod ui;

pub use config::{Config, Manifest};
pub use engine::{compute_version, DecisionInput, DecisionOutput};
pub use error::{MonoVersionError, Result};
