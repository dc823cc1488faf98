//! Native host for the tubekit layout engine
//!
//! ```text
//! tk-app
//! ├── config    tubekit.ron (services, editor settings, export defaults)
//! ├── services  blocking HTTP clients and fire-and-forget collaborators
//! ├── runner    project commands: init, export, properties, bom, edits
//! └── cli       clap front end of the `tk` binary
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod services;

pub use cli::{Cli, run, run_from_env};
pub use config::{AppConfig, ConfigError, ConfigManager, SharedConfig};
pub use error::{AppError, Result};
pub use services::{BomClient, HttpCollaborators, ModelingClient, PlateClient, ServiceError};
