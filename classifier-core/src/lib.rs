//! Core functionality for classifier
//!
//! This crate contains the building blocks shared by the classifier
//! subcommands: compression-aware file access, grouping, version
//! resolution, the alignment table model and user settings.

pub mod alignment;
pub mod config;
pub mod error;
pub mod grouping;
pub mod io;
pub mod table;
pub mod version;

pub use config::Settings;
pub use error::{ConfigError, TableError};
pub use grouping::{Groups, group, group_by};
pub use io::{Compression, Input, Mode, Output, Stream, Target};
pub use version::{CommandRunner, SystemRunner, VersionResolver};
