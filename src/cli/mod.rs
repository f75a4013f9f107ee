//! CLI module for kbtree.
//!
//! This module provides the command-line front end:
//! - Argument parsing
//! - Version display
//! - Command execution against a [`KnowledgeBaseManager`](crate::manager::KnowledgeBaseManager)
//!
//! # Usage
//!
//! ```ignore
//! use kbtree::cli::{parse_args, run_command, CliCommand};
//!
//! let command = parse_args(std::env::args());
//! if let CliCommand::Version = command {
//!     handle_version_command();
//! }
//! run_command(&manager, command).await?;
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use commands::{configure, print_notices, resolve_entry, resolve_folder, run_command};
pub use version::{handle_version_command, VERSION};
