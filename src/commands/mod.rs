//! Command-line interface and orchestration for pipeleak
//!
//! This module implements the CLI commands and wires the driver up to a real terminal.
//!
//! ## Commands
//!
//! - **animate**: Load the configuration, build a [`TerminalSurface`], and run the
//!   simulated progress driver until its cycle limit or until the user quits
//! - **init**: Generate a default configuration file
//! - **validate**: Check configuration file syntax and value ranges
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes
//! to the appropriate command handler. All output goes through a [`Host`], so
//! commands can be exercised in tests without touching the real process streams.
//!
//! Configuration is a TOML file with a `variant` and one table per phase
//! (`leak`, `fill`, `drain`, `particles`). Every value is optional.

mod animate;
mod common;
mod config;
mod host;
mod init;
mod run;
mod terminal_surface;
mod validate;

#[cfg(debug_assertions)]
pub use config::Config;

pub use animate::{AnimateArgs, animate};
pub use common::{ColorMode, LogLevel};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
pub use terminal_surface::TerminalSurface;
pub use validate::{ValidateArgs, validate_config};
