//! Presentation layer with the command line interface.

/// Command dispatcher.
pub mod app;
/// Command line definitions.
pub mod cli;

pub use app::App;
pub use cli::{Cli, Command};
