//! Command handlers for the bazelfmt CLI.
//!
//! Each subcommand has its own module with a public handler function
//! that `main()` dispatches to.

pub mod completions;
pub mod config;
pub mod fmt;
pub mod init;
