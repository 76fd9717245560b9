//! cloudctl: command-line client for OpenStack-style cloud APIs
//!
//! Layers, innermost first:
//! - [`domain`]: argument coercion, command tree, filters, batch specs
//! - [`application`]: REST clients and endpoint resolution
//! - [`infrastructure`]: HTTP transport and the service container
//! - [`cli`]: argument parsing, dispatch and output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
