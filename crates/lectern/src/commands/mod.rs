//! Command implementations for the Lectern CLI
//!
//! Each command module handles the CLI interface and delegates to
//! lectern-site for the actual work.

pub mod functions;
pub mod render;
