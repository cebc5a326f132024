//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`check`] - Load every region geometry and report its status
//! - [`classify`] - Zone and land membership of a single point
//! - [`config`] - Configuration management (path, show, init)
//! - [`generate`] - Run the placement generator for a region
//! - [`regions`] - List enabled regions
//! - [`simulate`] - Toggle random valves and print the resulting history

pub mod check;
pub mod classify;
pub mod common;
pub mod config;
pub mod generate;
pub mod regions;
pub mod simulate;
