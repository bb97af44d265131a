//! Command line interface for Tactician.

pub mod args;
pub mod commands;
pub mod output;
