//! Command-line interface for the repertoire toolkit.

pub mod args;
pub mod commands;
pub mod output;
