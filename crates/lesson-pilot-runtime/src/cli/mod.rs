//! CLI subcommand implementations for the lesson-pilot binary.

pub mod doctor;
pub mod run_cmd;
