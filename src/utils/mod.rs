//! Utility modules shared by the backup and publish commands.

pub mod fs;
pub mod path;
