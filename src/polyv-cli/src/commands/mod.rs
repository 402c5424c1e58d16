//! Subcommand handlers.

pub mod filter;
pub mod fuse;
pub mod retag;
pub mod strip;
pub mod swap;
