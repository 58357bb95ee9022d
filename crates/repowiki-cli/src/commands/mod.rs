//! Command implementations, one module per subcommand.

pub mod completions;
pub mod list;
pub mod open;
pub mod random;
pub mod scan;
pub mod search;
pub mod show;
pub mod stats;
pub mod tree;
