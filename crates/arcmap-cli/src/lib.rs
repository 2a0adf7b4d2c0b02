//! Library side of the `arcmap` command line tool.

pub mod logging;
pub mod workflow;
