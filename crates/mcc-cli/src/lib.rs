//! Library components of the `mcc` command line.

pub mod logging;
pub mod pipeline;
pub mod summary;
