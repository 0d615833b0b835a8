//! Utilities shared by the Hiroba server and client binaries.

pub mod logger;
pub mod time;
