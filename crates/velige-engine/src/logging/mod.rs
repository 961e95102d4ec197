//! Logger setup for binaries built on the engine.

mod init;

#[cfg(test)]
pub(crate) mod capture;

pub use init::{LoggingConfig, init_logging};
