//! Reference problems shared by the integration tests.

pub mod problems;
