//! Deterministic data model shared by the submitter.
//!
//! Core modules are free of I/O side effects. They describe what a confirmed
//! receipt looks like and how it is encoded, independent of where it lives.

pub mod codec;
pub mod history;
pub mod receipt;
