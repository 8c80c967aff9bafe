//! Utility modules for the publishing toolkit.

pub mod date;
