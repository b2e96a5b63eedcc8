//! Shared helpers for the bundler.

pub(crate) mod fs;
