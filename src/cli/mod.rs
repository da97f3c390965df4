//! Command handlers for the `verifyd` binary.

pub(crate) mod browse;
pub(crate) mod common;
pub(crate) mod vote;
