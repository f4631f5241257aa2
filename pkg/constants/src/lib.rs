//! Centralized constants for the slim discovery schema.
//!
//! API names, well-known labels, documented limits and wire-format markers
//! live here so the schema crate and the CLI agree on them.

pub mod discovery;
pub mod paths;
pub mod wire;
