//! Core foundation: sensor sample, pose, and map message types.

pub mod types;
