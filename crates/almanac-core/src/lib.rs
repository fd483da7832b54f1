//! Shared configuration, constants and error types for the almanac workspace.

pub mod config;
pub mod constants;
pub mod error;
