//! # herald-core
//!
//! Core types, traits, configuration, catalog, and error handling for Herald.

pub mod catalog;
pub mod comm;
pub mod compose;
pub mod config;
pub mod error;
pub mod flow;
pub mod message;
pub mod schedule;
pub mod traits;

pub use config::shellexpand;
