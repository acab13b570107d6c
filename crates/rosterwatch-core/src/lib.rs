//! # rosterwatch-core
//!
//! Core crate for rosterwatch. Contains the presence data model, the
//! configuration schema, localized strings, the collaborator traits the
//! engine talks through, and the unified error system.
//!
//! This crate has **no** internal dependencies on other rosterwatch crates.

pub mod config;
pub mod error;
pub mod locale;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
