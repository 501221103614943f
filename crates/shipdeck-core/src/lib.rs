//! # shipdeck-core
//!
//! Core crate for Shipdeck. Contains the deployment configuration schemas,
//! the shipping domain events fired by the host, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other Shipdeck crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
