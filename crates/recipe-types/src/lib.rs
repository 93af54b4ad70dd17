//! Recipe Types - Pure data definitions
//!
//! This crate contains only the record types shared by the store and the
//! HTTP layer, with no async runtime dependencies.

pub mod recipe;
mod wire;

pub use recipe::*;
