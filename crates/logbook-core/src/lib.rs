//! Core types and trait definitions for Logbook.
//!
//! This crate has no HTTP or database dependencies.
//! The store, API and CLI crates all depend on it.

pub mod day;
pub mod error;
pub mod event;
pub mod resource;
pub mod series;
pub mod store;
pub mod value;

pub use error::{Classify, Error, ErrorBody, ErrorKind, Result};
