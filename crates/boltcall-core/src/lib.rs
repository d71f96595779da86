//! Core types and trait definitions for the Boltcall assistant registry.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// Native `async fn` in traits; `Send` bounds are spelled out in the trait.
#![allow(async_fn_in_trait)]

pub mod assistant;
pub mod error;
pub mod factory;
pub mod preset;
pub mod store;

pub use error::{Error, Result};
