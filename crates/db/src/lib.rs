//! Storage layer for Tally.
//!
//! This crate provides:
//! - [`MemoryStore`], an in-process store implementing every repository
//!   trait of `tally_core::repository`
//! - One repository module per storage concern

pub mod repositories;
mod store;

pub use store::MemoryStore;
