//! Common types and utilities for PriceCast
//!
//! This crate provides shared types and utilities used across
//! all PriceCast crates.
//!
//! # Modules
//!
//! - [`types`] - Shared domain types (HistoricalPoint, ForecastPoint, etc.)

pub mod types;

pub use types::*;
