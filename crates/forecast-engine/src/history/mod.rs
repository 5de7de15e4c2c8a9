//! Historical price data source
//!
//! Persistence lives outside the engine. This module defines the seam the
//! engine reads through and an in-memory implementation.

mod memory;
mod traits;

pub use memory::InMemoryHistory;
pub use traits::*;
