//! # memsim
//!
//! A simulated heap allocator: one contiguous byte pool serviced by a
//! free/allocated block list under one of four interchangeable placement
//! strategies. The point is comparison, not speed — run identical
//! workloads under first-fit, best-fit, worst-fit, and next-fit and
//! inspect the fragmentation and placement behavior each produces.
//!
//! The pool is bookkeeping-only: addresses are byte offsets, no backing
//! memory exists, and the system allocator is never called to service a
//! request. Allocation splits a free block; freeing coalesces adjacent
//! free neighbors; introspection queries are read-only linear scans.
//!
//! ## Quick Start
//!
//! ```rust
//! use memsim::prelude::*;
//!
//! fn main() -> memsim::Result<()> {
//!     let mut pool = MemoryPool::new(Strategy::FirstFit, 500);
//!
//!     let a = pool.allocate(100)?;
//!     let b = pool.allocate(100)?;
//!     pool.free(a)?;
//!
//!     assert_eq!(pool.hole_count(), 2);
//!     assert_eq!(pool.bytes_allocated() + pool.bytes_free(), pool.pool_size());
//!     println!("{}", pool.report());
//!
//!     pool.free(b)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `logging` (default): structured logging of engine lifecycle and
//!   allocation failures via `tracing`
//!
//! ## Concurrency
//!
//! Single-threaded by design. [`MemoryPool`] mutators take `&mut self` and
//! there is no internal locking; independent pools are fully isolated.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
// Precision loss in usize -> f64 casts is acceptable for report averages
#![allow(clippy::cast_precision_loss)]

// Error types
pub mod error;

// Core modules
pub mod block;
pub mod engine;
pub mod list;
pub mod report;
pub mod strategy;

// Re-export core types for convenience
pub use crate::engine::MemoryPool;
pub use crate::error::{MemoryError, MemoryResult, Result};
pub use crate::strategy::Strategy;

// Public API exports
pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::block::{Block, BlockId};
    pub use crate::engine::MemoryPool;
    pub use crate::error::{MemoryError, MemoryResult, Result};
    pub use crate::report::{BlockMap, MemoryReport};
    pub use crate::strategy::Strategy;
}
