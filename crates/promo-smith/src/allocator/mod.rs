//! Per-user code allocation and batch orchestration.
//!
//! The [`Allocator`] drives the check-then-insert protocol against a
//! [`PromoStore`](crate::PromoStore):
//!
//! 1. synthesize a suffix not yet tried for this user,
//! 2. ask the store whether `prefix + suffix` exists,
//! 3. on a hit, try the next suffix (a collision, not an error),
//! 4. on a miss, insert the record; a successful insert is the only way a
//!    code is issued.
//!
//! Batches run users strictly one after another. A failure is recorded for
//! that user and the batch moves on.
//!
//! ## Known limitation
//!
//! The store has no atomic check-and-insert. Another process allocating with
//! the same prefix can insert the same code between steps 2 and 4, and both
//! allocations then succeed. Within one batch this cannot happen: codes issued
//! earlier in the batch are treated as collisions.

mod allocate;
mod batch;
mod config;

pub use allocate::*;
pub use batch::*;
pub use config::*;
