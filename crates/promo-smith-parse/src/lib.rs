#![doc = include_str!("../README.md")]

mod config;
mod error;
mod store;

pub use config::*;
pub use error::*;
pub use store::*;
// Public re-export so callers can reach the allocator through
// `promo_smith_parse::promo_smith`.
pub use promo_smith;
