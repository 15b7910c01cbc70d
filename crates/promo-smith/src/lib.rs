#![doc = include_str!("../README.md")]

mod allocator;
mod error;
mod rand;
mod record;
mod scheme;
mod store;
mod synthesizer;
mod user;

pub use crate::allocator::*;
pub use crate::error::*;
pub use crate::rand::*;
pub use crate::record::*;
pub use crate::scheme::*;
pub use crate::store::*;
pub use crate::synthesizer::*;
pub use crate::user::*;
