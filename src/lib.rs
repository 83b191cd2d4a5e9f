#![doc = include_str!("../README.md")]
#![warn(missing_docs, missing_debug_implementations)]
mod error;
mod factory;
mod lease;
mod pool;
mod pooled;

pub use error::*;
pub use factory::*;
pub use lease::*;
pub use pool::*;
pub use pooled::*;
