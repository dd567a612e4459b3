// Thin re-export module: implementation lives in `blockchain/core.rs`, split
// into chain storage, integrity validation and the pet registry.

pub mod core;
pub use core::*;
