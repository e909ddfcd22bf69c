// Thin re-export module: the state machine lives in `ledger/core.rs`.

pub mod core;
pub use core::*;
