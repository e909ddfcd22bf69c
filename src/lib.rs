//! tokenledger - A single-ledger state machine for fungible units and
//! non-fungible items
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core State Machine
//! - [`ledger`] - Shared state, authorization guard, fungible ledger and item registry
//! - [`call`] - Call envelopes, signed calls and name-based decoding
//!
//! ## Execution Host
//! - [`host`] - Receipts, nonce tracking and the lock-guarded shared ledger
//! - [`scenario`] - Scripted call sequences for replay
//!
//! ## Cryptography
//! - [`crypto`] - Addresses and secp256k1 caller authentication
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```
//! use tokenledger::crypto::address_from_string;
//! use tokenledger::ledger::LedgerState;
//!
//! let owner = address_from_string("owner");
//! let alice = address_from_string("alice");
//! let bob = address_from_string("bob");
//!
//! let mut state = LedgerState::new(owner);
//! state.mint(&owner, &alice, 10).unwrap();
//! state.transfer(&alice, &bob, 4).unwrap();
//! assert_eq!(state.balance_of(&alice), 6);
//! assert_eq!(state.total_supply(), 10);
//! ```

#![forbid(unsafe_code)]

// ============================================================================
// Core State Machine
// ============================================================================
pub mod call;
pub mod ledger;

// ============================================================================
// Execution Host
// ============================================================================
pub mod host;
pub mod scenario;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;

pub use error::{ErrorKind, LedgerError, Result};
pub use host::{Ledger, SharedLedger};
pub use ledger::LedgerState;
