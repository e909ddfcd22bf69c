//! Execution host for the ledger state machine.
//!
//! [`Ledger`] plays the role of the execution context: it receives calls with
//! a caller identity (plain or signature-authenticated), applies them to the
//! [`LedgerState`], and keeps a bounded history of receipts.
//! [`SharedLedger`] puts one lock around each call so the sequential contract
//! of the state machine holds when several threads submit calls.

use crate::call::{Call, CallOutcome, SignedCall};
use crate::config::Config;
use crate::crypto::{address_to_hex, Address, NULL_ADDRESS};
use crate::error::LedgerError;
use crate::ledger::{LedgerEvent, LedgerState};
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self {
            name: "Ledger Token".to_string(),
            symbol: "LDG".to_string(),
            decimals: 18,
        }
    }
}

/// Record of one applied mutation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Receipt {
    pub sequence: u64,
    pub caller: Address,
    pub operation: String,
    pub call_hash: [u8; 32],
    pub event: LedgerEvent,
    /// Milliseconds since the Unix epoch.
    pub applied_at: i64,
}

#[derive(Debug, Clone)]
pub struct Ledger {
    state: LedgerState,
    metadata: TokenMetadata,
    receipts: VecDeque<Receipt>,
    receipt_history: usize,
    max_call_size: usize,
    /// Last accepted nonce per signing caller.
    nonces: HashMap<Address, u64>,
    sequence: u64,
}

impl Ledger {
    pub const DEFAULT_RECEIPT_HISTORY: usize = 1_024;

    pub fn new(contract_owner: Address) -> Self {
        Self::with_metadata(contract_owner, TokenMetadata::default())
    }

    pub fn with_metadata(contract_owner: Address, metadata: TokenMetadata) -> Self {
        Self {
            state: LedgerState::new(contract_owner),
            metadata,
            receipts: VecDeque::new(),
            receipt_history: Self::DEFAULT_RECEIPT_HISTORY,
            max_call_size: crate::call::MAX_CALL_SIZE,
            nonces: HashMap::new(),
            sequence: 0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let ledger = Self::configured(LedgerState::new(config.owner_address()), config);
        info!(
            "Ledger {} ({}) initialised, owner {}",
            ledger.metadata.name,
            ledger.metadata.symbol,
            address_to_hex(ledger.state.contract_owner())
        );
        ledger
    }

    /// Restores a ledger from a state snapshot, taking metadata and limits
    /// from `config`. The contract owner always comes from the snapshot.
    pub fn from_snapshot(bytes: &[u8], config: &Config) -> Result<Self, LedgerError> {
        let state = LedgerState::from_snapshot(bytes)?;
        if *state.contract_owner() != config.owner_address() {
            warn!(
                "Snapshot owner {} differs from configured owner {}; keeping the snapshot's",
                address_to_hex(state.contract_owner()),
                address_to_hex(&config.owner_address())
            );
        }
        let ledger = Self::configured(state, config);
        info!(
            "Ledger {} ({}) restored, supply {}, {} items",
            ledger.metadata.name,
            ledger.metadata.symbol,
            ledger.state.total_supply(),
            ledger.state.item_supply()
        );
        Ok(ledger)
    }

    fn configured(state: LedgerState, config: &Config) -> Self {
        let metadata = TokenMetadata {
            name: config.ledger.name.clone(),
            symbol: config.ledger.symbol.clone(),
            decimals: config.ledger.decimals,
        };
        let mut ledger = Self::with_metadata(*state.contract_owner(), metadata);
        ledger.state = state;
        ledger.receipt_history = config.limits.receipt_history;
        ledger.max_call_size = config.limits.max_call_size;
        ledger
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn receipts(&self) -> impl Iterator<Item = &Receipt> {
        self.receipts.iter()
    }

    /// Number of mutations applied since construction.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn last_nonce(&self, caller: &Address) -> Option<u64> {
        self.nonces.get(caller).copied()
    }

    pub fn snapshot(&self) -> Result<Vec<u8>, LedgerError> {
        self.state.to_snapshot()
    }

    /// Applies `call` on behalf of `caller`. On error nothing changes.
    pub fn execute(&mut self, caller: &Address, call: &Call) -> Result<CallOutcome, LedgerError> {
        call.validate_size(self.max_call_size)?;
        if call.is_read_only() {
            debug!("Read {} by {}", call.name(), address_to_hex(caller));
            return self.state.query(call);
        }
        let call_hash = call.hash()?;

        let applied = match self.state.apply_call(caller, call) {
            Ok(applied) => applied,
            Err(e) => {
                warn!(
                    "Rejected {} from {}: {}",
                    call.name(),
                    address_to_hex(caller),
                    e
                );
                return Err(e);
            }
        };
        debug_assert!(self.state.check_invariants().is_ok());

        if let Some(event) = applied.event {
            self.record(caller, call, call_hash, event);
        }
        Ok(applied.outcome)
    }

    /// Authenticates the envelope, enforces nonce ordering, then executes.
    /// Nonces guard mutations only: a signed read neither checks nor consumes
    /// one.
    pub fn execute_signed(&mut self, signed: &SignedCall) -> Result<CallOutcome, LedgerError> {
        let caller = signed.verify()?;
        if signed.call.is_read_only() {
            return self.execute(&caller, &signed.call);
        }
        if let Some(last) = self.last_nonce(&caller) {
            if signed.nonce <= last {
                warn!(
                    "Stale nonce {} from {} (last accepted {})",
                    signed.nonce,
                    address_to_hex(&caller),
                    last
                );
                return Err(LedgerError::InvalidCall(format!(
                    "Stale nonce {}: last accepted is {}",
                    signed.nonce, last
                )));
            }
        }

        let outcome = self.execute(&caller, &signed.call)?;
        self.nonces.insert(caller, signed.nonce);
        Ok(outcome)
    }

    fn record(&mut self, caller: &Address, call: &Call, call_hash: [u8; 32], event: LedgerEvent) {
        self.sequence += 1;
        match &event {
            LedgerEvent::Transfer { from, to, value } if *from == NULL_ADDRESS => {
                info!("Minted {} to {}", value, address_to_hex(to));
            }
            LedgerEvent::Transfer { from, to, value } if *to == NULL_ADDRESS => {
                info!("Burned {} from {}", value, address_to_hex(from));
            }
            _ => debug!(
                "Applied #{} {} by {}",
                self.sequence,
                call.name(),
                address_to_hex(caller)
            ),
        }

        if self.receipt_history == 0 {
            return;
        }
        while self.receipts.len() >= self.receipt_history {
            self.receipts.pop_front();
        }
        self.receipts.push_back(Receipt {
            sequence: self.sequence,
            caller: *caller,
            operation: call.name().to_string(),
            call_hash,
            event,
            applied_at: chrono::Utc::now().timestamp_millis(),
        });
    }
}

/// Thread-safe handle: every call runs under one lock acquisition.
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    /// Read-only calls share the lock; everything else takes it exclusively.
    pub fn execute(&self, caller: &Address, call: &Call) -> Result<CallOutcome, LedgerError> {
        if call.is_read_only() {
            let ledger = self.inner.read();
            call.validate_size(ledger.max_call_size)?;
            debug!("Read {} by {}", call.name(), address_to_hex(caller));
            return ledger.state.query(call);
        }
        self.inner.write().execute(caller, call)
    }

    pub fn execute_signed(&self, signed: &SignedCall) -> Result<CallOutcome, LedgerError> {
        if signed.call.is_read_only() {
            let caller = signed.verify()?;
            return self.execute(&caller, &signed.call);
        }
        self.inner.write().execute_signed(signed)
    }

    /// Runs `f` against a consistent view of the ledger.
    pub fn read<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        let ledger = self.inner.read();
        f(&ledger)
    }
}
