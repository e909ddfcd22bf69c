//! Authorization guard shared by the fungible ledger and the item registry.
//!
//! The predicates only read state. The `require_*` helpers turn a failed
//! predicate into the matching [`LedgerError`] so callers can bail out with
//! `?` before touching any map.

use super::state::{ItemId, LedgerState};
use crate::crypto::{address_to_hex, Address, NULL_ADDRESS};
use crate::error::LedgerError;

/// True when `caller` is the contract owner.
pub fn is_owner(state: &LedgerState, caller: &Address) -> bool {
    state.contract_owner() == caller
}

/// True when item `id` exists and belongs to `caller`.
pub fn is_item_owner(state: &LedgerState, id: ItemId, caller: &Address) -> bool {
    state.item_owner(id) == Some(caller)
}

/// True when `caller` may move item `id` out of `from`'s hands: it owns the
/// item, holds the item's approval, or is an operator for `from`. Any one
/// suffices.
pub fn is_approved_or_operator(
    state: &LedgerState,
    id: ItemId,
    from: &Address,
    caller: &Address,
) -> bool {
    is_item_owner(state, id, caller)
        || state.item_approval(id) == Some(caller)
        || state.operator_approved(from, caller)
}

pub fn is_nonzero_address(addr: &Address) -> bool {
    *addr != NULL_ADDRESS
}

pub fn require_owner(state: &LedgerState, caller: &Address) -> Result<(), LedgerError> {
    if is_owner(state, caller) {
        Ok(())
    } else {
        Err(LedgerError::Unauthorized(format!(
            "{} is not the contract owner",
            address_to_hex(caller)
        )))
    }
}

pub fn require_nonzero(addr: &Address) -> Result<(), LedgerError> {
    if is_nonzero_address(addr) {
        Ok(())
    } else {
        Err(LedgerError::InvalidAddress)
    }
}

pub fn require_item_exists(state: &LedgerState, id: ItemId) -> Result<&Address, LedgerError> {
    state.item_owner(id).ok_or(LedgerError::UnknownItem(id))
}

pub fn require_item_owner(
    state: &LedgerState,
    id: ItemId,
    caller: &Address,
) -> Result<(), LedgerError> {
    require_item_exists(state, id)?;
    if is_item_owner(state, id, caller) {
        Ok(())
    } else {
        Err(LedgerError::Unauthorized(format!(
            "{} does not own item {}",
            address_to_hex(caller),
            id
        )))
    }
}

pub fn require_approved_or_operator(
    state: &LedgerState,
    id: ItemId,
    from: &Address,
    caller: &Address,
) -> Result<(), LedgerError> {
    if is_approved_or_operator(state, id, from, caller) {
        Ok(())
    } else {
        Err(LedgerError::Unauthorized(format!(
            "{} is neither owner, approved spender nor operator for item {}",
            address_to_hex(caller),
            id
        )))
    }
}
