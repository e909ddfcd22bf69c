//! Non-fungible item registry.
//!
//! Item operations carry an `item` infix where their fungible counterpart
//! shares the name (`mint_item`, `burn_item`, `item_balance_of`,
//! `approve_item`, `transfer_item_from`).

use super::events::LedgerEvent;
use super::guard::{
    require_approved_or_operator, require_item_exists, require_item_owner, require_nonzero,
    require_owner,
};
use super::state::{ItemId, LedgerState};
use crate::crypto::{Address, NULL_ADDRESS};
use crate::error::LedgerError;

impl LedgerState {
    /// Number of live items.
    pub fn item_supply(&self) -> u64 {
        self.token_owners.len() as u64
    }

    pub fn owner_of(&self, id: ItemId) -> Result<Address, LedgerError> {
        require_item_exists(self, id).copied()
    }

    pub fn item_balance_of(&self, who: &Address) -> u64 {
        self.item_count_or_zero(who)
    }

    /// Approved spender of an existing item, if any.
    pub fn get_approved(&self, id: ItemId) -> Result<Option<Address>, LedgerError> {
        require_item_exists(self, id)?;
        Ok(self.item_approval(id).copied())
    }

    pub fn is_approved_for_all(&self, owner: &Address, operator: &Address) -> bool {
        self.operator_approved(owner, operator)
    }

    /// Creates item `id` owned by `to`. Contract owner only.
    pub fn mint_item(
        &mut self,
        caller: &Address,
        id: ItemId,
        to: &Address,
    ) -> Result<LedgerEvent, LedgerError> {
        require_owner(self, caller)?;
        if self.token_owners.contains_key(&id) {
            return Err(LedgerError::DuplicateItem(id));
        }
        require_nonzero(to)?;

        let count = self.item_count_or_zero(to) + 1;
        self.token_owners.insert(id, *to);
        self.set_item_count(*to, count);
        Ok(LedgerEvent::ItemTransfer {
            from: NULL_ADDRESS,
            to: *to,
            id,
        })
    }

    /// Destroys item `id`. Only its owner may burn it.
    pub fn burn_item(&mut self, caller: &Address, id: ItemId) -> Result<LedgerEvent, LedgerError> {
        require_item_owner(self, id, caller)?;

        let count = self.item_count_or_zero(caller).saturating_sub(1);
        self.token_owners.remove(&id);
        self.item_approvals.remove(&id);
        self.set_item_count(*caller, count);
        Ok(LedgerEvent::ItemTransfer {
            from: *caller,
            to: NULL_ADDRESS,
            id,
        })
    }

    /// Grants `spender` the right to move item `id`. Approving the null
    /// address clears the current approval.
    pub fn approve_item(
        &mut self,
        caller: &Address,
        id: ItemId,
        spender: &Address,
    ) -> Result<LedgerEvent, LedgerError> {
        require_item_owner(self, id, caller)?;

        if *spender == NULL_ADDRESS {
            self.item_approvals.remove(&id);
        } else {
            self.item_approvals.insert(id, *spender);
        }
        Ok(LedgerEvent::ItemApproval {
            owner: *caller,
            spender: *spender,
            id,
        })
    }

    /// Grants or revokes `operator` rights over every item the caller owns.
    pub fn set_approval_for_all(
        &mut self,
        caller: &Address,
        operator: &Address,
        approved: bool,
    ) -> Result<LedgerEvent, LedgerError> {
        require_nonzero(caller)?;
        require_nonzero(operator)?;

        self.set_operator(*caller, *operator, approved);
        Ok(LedgerEvent::ApprovalForAll {
            owner: *caller,
            operator: *operator,
            approved,
        })
    }

    /// Moves item `id` from `from` to `to` on behalf of the caller.
    pub fn transfer_item_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        id: ItemId,
    ) -> Result<LedgerEvent, LedgerError> {
        let owner = *require_item_exists(self, id)?;
        require_approved_or_operator(self, id, from, caller)?;
        require_nonzero(to)?;
        if owner != *from {
            return Err(LedgerError::OwnerMismatch {
                id,
                expected: *from,
                actual: owner,
            });
        }

        self.item_approvals.remove(&id);
        if from != to {
            let from_count = self.item_count_or_zero(from).saturating_sub(1);
            let to_count = self.item_count_or_zero(to) + 1;
            self.token_owners.insert(id, *to);
            self.set_item_count(*from, from_count);
            self.set_item_count(*to, to_count);
        }
        Ok(LedgerEvent::ItemTransfer {
            from: *from,
            to: *to,
            id,
        })
    }
}
