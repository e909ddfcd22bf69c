use super::events::LedgerEvent;
use super::state::LedgerState;
use crate::call::{Call, CallOutcome, FungibleCall, ItemCall};
use crate::crypto::Address;
use crate::error::LedgerError;

/// Result of a successfully applied call. Read-only calls carry no event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub outcome: CallOutcome,
    pub event: Option<LedgerEvent>,
}

impl Applied {
    fn mutation(event: LedgerEvent) -> Self {
        Self {
            outcome: CallOutcome::Unit,
            event: Some(event),
        }
    }

    fn read(outcome: CallOutcome) -> Self {
        Self {
            outcome,
            event: None,
        }
    }
}

impl LedgerState {
    /// Routes `call` to the ledger operation it names, on behalf of `caller`.
    pub fn apply_call(&mut self, caller: &Address, call: &Call) -> Result<Applied, LedgerError> {
        let event = match call {
            Call::Fungible(FungibleCall::Transfer { to, value }) => {
                self.transfer(caller, to, *value)?
            }
            Call::Fungible(FungibleCall::Approve { spender, value }) => {
                self.approve(caller, spender, *value)?
            }
            Call::Fungible(FungibleCall::TransferFrom { from, to, value }) => {
                self.transfer_from(caller, from, to, *value)?
            }
            Call::Fungible(FungibleCall::IncreaseAllowance { spender, added }) => {
                self.increase_allowance(caller, spender, *added)?
            }
            Call::Fungible(FungibleCall::DecreaseAllowance { spender, subtracted }) => {
                self.decrease_allowance(caller, spender, *subtracted)?
            }
            Call::Fungible(FungibleCall::Mint { account, value }) => {
                self.mint(caller, account, *value)?
            }
            Call::Fungible(FungibleCall::Burn { value }) => self.burn(caller, *value)?,
            Call::Item(ItemCall::Mint { id, to }) => self.mint_item(caller, *id, to)?,
            Call::Item(ItemCall::Burn { id }) => self.burn_item(caller, *id)?,
            Call::Item(ItemCall::Approve { id, spender }) => {
                self.approve_item(caller, *id, spender)?
            }
            Call::Item(ItemCall::SetApprovalForAll { operator, approved }) => {
                self.set_approval_for_all(caller, operator, *approved)?
            }
            Call::Item(ItemCall::TransferFrom { from, to, id }) => {
                self.transfer_item_from(caller, from, to, *id)?
            }
            _ => return self.query(call).map(Applied::read),
        };
        Ok(Applied::mutation(event))
    }

    /// Answers a read-only call. Mutating calls are refused.
    pub fn query(&self, call: &Call) -> Result<CallOutcome, LedgerError> {
        let outcome = match call {
            Call::Fungible(FungibleCall::BalanceOf { who }) => {
                CallOutcome::Amount(self.balance_of(who))
            }
            Call::Fungible(FungibleCall::Allowance { owner, spender }) => {
                CallOutcome::Amount(self.allowance(owner, spender))
            }
            Call::Fungible(FungibleCall::TotalSupply) => CallOutcome::Amount(self.total_supply()),
            Call::Item(ItemCall::OwnerOf { id }) => CallOutcome::Address(self.owner_of(*id)?),
            Call::Item(ItemCall::BalanceOf { who }) => {
                CallOutcome::Count(self.item_balance_of(who))
            }
            Call::Item(ItemCall::GetApproved { id }) => {
                CallOutcome::OptionalAddress(self.get_approved(*id)?)
            }
            Call::Item(ItemCall::IsApprovedForAll { owner, operator }) => {
                CallOutcome::Bool(self.is_approved_for_all(owner, operator))
            }
            Call::Item(ItemCall::TotalItems) => CallOutcome::Count(self.item_supply()),
            _ => {
                return Err(LedgerError::InvalidCall(format!(
                    "{} mutates state and cannot be queried",
                    call.name()
                )));
            }
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::address_from_string;

    #[test]
    fn test_apply_routes_mutations_and_reads() {
        let owner = address_from_string("owner");
        let alice = address_from_string("alice");
        let mut state = LedgerState::new(owner);

        let applied = state
            .apply_call(&owner, &Call::Fungible(FungibleCall::Mint { account: alice, value: 9 }))
            .unwrap();
        assert_eq!(applied.outcome, CallOutcome::Unit);
        assert!(matches!(applied.event, Some(LedgerEvent::Transfer { value: 9, .. })));

        let applied = state
            .apply_call(&alice, &Call::Fungible(FungibleCall::BalanceOf { who: alice }))
            .unwrap();
        assert_eq!(applied.outcome.as_amount(), Some(9));
        assert!(applied.event.is_none());

        state
            .apply_call(&owner, &Call::Item(ItemCall::Mint { id: 4, to: alice }))
            .unwrap();
        let applied = state
            .apply_call(&owner, &Call::Item(ItemCall::OwnerOf { id: 4 }))
            .unwrap();
        assert_eq!(applied.outcome.as_address(), Some(alice));
    }

    #[test]
    fn test_apply_propagates_errors() {
        let owner = address_from_string("owner");
        let mut state = LedgerState::new(owner);
        let before = state.clone();

        let err = state
            .apply_call(&owner, &Call::Item(ItemCall::OwnerOf { id: 1 }))
            .unwrap_err();
        assert_eq!(err, LedgerError::UnknownItem(1));
        assert_eq!(state, before);
    }

    #[test]
    fn test_query_refuses_mutations() {
        let owner = address_from_string("owner");
        let state = LedgerState::new(owner);

        let err = state
            .query(&Call::Fungible(FungibleCall::Burn { value: 1 }))
            .unwrap_err();
        assert!(err.to_string().contains("burn mutates state"));
        assert_eq!(
            state.query(&Call::Item(ItemCall::TotalItems)).unwrap(),
            CallOutcome::Count(0)
        );
    }
}
