//! Property tests: random call sequences against the ledger state machine

use proptest::prelude::*;
use tokenledger::call::{Call, FungibleCall, ItemCall};
use tokenledger::crypto::{address_from_string, Address, NULL_ADDRESS};
use tokenledger::ledger::{is_approved_or_operator, LedgerEvent};
use tokenledger::LedgerState;

const ACCOUNTS: usize = 5;

/// Index 0 is the contract owner; the last slot is the null address.
fn account(i: usize) -> Address {
    match i {
        0 => address_from_string("owner"),
        i if i == ACCOUNTS - 1 => NULL_ADDRESS,
        i => address_from_string(&format!("account{}", i)),
    }
}

fn arb_account() -> impl Strategy<Value = Address> {
    (0..ACCOUNTS).prop_map(account)
}

fn arb_amount() -> impl Strategy<Value = u128> {
    prop_oneof![Just(0u128), 1u128..50, 50u128..500]
}

fn arb_call() -> impl Strategy<Value = Call> {
    prop_oneof![
        (arb_account(), arb_amount())
            .prop_map(|(to, value)| Call::Fungible(FungibleCall::Transfer { to, value })),
        (arb_account(), arb_amount())
            .prop_map(|(spender, value)| Call::Fungible(FungibleCall::Approve { spender, value })),
        (arb_account(), arb_account(), arb_amount()).prop_map(|(from, to, value)| {
            Call::Fungible(FungibleCall::TransferFrom { from, to, value })
        }),
        (arb_account(), arb_amount()).prop_map(|(spender, added)| {
            Call::Fungible(FungibleCall::IncreaseAllowance { spender, added })
        }),
        (arb_account(), arb_amount()).prop_map(|(spender, subtracted)| {
            Call::Fungible(FungibleCall::DecreaseAllowance { spender, subtracted })
        }),
        (arb_account(), arb_amount())
            .prop_map(|(account, value)| Call::Fungible(FungibleCall::Mint { account, value })),
        arb_amount().prop_map(|value| Call::Fungible(FungibleCall::Burn { value })),
        (0u64..6, arb_account()).prop_map(|(id, to)| Call::Item(ItemCall::Mint { id, to })),
        (0u64..6).prop_map(|id| Call::Item(ItemCall::Burn { id })),
        (0u64..6, arb_account())
            .prop_map(|(id, spender)| Call::Item(ItemCall::Approve { id, spender })),
        (arb_account(), any::<bool>()).prop_map(|(operator, approved)| {
            Call::Item(ItemCall::SetApprovalForAll { operator, approved })
        }),
        (arb_account(), arb_account(), 0u64..6)
            .prop_map(|(from, to, id)| Call::Item(ItemCall::TransferFrom { from, to, id })),
    ]
}

fn arb_steps() -> impl Strategy<Value = Vec<(Address, Call)>> {
    prop::collection::vec((arb_account(), arb_call()), 1..60)
}

proptest! {
    /// Total supply always equals the sum of balances and every item has
    /// exactly one non-null owner.
    #[test]
    fn supply_and_ownership_conserved(steps in arb_steps()) {
        let mut state = LedgerState::new(account(0));
        for (caller, call) in &steps {
            let _ = state.apply_call(caller, call);
            prop_assert!(state.check_invariants().is_ok(), "{:?}", state.check_invariants());

            let sum: u128 = state.holders().map(|(_, b)| *b).sum();
            prop_assert_eq!(sum, state.total_supply());
            for (id, owner) in state.items() {
                prop_assert_ne!(*owner, NULL_ADDRESS);
                prop_assert_eq!(state.owner_of(*id).unwrap(), *owner);
            }
        }
    }

    /// A rejected call leaves every field of the state as it was.
    #[test]
    fn rejected_calls_change_nothing(steps in arb_steps()) {
        let mut state = LedgerState::new(account(0));
        for (caller, call) in &steps {
            let before = state.clone();
            if state.apply_call(caller, call).is_err() {
                prop_assert_eq!(&state, &before);
            }
        }
    }

    /// Mutations succeed only for callers entitled to make them.
    #[test]
    fn authorization_enforced(steps in arb_steps()) {
        let owner = account(0);
        let mut state = LedgerState::new(owner);
        for (caller, call) in &steps {
            let before = state.clone();
            let result = state.apply_call(caller, call);
            if result.is_err() {
                continue;
            }
            match call {
                Call::Fungible(FungibleCall::Mint { .. }) | Call::Item(ItemCall::Mint { .. }) => {
                    prop_assert_eq!(caller, &owner);
                }
                Call::Fungible(FungibleCall::TransferFrom { from, value, .. }) => {
                    prop_assert!(before.allowance(from, caller) >= *value);
                    prop_assert_eq!(
                        state.allowance(from, caller),
                        before.allowance(from, caller) - value
                    );
                }
                Call::Item(ItemCall::TransferFrom { from, id, .. }) => {
                    prop_assert!(is_approved_or_operator(&before, *id, from, caller));
                    prop_assert_eq!(before.owner_of(*id).unwrap(), *from);
                    prop_assert_eq!(state.get_approved(*id).unwrap(), None);
                }
                Call::Item(ItemCall::Burn { id }) | Call::Item(ItemCall::Approve { id, .. }) => {
                    prop_assert_eq!(before.owner_of(*id).unwrap(), *caller);
                }
                _ => {}
            }
        }
    }

    /// Every successful mutation reports the event matching its effect.
    #[test]
    fn events_describe_supply_changes(steps in arb_steps()) {
        let mut state = LedgerState::new(account(0));
        for (caller, call) in &steps {
            let supply = state.total_supply();
            if let Ok(applied) = state.apply_call(caller, call) {
                match applied.event {
                    Some(LedgerEvent::Transfer { from, value, .. }) if from == NULL_ADDRESS => {
                        prop_assert_eq!(state.total_supply(), supply + value);
                    }
                    Some(LedgerEvent::Transfer { to, value, .. }) if to == NULL_ADDRESS => {
                        prop_assert_eq!(state.total_supply(), supply - value);
                    }
                    _ => prop_assert_eq!(state.total_supply(), supply),
                }
            }
        }
    }
}
