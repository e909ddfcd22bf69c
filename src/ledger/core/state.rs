use crate::crypto::{Address, NULL_ADDRESS};
use crate::error::LedgerError;
use std::collections::HashMap;

/// Quantity of fungible units.
pub type Amount = u128;
/// Identifier of a non-fungible item.
pub type ItemId = u64;

/// The single state structure shared by the fungible ledger and the item
/// registry.
///
/// Absent map entries read as zero / none. Writers keep the maps canonical by
/// removing entries that fall back to the default, so two states holding the
/// same logical values compare equal.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LedgerState {
    contract_owner: Address,
    pub(crate) total_supply: Amount,
    pub(crate) balances: HashMap<Address, Amount>,
    pub(crate) allowances: HashMap<(Address, Address), Amount>,
    pub(crate) token_owners: HashMap<ItemId, Address>,
    pub(crate) item_approvals: HashMap<ItemId, Address>,
    pub(crate) operator_approvals: HashMap<(Address, Address), bool>,
    /// Items held per address, maintained alongside `token_owners`.
    pub(crate) item_counts: HashMap<Address, u64>,
}

impl LedgerState {
    /// Creates an empty ledger owned by `contract_owner`.
    pub fn new(contract_owner: Address) -> Self {
        Self {
            contract_owner,
            total_supply: 0,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            token_owners: HashMap::new(),
            item_approvals: HashMap::new(),
            operator_approvals: HashMap::new(),
            item_counts: HashMap::new(),
        }
    }

    /// The address allowed to mint. Fixed at construction.
    pub fn contract_owner(&self) -> &Address {
        &self.contract_owner
    }

    // ------------------------------------------------------------------------
    // Default-zero reads
    // ------------------------------------------------------------------------

    pub fn balance_or_zero(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Raw lookup; `None` when the account never held units.
    pub fn lookup_balance(&self, account: &Address) -> Option<Amount> {
        self.balances.get(account).copied()
    }

    pub fn allowance_or_zero(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    pub fn lookup_allowance(&self, owner: &Address, spender: &Address) -> Option<Amount> {
        self.allowances.get(&(*owner, *spender)).copied()
    }

    pub fn item_owner(&self, id: ItemId) -> Option<&Address> {
        self.token_owners.get(&id)
    }

    pub fn item_approval(&self, id: ItemId) -> Option<&Address> {
        self.item_approvals.get(&id)
    }

    pub fn operator_approved(&self, owner: &Address, operator: &Address) -> bool {
        self.operator_approvals
            .get(&(*owner, *operator))
            .copied()
            .unwrap_or(false)
    }

    pub fn item_count_or_zero(&self, owner: &Address) -> u64 {
        self.item_counts.get(owner).copied().unwrap_or(0)
    }

    /// Accounts with a non-zero balance.
    pub fn holders(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    /// Live items and their owners.
    pub fn items(&self) -> impl Iterator<Item = (&ItemId, &Address)> {
        self.token_owners.iter()
    }

    // ------------------------------------------------------------------------
    // Canonical writes
    // ------------------------------------------------------------------------

    pub(crate) fn set_balance(&mut self, account: Address, value: Amount) {
        if value == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, value);
        }
    }

    pub(crate) fn set_allowance(&mut self, owner: Address, spender: Address, value: Amount) {
        if value == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), value);
        }
    }

    pub(crate) fn set_operator(&mut self, owner: Address, operator: Address, approved: bool) {
        if approved {
            self.operator_approvals.insert((owner, operator), true);
        } else {
            self.operator_approvals.remove(&(owner, operator));
        }
    }

    pub(crate) fn set_item_count(&mut self, owner: Address, count: u64) {
        if count == 0 {
            self.item_counts.remove(&owner);
        } else {
            self.item_counts.insert(owner, count);
        }
    }

    /// Recomputes the per-address item counts from the ownership map.
    pub fn rebuild_item_counts(&mut self) {
        self.item_counts.clear();
        for owner in self.token_owners.values() {
            *self.item_counts.entry(*owner).or_insert(0) += 1;
        }
    }

    /// Verifies conservation and item-count consistency, and that the null
    /// address appears in no balance, ownership, approval or allowance record.
    pub fn check_invariants(&self) -> Result<(), LedgerError> {
        let mut sum: Amount = 0;
        for (account, balance) in &self.balances {
            if *account == NULL_ADDRESS {
                return Err(LedgerError::InvariantViolation(
                    "null address holds a balance".to_string(),
                ));
            }
            sum = sum.checked_add(*balance).ok_or(LedgerError::Overflow)?;
        }
        if sum != self.total_supply {
            return Err(LedgerError::InvariantViolation(format!(
                "total supply {} does not match sum of balances {}",
                self.total_supply, sum
            )));
        }

        let mut derived: HashMap<Address, u64> = HashMap::new();
        for (id, owner) in &self.token_owners {
            if *owner == NULL_ADDRESS {
                return Err(LedgerError::InvariantViolation(format!(
                    "item {} is owned by the null address",
                    id
                )));
            }
            *derived.entry(*owner).or_insert(0) += 1;
        }
        if derived != self.item_counts {
            return Err(LedgerError::InvariantViolation(
                "item counts diverge from ownership records".to_string(),
            ));
        }

        if let Some(id) = self
            .item_approvals
            .keys()
            .find(|id| !self.token_owners.contains_key(id))
        {
            return Err(LedgerError::InvariantViolation(format!(
                "approval recorded for missing item {}",
                id
            )));
        }
        if let Some(id) = self
            .item_approvals
            .iter()
            .find_map(|(id, spender)| (*spender == NULL_ADDRESS).then_some(id))
        {
            return Err(LedgerError::InvariantViolation(format!(
                "item {} is approved to the null address",
                id
            )));
        }

        let null_pair = |(owner, other): &(Address, Address)| {
            *owner == NULL_ADDRESS || *other == NULL_ADDRESS
        };
        if self.allowances.keys().any(null_pair) {
            return Err(LedgerError::InvariantViolation(
                "allowance recorded for the null address".to_string(),
            ));
        }
        if self.operator_approvals.keys().any(null_pair) {
            return Err(LedgerError::InvariantViolation(
                "operator approval recorded for the null address".to_string(),
            ));
        }
        Ok(())
    }

    /// Encodes the state with bincode.
    pub fn to_snapshot(&self) -> Result<Vec<u8>, LedgerError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decodes a snapshot, rejecting any that breaks the ledger invariants.
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, LedgerError> {
        let state: LedgerState = bincode::deserialize(bytes)?;
        if state.contract_owner == NULL_ADDRESS {
            return Err(LedgerError::InvariantViolation(
                "contract owner is the null address".to_string(),
            ));
        }
        state.check_invariants()?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::address_from_string;

    #[test]
    fn test_new_state_is_empty() {
        let owner = address_from_string("owner");
        let state = LedgerState::new(owner);
        assert_eq!(state.contract_owner(), &owner);
        assert_eq!(state.total_supply, 0);
        assert_eq!(state.balance_or_zero(&owner), 0);
        assert!(state.lookup_balance(&owner).is_none());
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_zero_writes_remove_entries() {
        let a = address_from_string("a");
        let b = address_from_string("b");
        let mut state = LedgerState::new(a);

        state.set_allowance(a, b, 5);
        assert_eq!(state.lookup_allowance(&a, &b), Some(5));
        state.set_allowance(a, b, 0);
        assert_eq!(state.lookup_allowance(&a, &b), None);
        assert_eq!(state.allowance_or_zero(&a, &b), 0);

        state.set_operator(a, b, true);
        state.set_operator(a, b, false);
        assert!(state.operator_approvals.is_empty());
    }

    #[test]
    fn test_check_invariants_detects_supply_drift() {
        let a = address_from_string("a");
        let mut state = LedgerState::new(a);
        state.set_balance(a, 10);
        let err = state.check_invariants().unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn test_rebuild_item_counts() {
        let a = address_from_string("a");
        let mut state = LedgerState::new(a);
        state.token_owners.insert(1, a);
        state.token_owners.insert(2, a);
        assert!(state.check_invariants().is_err());

        state.rebuild_item_counts();
        assert_eq!(state.item_count_or_zero(&a), 2);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_snapshot_rejects_inconsistent_state() {
        let a = address_from_string("a");
        let mut state = LedgerState::new(a);
        state.total_supply = 3;
        let bytes = state.to_snapshot().unwrap();
        assert!(LedgerState::from_snapshot(&bytes).is_err());

        state.set_balance(a, 3);
        let bytes = state.to_snapshot().unwrap();
        assert_eq!(LedgerState::from_snapshot(&bytes).unwrap(), state);
    }

    #[test]
    fn test_check_invariants_rejects_null_grant_records() {
        let a = address_from_string("a");
        let b = address_from_string("b");

        let mut state = LedgerState::new(a);
        state.set_allowance(NULL_ADDRESS, b, 5);
        let err = state.check_invariants().unwrap_err();
        assert!(err.to_string().contains("allowance recorded for the null address"));

        let mut state = LedgerState::new(a);
        state.set_allowance(a, NULL_ADDRESS, 5);
        assert!(state.check_invariants().is_err());

        let mut state = LedgerState::new(a);
        state.set_operator(NULL_ADDRESS, b, true);
        let err = state.check_invariants().unwrap_err();
        assert!(err.to_string().contains("operator approval"));

        let mut state = LedgerState::new(a);
        state.token_owners.insert(1, a);
        state.rebuild_item_counts();
        state.item_approvals.insert(1, NULL_ADDRESS);
        assert!(state.check_invariants().is_err());
    }
}
