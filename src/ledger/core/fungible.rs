//! Fungible ledger: balances, allowances and total supply.
//!
//! Every mutating operation validates all of its preconditions before the
//! first write, so an `Err` always leaves the state untouched.

use super::events::LedgerEvent;
use super::guard::{require_nonzero, require_owner};
use super::state::{Amount, LedgerState};
use crate::crypto::{Address, NULL_ADDRESS};
use crate::error::LedgerError;

impl LedgerState {
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn balance_of(&self, who: &Address) -> Amount {
        self.balance_or_zero(who)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowance_or_zero(owner, spender)
    }

    /// Moves `value` units from the caller to `to`.
    pub fn transfer(
        &mut self,
        caller: &Address,
        to: &Address,
        value: Amount,
    ) -> Result<LedgerEvent, LedgerError> {
        self.move_balance(caller, to, value)
    }

    /// Sets the caller's allowance for `spender` to exactly `value`.
    pub fn approve(
        &mut self,
        caller: &Address,
        spender: &Address,
        value: Amount,
    ) -> Result<LedgerEvent, LedgerError> {
        require_nonzero(caller)?;
        if value == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        require_nonzero(spender)?;

        self.set_allowance(*caller, *spender, value);
        Ok(LedgerEvent::Approval {
            owner: *caller,
            spender: *spender,
            value,
        })
    }

    /// Spends `value` of `from`'s allowance to the caller, moving the units to
    /// `to`. Either both the allowance and the balances change, or neither.
    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        value: Amount,
    ) -> Result<LedgerEvent, LedgerError> {
        let allowance = self.allowance_or_zero(from, caller);
        if allowance < value {
            return Err(LedgerError::AllowanceExceeded {
                owner: *from,
                spender: *caller,
                allowance,
                requested: value,
            });
        }

        // move_balance writes nothing on failure.
        let event = self.move_balance(from, to, value)?;
        self.set_allowance(*from, *caller, allowance - value);
        Ok(event)
    }

    pub fn increase_allowance(
        &mut self,
        caller: &Address,
        spender: &Address,
        added: Amount,
    ) -> Result<LedgerEvent, LedgerError> {
        require_nonzero(caller)?;
        require_nonzero(spender)?;
        let value = self
            .allowance_or_zero(caller, spender)
            .checked_add(added)
            .ok_or(LedgerError::Overflow)?;

        self.set_allowance(*caller, *spender, value);
        Ok(LedgerEvent::Approval {
            owner: *caller,
            spender: *spender,
            value,
        })
    }

    /// Lowers the allowance; never clamps at zero.
    pub fn decrease_allowance(
        &mut self,
        caller: &Address,
        spender: &Address,
        subtracted: Amount,
    ) -> Result<LedgerEvent, LedgerError> {
        require_nonzero(caller)?;
        require_nonzero(spender)?;
        let allowance = self.allowance_or_zero(caller, spender);
        let value = allowance
            .checked_sub(subtracted)
            .ok_or(LedgerError::AllowanceUnderflow {
                owner: *caller,
                spender: *spender,
                allowance,
                subtracted,
            })?;

        self.set_allowance(*caller, *spender, value);
        Ok(LedgerEvent::Approval {
            owner: *caller,
            spender: *spender,
            value,
        })
    }

    /// Creates `value` new units for `account`. Contract owner only.
    pub fn mint(
        &mut self,
        caller: &Address,
        account: &Address,
        value: Amount,
    ) -> Result<LedgerEvent, LedgerError> {
        require_owner(self, caller)?;
        require_nonzero(account)?;

        let supply = self
            .total_supply
            .checked_add(value)
            .ok_or(LedgerError::Overflow)?;
        // Bounded by supply, cannot overflow once supply did not.
        let balance = self.balance_or_zero(account) + value;

        self.total_supply = supply;
        self.set_balance(*account, balance);
        Ok(LedgerEvent::Transfer {
            from: NULL_ADDRESS,
            to: *account,
            value,
        })
    }

    /// Destroys `value` of the caller's units.
    pub fn burn(&mut self, caller: &Address, value: Amount) -> Result<LedgerEvent, LedgerError> {
        let balance = self.balance_or_zero(caller);
        if balance < value {
            return Err(LedgerError::InsufficientBalance {
                account: *caller,
                balance,
                requested: value,
            });
        }

        self.total_supply -= value;
        self.set_balance(*caller, balance - value);
        Ok(LedgerEvent::Transfer {
            from: *caller,
            to: NULL_ADDRESS,
            value,
        })
    }

    /// Shared primitive behind `transfer` and `transfer_from`.
    fn move_balance(
        &mut self,
        from: &Address,
        to: &Address,
        value: Amount,
    ) -> Result<LedgerEvent, LedgerError> {
        if value == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let from_balance = self.balance_or_zero(from);
        if value > from_balance {
            return Err(LedgerError::InsufficientBalance {
                account: *from,
                balance: from_balance,
                requested: value,
            });
        }
        require_nonzero(to)?;

        if from != to {
            let to_balance = self
                .balance_or_zero(to)
                .checked_add(value)
                .ok_or(LedgerError::Overflow)?;
            self.set_balance(*from, from_balance - value);
            self.set_balance(*to, to_balance);
        }

        Ok(LedgerEvent::Transfer {
            from: *from,
            to: *to,
            value,
        })
    }
}
