/// Decoding of calls given as an operation name plus JSON arguments.
///
/// Address arguments accept a 64-hex address, a label (hashed into an
/// address) or `null`. Amounts accept JSON integers or decimal strings, the
/// latter for values beyond `u64`.
use crate::call::types::{Call, FungibleCall, ItemCall};
use crate::crypto::{resolve_address, Address};
use crate::error::LedgerError;
use crate::ledger::{Amount, ItemId};
use serde_json::Value;

pub fn parse_named_call(op: &str, args: &Value) -> Result<Call, LedgerError> {
    let call = match op {
        "transfer" => Call::Fungible(FungibleCall::Transfer {
            to: arg_address(args, "to")?,
            value: arg_amount(args, "value")?,
        }),
        "approve" => Call::Fungible(FungibleCall::Approve {
            spender: arg_address(args, "spender")?,
            value: arg_amount(args, "value")?,
        }),
        "transfer_from" => Call::Fungible(FungibleCall::TransferFrom {
            from: arg_address(args, "from")?,
            to: arg_address(args, "to")?,
            value: arg_amount(args, "value")?,
        }),
        "increase_allowance" => Call::Fungible(FungibleCall::IncreaseAllowance {
            spender: arg_address(args, "spender")?,
            added: arg_amount(args, "added")?,
        }),
        "decrease_allowance" => Call::Fungible(FungibleCall::DecreaseAllowance {
            spender: arg_address(args, "spender")?,
            subtracted: arg_amount(args, "subtracted")?,
        }),
        "mint" => Call::Fungible(FungibleCall::Mint {
            account: arg_address(args, "account")?,
            value: arg_amount(args, "value")?,
        }),
        "burn" => Call::Fungible(FungibleCall::Burn {
            value: arg_amount(args, "value")?,
        }),
        "balance_of" => Call::Fungible(FungibleCall::BalanceOf {
            who: arg_address(args, "who")?,
        }),
        "allowance" => Call::Fungible(FungibleCall::Allowance {
            owner: arg_address(args, "owner")?,
            spender: arg_address(args, "spender")?,
        }),
        "total_supply" => Call::Fungible(FungibleCall::TotalSupply),
        "nft.mint" => Call::Item(ItemCall::Mint {
            id: arg_id(args, "id")?,
            to: arg_address(args, "to")?,
        }),
        "nft.burn" => Call::Item(ItemCall::Burn {
            id: arg_id(args, "id")?,
        }),
        "nft.owner_of" => Call::Item(ItemCall::OwnerOf {
            id: arg_id(args, "id")?,
        }),
        "nft.balance_of" => Call::Item(ItemCall::BalanceOf {
            who: arg_address(args, "who")?,
        }),
        "nft.approve" => Call::Item(ItemCall::Approve {
            id: arg_id(args, "id")?,
            spender: arg_address(args, "spender")?,
        }),
        "nft.get_approved" => Call::Item(ItemCall::GetApproved {
            id: arg_id(args, "id")?,
        }),
        "nft.set_approval_for_all" => Call::Item(ItemCall::SetApprovalForAll {
            operator: arg_address(args, "operator")?,
            approved: arg_bool(args, "approved")?,
        }),
        "nft.is_approved_for_all" => Call::Item(ItemCall::IsApprovedForAll {
            owner: arg_address(args, "owner")?,
            operator: arg_address(args, "operator")?,
        }),
        "nft.transfer_from" => Call::Item(ItemCall::TransferFrom {
            from: arg_address(args, "from")?,
            to: arg_address(args, "to")?,
            id: arg_id(args, "id")?,
        }),
        "nft.total_items" => Call::Item(ItemCall::TotalItems),
        other => {
            return Err(LedgerError::InvalidCall(format!("Unknown operation: {}", other)));
        }
    };
    Ok(call)
}

fn arg<'a>(args: &'a Value, key: &str) -> Result<&'a Value, LedgerError> {
    args.get(key)
        .ok_or_else(|| LedgerError::InvalidCall(format!("Missing argument: {}", key)))
}

fn arg_address(args: &Value, key: &str) -> Result<Address, LedgerError> {
    match arg(args, key)? {
        Value::String(s) => Ok(resolve_address(s)),
        Value::Null => Ok(resolve_address("null")),
        other => Err(LedgerError::InvalidCall(format!(
            "Argument {} must be an address string, got {}",
            key, other
        ))),
    }
}

fn arg_amount(args: &Value, key: &str) -> Result<Amount, LedgerError> {
    match arg(args, key)? {
        Value::Number(n) => n.as_u64().map(Amount::from).ok_or_else(|| {
            LedgerError::InvalidCall(format!(
                "Argument {} must be a non-negative integer, got {}",
                key, n
            ))
        }),
        Value::String(s) => s.trim().parse::<Amount>().map_err(|e| {
            LedgerError::InvalidCall(format!("Argument {} is not a valid amount: {}", key, e))
        }),
        other => Err(LedgerError::InvalidCall(format!(
            "Argument {} must be an amount, got {}",
            key, other
        ))),
    }
}

fn arg_id(args: &Value, key: &str) -> Result<ItemId, LedgerError> {
    arg(args, key)?.as_u64().ok_or_else(|| {
        LedgerError::InvalidCall(format!("Argument {} must be an item id", key))
    })
}

fn arg_bool(args: &Value, key: &str) -> Result<bool, LedgerError> {
    arg(args, key)?
        .as_bool()
        .ok_or_else(|| LedgerError::InvalidCall(format!("Argument {} must be a boolean", key)))
}
