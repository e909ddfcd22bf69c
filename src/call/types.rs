/// Call types for the token ledger
use crate::crypto::{Address, CallerKey};
use crate::error::LedgerError;
use crate::ledger::{Amount, ItemId};
use sha2::{Digest, Sha256};

/// Default upper bound on the encoded size of a call, in bytes.
pub const MAX_CALL_SIZE: usize = 4_096;

/// Operations of the fungible ledger.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FungibleCall {
    Transfer { to: Address, value: Amount },
    Approve { spender: Address, value: Amount },
    TransferFrom { from: Address, to: Address, value: Amount },
    IncreaseAllowance { spender: Address, added: Amount },
    DecreaseAllowance { spender: Address, subtracted: Amount },
    Mint { account: Address, value: Amount },
    Burn { value: Amount },
    BalanceOf { who: Address },
    Allowance { owner: Address, spender: Address },
    TotalSupply,
}

/// Operations of the item registry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ItemCall {
    Mint { id: ItemId, to: Address },
    Burn { id: ItemId },
    OwnerOf { id: ItemId },
    BalanceOf { who: Address },
    Approve { id: ItemId, spender: Address },
    GetApproved { id: ItemId },
    SetApprovalForAll { operator: Address, approved: bool },
    IsApprovedForAll { owner: Address, operator: Address },
    TransferFrom { from: Address, to: Address, id: ItemId },
    TotalItems,
}

/// A single invocation: operation name plus arguments. The caller identity is
/// supplied separately by whoever executes it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Call {
    Fungible(FungibleCall),
    Item(ItemCall),
}

impl Call {
    /// Operation name. Item operations carry an `nft.` prefix.
    pub fn name(&self) -> &'static str {
        match self {
            Call::Fungible(call) => match call {
                FungibleCall::Transfer { .. } => "transfer",
                FungibleCall::Approve { .. } => "approve",
                FungibleCall::TransferFrom { .. } => "transfer_from",
                FungibleCall::IncreaseAllowance { .. } => "increase_allowance",
                FungibleCall::DecreaseAllowance { .. } => "decrease_allowance",
                FungibleCall::Mint { .. } => "mint",
                FungibleCall::Burn { .. } => "burn",
                FungibleCall::BalanceOf { .. } => "balance_of",
                FungibleCall::Allowance { .. } => "allowance",
                FungibleCall::TotalSupply => "total_supply",
            },
            Call::Item(call) => match call {
                ItemCall::Mint { .. } => "nft.mint",
                ItemCall::Burn { .. } => "nft.burn",
                ItemCall::OwnerOf { .. } => "nft.owner_of",
                ItemCall::BalanceOf { .. } => "nft.balance_of",
                ItemCall::Approve { .. } => "nft.approve",
                ItemCall::GetApproved { .. } => "nft.get_approved",
                ItemCall::SetApprovalForAll { .. } => "nft.set_approval_for_all",
                ItemCall::IsApprovedForAll { .. } => "nft.is_approved_for_all",
                ItemCall::TransferFrom { .. } => "nft.transfer_from",
                ItemCall::TotalItems => "nft.total_items",
            },
        }
    }

    /// True for calls that never mutate state.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Call::Fungible(FungibleCall::BalanceOf { .. })
                | Call::Fungible(FungibleCall::Allowance { .. })
                | Call::Fungible(FungibleCall::TotalSupply)
                | Call::Item(ItemCall::OwnerOf { .. })
                | Call::Item(ItemCall::BalanceOf { .. })
                | Call::Item(ItemCall::GetApproved { .. })
                | Call::Item(ItemCall::IsApprovedForAll { .. })
                | Call::Item(ItemCall::TotalItems)
        )
    }

    /// Canonical bincode encoding.
    pub fn encode(&self) -> Result<Vec<u8>, LedgerError> {
        Ok(bincode::serialize(self)?)
    }

    /// SHA-256 over the canonical encoding.
    pub fn hash(&self) -> Result<[u8; 32], LedgerError> {
        let mut hasher = Sha256::new();
        hasher.update(self.encode()?);
        Ok(hasher.finalize().into())
    }

    pub fn hash_str(&self) -> Result<String, LedgerError> {
        Ok(hex::encode(self.hash()?))
    }
}

/// Typed success value of a call.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CallOutcome {
    Unit,
    Amount(Amount),
    Count(u64),
    Address(Address),
    OptionalAddress(Option<Address>),
    Bool(bool),
}

impl CallOutcome {
    pub fn as_amount(&self) -> Option<Amount> {
        match self {
            CallOutcome::Amount(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            CallOutcome::Count(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            CallOutcome::Address(a) => Some(*a),
            CallOutcome::OptionalAddress(a) => *a,
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CallOutcome::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// A call authenticated by a secp256k1 signature. The caller identity is the
/// address of the signing key, never an argument.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SignedCall {
    pub call: Call,
    /// Must exceed the last nonce accepted from the same caller.
    pub nonce: u64,
    pub signature: Option<Vec<u8>>,
    pub public_key: Option<Vec<u8>>,
}

impl SignedCall {
    pub fn new(call: Call, nonce: u64) -> Self {
        SignedCall {
            call,
            nonce,
            signature: None,
            public_key: None,
        }
    }

    pub fn signable_message(&self) -> Result<Vec<u8>, LedgerError> {
        let mut message = Vec::new();
        message.extend_from_slice("CALL:".as_bytes());
        message.extend_from_slice(&self.call.hash()?);
        message.extend_from_slice(&self.nonce.to_le_bytes());
        Ok(message)
    }

    pub fn sign(&mut self, signature: Vec<u8>, public_key: Vec<u8>) {
        self.signature = Some(signature);
        self.public_key = Some(public_key);
    }

    /// Signs with `key`, consuming and returning the envelope.
    pub fn signed_by(mut self, key: &CallerKey) -> Result<Self, LedgerError> {
        let message = self.signable_message()?;
        let signature = key.sign(&message);
        self.sign(signature.to_vec(), key.public_key_bytes().to_vec());
        Ok(self)
    }
}
