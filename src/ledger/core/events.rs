use super::state::{Amount, ItemId};
use crate::crypto::Address;

/// Record of one successful mutation.
///
/// Mints report `from` as the null address and burns report `to` as the null
/// address, for both fungible units and items.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LedgerEvent {
    Transfer {
        from: Address,
        to: Address,
        value: Amount,
    },
    /// Emitted by `approve` and by allowance adjustments with the new value.
    Approval {
        owner: Address,
        spender: Address,
        value: Amount,
    },
    ItemTransfer {
        from: Address,
        to: Address,
        id: ItemId,
    },
    ItemApproval {
        owner: Address,
        spender: Address,
        id: ItemId,
    },
    ApprovalForAll {
        owner: Address,
        operator: Address,
        approved: bool,
    },
}

impl LedgerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::Transfer { .. } => "Transfer",
            LedgerEvent::Approval { .. } => "Approval",
            LedgerEvent::ItemTransfer { .. } => "ItemTransfer",
            LedgerEvent::ItemApproval { .. } => "ItemApproval",
            LedgerEvent::ApprovalForAll { .. } => "ApprovalForAll",
        }
    }
}
