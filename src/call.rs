//! Call envelopes split into types, stateless validation and name-based parsing

pub mod parse;
pub mod types;
pub mod validation;

pub use parse::parse_named_call;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{address_from_string, CallerKey, NULL_ADDRESS};
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_call_names_and_read_only() {
        let bob = address_from_string("bob");
        let transfer = Call::Fungible(FungibleCall::Transfer { to: bob, value: 1 });
        assert_eq!(transfer.name(), "transfer");
        assert!(!transfer.is_read_only());

        let owner_of = Call::Item(ItemCall::OwnerOf { id: 3 });
        assert_eq!(owner_of.name(), "nft.owner_of");
        assert!(owner_of.is_read_only());
    }

    #[test]
    fn test_call_hash_depends_on_arguments() {
        let bob = address_from_string("bob");
        let a = Call::Fungible(FungibleCall::Transfer { to: bob, value: 1 });
        let b = Call::Fungible(FungibleCall::Transfer { to: bob, value: 2 });
        assert_eq!(a.hash().unwrap(), a.clone().hash().unwrap());
        assert_ne!(a.hash().unwrap(), b.hash().unwrap());
        assert_eq!(a.hash_str().unwrap().len(), 64);
    }

    #[test]
    fn test_validate_size() {
        let call = Call::Fungible(FungibleCall::TotalSupply);
        assert!(call.validate_size(MAX_CALL_SIZE).is_ok());

        let err = call.validate_size(1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCall);
        assert!(err.to_string().contains("Call too large"));
    }

    #[test]
    fn test_signed_call_verifies_to_signer_address() {
        let key = CallerKey::generate();
        let call = Call::Fungible(FungibleCall::Burn { value: 5 });
        let signed = SignedCall::new(call, 1).signed_by(&key).unwrap();

        assert_eq!(signed.verify().unwrap(), key.address());
    }

    #[test]
    fn test_unsigned_call_fails() {
        let signed = SignedCall::new(Call::Fungible(FungibleCall::TotalSupply), 1);
        let err = signed.verify().unwrap_err();
        assert_eq!(err.to_string(), "Invalid call: Call not signed");
    }

    #[test]
    fn test_tampered_call_fails_verification() {
        let key = CallerKey::generate();
        let bob = address_from_string("bob");
        let mut signed = SignedCall::new(Call::Fungible(FungibleCall::Transfer { to: bob, value: 1 }), 1)
            .signed_by(&key)
            .unwrap();

        signed.call = Call::Fungible(FungibleCall::Transfer { to: bob, value: 1_000 });
        assert_eq!(signed.verify().unwrap_err().kind(), ErrorKind::CryptoError);

        let mut replayed = signed.clone();
        replayed.nonce = 2;
        assert!(replayed.verify().is_err());
    }

    #[test]
    fn test_parse_named_call() {
        let call = parse_named_call("transfer", &json!({"to": "bob", "value": 4})).unwrap();
        assert_eq!(
            call,
            Call::Fungible(FungibleCall::Transfer {
                to: address_from_string("bob"),
                value: 4
            })
        );

        let call = parse_named_call("mint", &json!({"account": "alice", "value": "340282366920938463463374607431768211455"}))
            .unwrap();
        assert_eq!(
            call,
            Call::Fungible(FungibleCall::Mint {
                account: address_from_string("alice"),
                value: u128::MAX
            })
        );

        let call = parse_named_call("nft.transfer_from", &json!({"from": "a", "to": null, "id": 7})).unwrap();
        assert_eq!(
            call,
            Call::Item(ItemCall::TransferFrom {
                from: address_from_string("a"),
                to: NULL_ADDRESS,
                id: 7
            })
        );

        let call = parse_named_call("total_supply", &json!({})).unwrap();
        assert_eq!(call, Call::Fungible(FungibleCall::TotalSupply));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_named_call("explode", &json!({})).is_err());

        let err = parse_named_call("transfer", &json!({"to": "bob"})).unwrap_err();
        assert!(err.to_string().contains("Missing argument: value"));

        let err = parse_named_call("transfer", &json!({"to": "bob", "value": -3})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCall);

        let err = parse_named_call("nft.set_approval_for_all", &json!({"operator": "op", "approved": "yes"}))
            .unwrap_err();
        assert!(err.to_string().contains("must be a boolean"));
    }
}
