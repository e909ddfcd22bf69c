//! Addresses and caller authentication for the ledger

use crate::error::LedgerError;
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use secp256k1::constants::{COMPACT_SIGNATURE_SIZE, PUBLIC_KEY_SIZE};
use secp256k1::ecdsa::Signature;
use secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};

/// Shared secp256k1 context, built once on first use.
static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// A ledger account identifier: 32 bytes, usually the SHA-256 of a public key.
pub type Address = [u8; 32];

/// Reserved sentinel. Never a valid owner, spender, operator or recipient.
pub const NULL_ADDRESS: Address = [0u8; 32];

/// Hashes a label into an address. Handy for tests and scenario files.
pub fn address_from_string(s: &str) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hasher.finalize().into()
}

pub fn address_to_hex(addr: &Address) -> String {
    hex::encode(addr)
}

pub fn address_from_hex(hex_str: &str) -> Result<Address, LedgerError> {
    let bytes = hex::decode(hex_str)
        .map_err(|e| LedgerError::CryptoError(format!("Invalid hex address: {}", e)))?;
    if bytes.len() != 32 {
        return Err(LedgerError::CryptoError(format!(
            "Address must be 32 bytes, got {}",
            bytes.len()
        )));
    }
    bytes
        .try_into()
        .map_err(|_| LedgerError::CryptoError("Failed to convert bytes into address".to_string()))
}

/// Resolves either a 64-character hex address or a human label.
/// The literal `null` maps to [`NULL_ADDRESS`].
pub fn resolve_address(input: &str) -> Address {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("null") {
        return NULL_ADDRESS;
    }
    if trimmed.len() == 64 {
        if let Ok(addr) = address_from_hex(trimmed) {
            return addr;
        }
    }
    address_from_string(trimmed)
}

/// Signing identity of a ledger caller. The caller's address is derived from
/// the public half, so a signed call never names its own caller.
#[derive(Debug, Clone)]
pub struct CallerKey {
    secret: SecretKey,
    public: PublicKey,
}

impl CallerKey {
    pub fn generate() -> Self {
        let (secret, public) = SECP256K1_CONTEXT.generate_keypair(&mut OsRng);
        CallerKey { secret, public }
    }

    pub fn address(&self) -> Address {
        address_of(&self.public)
    }

    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.public.serialize()
    }

    /// Compact signature over the SHA-256 digest of `message`.
    pub fn sign(&self, message: &[u8]) -> [u8; COMPACT_SIGNATURE_SIZE] {
        SECP256K1_CONTEXT
            .sign_ecdsa(&digest_of(message), &self.secret)
            .serialize_compact()
    }
}

/// Checks that `signature` over `message` was made by `public_key` and
/// returns the address the call runs as.
pub fn authenticate_caller(
    public_key: &[u8],
    message: &[u8],
    signature: &[u8],
) -> Result<Address, LedgerError> {
    let public = PublicKey::from_slice(public_key)
        .map_err(|e| LedgerError::CryptoError(format!("Invalid caller key: {}", e)))?;
    let signature = Signature::from_compact(signature)
        .map_err(|e| LedgerError::CryptoError(format!("Malformed signature: {}", e)))?;

    SECP256K1_CONTEXT
        .verify_ecdsa(&digest_of(message), &signature, &public)
        .map_err(|_| {
            LedgerError::CryptoError(format!(
                "Signature does not match caller {}",
                address_to_hex(&address_of(&public))
            ))
        })?;
    Ok(address_of(&public))
}

// Compressed encoding, so one key maps to one address whatever form it
// arrived in.
fn address_of(public: &PublicKey) -> Address {
    Sha256::digest(public.serialize()).into()
}

fn digest_of(message: &[u8]) -> Message {
    Message::from_digest(Sha256::digest(message).into())
}
