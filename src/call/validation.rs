/// Stateless validation for calls, separated from the type definitions
use crate::call::types::{Call, SignedCall};
use crate::crypto::{authenticate_caller, Address};
use crate::error::LedgerError;

impl Call {
    /// Rejects calls whose canonical encoding exceeds `max_size` bytes.
    pub fn validate_size(&self, max_size: usize) -> Result<(), LedgerError> {
        let size = bincode::serialized_size(self)? as usize;
        if size > max_size {
            return Err(LedgerError::InvalidCall(format!(
                "Call too large: {} bytes (max: {})",
                size, max_size
            )));
        }
        Ok(())
    }
}

impl SignedCall {
    /// Checks the signature and returns the authenticated caller address.
    pub fn verify(&self) -> Result<Address, LedgerError> {
        let (signature, public_key) = match (&self.signature, &self.public_key) {
            (Some(sig), Some(pk)) => (sig, pk),
            _ => {
                return Err(LedgerError::InvalidCall("Call not signed".to_string()));
            }
        };

        let message = self.signable_message()?;
        authenticate_caller(public_key, &message, signature)
    }
}
