//! Ed25519 report signing
//!
//! Key material is supplied by the operator (hex seed or generated key), never built in.

use crate::error::{AuditError, AuditResult};
use ed25519_dalek::{Signature, Signer as DalekSigner, SigningKey, Verifier, VerifyingKey};

/// Trait for report signers
pub trait Signer: Send + Sync {
    /// Get the signer ID
    fn signer_id(&self) -> &str;

    /// Get the public key (hex-encoded)
    fn public_key_hex(&self) -> String;

    /// Sign the exact payload bytes, returning the hex-encoded signature
    fn sign(&self, payload: &[u8]) -> String;

    /// Check a hex signature over `payload` against this signer's public key
    fn verify(&self, payload: &[u8], signature_hex: &str) -> AuditResult<()> {
        verify_signature(&self.public_key_hex(), payload, signature_hex)
    }
}

/// System signer using Ed25519
pub struct SystemSigner {
    signing_key: SigningKey,
}

impl SystemSigner {
    /// Create from a 32-byte seed (hex-encoded)
    pub fn from_hex(hex_seed: &str) -> AuditResult<Self> {
        let bytes = hex::decode(hex_seed.trim())
            .map_err(|e| AuditError::InvalidKey(format!("Invalid key hex: {}", e)))?;

        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| AuditError::InvalidKey("Key must be 32 bytes".to_string()))?;

        Ok(Self {
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    /// Generate a new random signing key
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// Export the seed as hex (for storage)
    pub fn seed_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }
}

impl Signer for SystemSigner {
    fn signer_id(&self) -> &str {
        "SYSTEM"
    }

    fn public_key_hex(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }

    fn sign(&self, payload: &[u8]) -> String {
        hex::encode(self.signing_key.sign(payload).to_bytes())
    }
}

/// Verify a hex-encoded Ed25519 signature with a hex-encoded public key
pub fn verify_signature(public_key_hex: &str, payload: &[u8], signature_hex: &str) -> AuditResult<()> {
    let pk_bytes = hex::decode(public_key_hex)
        .map_err(|e| AuditError::InvalidKey(format!("Invalid public key hex: {}", e)))?;
    let pk_array: [u8; 32] = pk_bytes
        .try_into()
        .map_err(|_| AuditError::InvalidKey("Public key must be 32 bytes".to_string()))?;
    let verifying_key = VerifyingKey::from_bytes(&pk_array)
        .map_err(|e| AuditError::InvalidKey(format!("Invalid public key: {}", e)))?;

    let sig_bytes = hex::decode(signature_hex)
        .map_err(|e| AuditError::SignatureMismatch(format!("Invalid signature hex: {}", e)))?;
    let sig_array: [u8; 64] = sig_bytes
        .try_into()
        .map_err(|_| AuditError::SignatureMismatch("Signature must be 64 bytes".to_string()))?;
    let signature = Signature::from_bytes(&sig_array);

    verifying_key
        .verify(payload, &signature)
        .map_err(|e| AuditError::SignatureMismatch(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let signer = SystemSigner::generate();
        let signature = signer.sign(b"report body");

        assert_eq!(signature.len(), 128);
        assert!(signer.verify(b"report body", &signature).is_ok());
        assert!(matches!(
            signer.verify(b"report bodY", &signature),
            Err(AuditError::SignatureMismatch(_))
        ));
    }

    #[test]
    fn test_seed_roundtrip() {
        let signer = SystemSigner::generate();
        let restored = SystemSigner::from_hex(&signer.seed_hex()).unwrap();
        assert_eq!(signer.public_key_hex(), restored.public_key_hex());
        assert_eq!(signer.sign(b"x"), restored.sign(b"x"));
    }

    #[test]
    fn test_invalid_seed() {
        assert!(matches!(SystemSigner::from_hex("zz"), Err(AuditError::InvalidKey(_))));
        assert!(matches!(SystemSigner::from_hex("abcd"), Err(AuditError::InvalidKey(_))));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let signer = SystemSigner::generate();
        let other = SystemSigner::generate();
        let signature = signer.sign(b"payload");
        assert!(other.verify(b"payload", &signature).is_err());
    }
}
