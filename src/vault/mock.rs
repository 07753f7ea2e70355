//! In-Memory Mock Backend
//!
//! A deterministic stand-in for a real confidential value service.
//! Handles are domain-separated SHA-256 digests over the producing
//! identity, the plaintext and a fresh nonce, so every encryption
//! yields a distinct handle. Sealed values never leave the process.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::ledger::state::{CiphertextHandle, Identity, ValidityProof};
use crate::vault::auth::validate_authorization;
use crate::vault::service::{ConfidentialValueService, ProofVerifier, VaultError};

/// Domain separator for handle derivation.
const HANDLE_DOMAIN: &[u8] = b"bracket-vault-handle:";
/// Domain separator for validity proof derivation.
const PROOF_DOMAIN: &[u8] = b"bracket-vault-proof:";

/// A plaintext held by the mock, bound to its producing identity.
#[derive(Debug, Clone, Copy)]
struct SealedValue {
    plaintext: u32,
    bound: Identity,
}

/// In-memory confidential value service.
pub struct MockVault {
    secret: String,
    sealed: RwLock<BTreeMap<CiphertextHandle, SealedValue>>,
    authorizations: AtomicU64,
}

impl MockVault {
    /// Create a mock vault validating authorizations against `secret`.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            sealed: RwLock::new(BTreeMap::new()),
            authorizations: AtomicU64::new(0),
        }
    }

    /// The HS256 secret this vault validates authorizations with.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Number of decryption authorizations processed so far, including
    /// rejected ones. Lets tests observe how often callers actually
    /// reach the service.
    pub fn authorization_count(&self) -> u64 {
        self.authorizations.load(Ordering::SeqCst)
    }

    /// Number of sealed values currently held.
    pub async fn sealed_count(&self) -> usize {
        self.sealed.read().await.len()
    }

    fn derive_handle(
        &self,
        plaintext: u32,
        bound: &Identity,
        nonce: &Uuid,
    ) -> Result<CiphertextHandle, VaultError> {
        let payload = bincode::serialize(&(bound.as_bytes(), plaintext, nonce.as_bytes()))
            .map_err(|e| VaultError::EncryptionFailure(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(HANDLE_DOMAIN);
        hasher.update(&payload);
        let digest = hasher.finalize();

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Ok(CiphertextHandle::new(bytes))
    }

    fn derive_proof(&self, handle: &CiphertextHandle, bound: &Identity) -> ValidityProof {
        let mut hasher = Sha256::new();
        hasher.update(PROOF_DOMAIN);
        hasher.update(handle.as_bytes());
        hasher.update(bound.as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        ValidityProof::new(bytes)
    }
}

impl ProofVerifier for MockVault {
    fn verify_proof(
        &self,
        handle: &CiphertextHandle,
        proof: &ValidityProof,
        bound: &Identity,
    ) -> bool {
        self.derive_proof(handle, bound) == *proof
    }
}

impl ConfidentialValueService for MockVault {
    async fn encrypt(
        &self,
        plaintext: u32,
        bound: &Identity,
    ) -> Result<(CiphertextHandle, ValidityProof), VaultError> {
        if bound.is_zero() {
            return Err(VaultError::EncryptionFailure(
                "cannot bind ciphertext to the zero identity".into(),
            ));
        }

        let nonce = Uuid::new_v4();
        let handle = self.derive_handle(plaintext, bound, &nonce)?;
        let proof = self.derive_proof(&handle, bound);

        self.sealed.write().await.insert(
            handle,
            SealedValue {
                plaintext,
                bound: *bound,
            },
        );

        tracing::debug!(handle = %handle, "sealed new ciphertext");
        Ok((handle, proof))
    }

    async fn authorize_decrypt(
        &self,
        handle: &CiphertextHandle,
        bound: &Identity,
        authorization: &str,
    ) -> Result<u32, VaultError> {
        self.authorizations.fetch_add(1, Ordering::SeqCst);

        let claims = validate_authorization(authorization, &self.secret)
            .map_err(|e| VaultError::AuthorizationFailure(e.to_string()))?;

        let claimed_identity = claims
            .identity()
            .map_err(|e| VaultError::AuthorizationFailure(e.to_string()))?;
        if claimed_identity != *bound {
            return Err(VaultError::AuthorizationFailure(
                "authorization signed for a different identity".into(),
            ));
        }

        let claimed_handle = claims
            .ciphertext_handle()
            .map_err(|e| VaultError::AuthorizationFailure(e.to_string()))?;
        if claimed_handle != *handle {
            return Err(VaultError::AuthorizationFailure(
                "authorization covers a different handle".into(),
            ));
        }

        let sealed = self.sealed.read().await;
        let value = sealed.get(handle).ok_or(VaultError::UnknownHandle)?;

        if value.bound != *bound {
            return Err(VaultError::AuthorizationFailure(
                "handle is bound to another identity".into(),
            ));
        }

        Ok(value.plaintext)
    }
}

// =============================================================================
// TESTS
// =============================================================================
