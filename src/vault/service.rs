//! Confidential Value Service Boundary
//!
//! The interface to the external service that produces ciphertext
//! handles from plaintext integers and releases plaintexts against a
//! signed authorization. The core never depends on any particular
//! cryptographic backend: tests use the in-memory mock, production
//! plugs a real scheme behind the same traits.

use crate::ledger::state::{CiphertextHandle, Identity, ValidityProof};

/// Errors from the confidential value boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VaultError {
    /// Plaintext outside the supported width or invalid identity
    /// context.
    #[error("encryption failed: {0}")]
    EncryptionFailure(String),

    /// The signed authorization does not match the caller, or the
    /// handle is bound to another identity.
    #[error("decryption authorization failed: {0}")]
    AuthorizationFailure(String),

    /// The handle was never registered with the service.
    #[error("unknown ciphertext handle")]
    UnknownHandle,

    /// Transport failure. Terminal for the current call; never retried
    /// automatically.
    #[error("confidential value service unreachable: {0}")]
    Unreachable(String),
}

/// Verification contract for validity proofs.
///
/// The registry delegates to this before accepting a submission.
/// Implemented by the same backend that produced the proof.
pub trait ProofVerifier: Send + Sync {
    /// Check that `proof` attests `handle` was correctly formed for
    /// `bound`.
    fn verify_proof(
        &self,
        handle: &CiphertextHandle,
        proof: &ValidityProof,
        bound: &Identity,
    ) -> bool;
}

/// The confidential value service.
///
/// Every call is a round-trip to an external service; callers await
/// completion before proceeding (no overlap between encrypt and submit,
/// nor between authorize and decrypt).
pub trait ConfidentialValueService: Send + Sync {
    /// Encrypt a plaintext integer bound to the producing identity.
    ///
    /// Returns an opaque handle plus a validity proof. Handles are
    /// unique per call and never the empty sentinel.
    fn encrypt(
        &self,
        plaintext: u32,
        bound: &Identity,
    ) -> impl std::future::Future<Output = Result<(CiphertextHandle, ValidityProof), VaultError>> + Send;

    /// Release the plaintext behind a handle, given a signed
    /// authorization from the bound identity.
    fn authorize_decrypt(
        &self,
        handle: &CiphertextHandle,
        bound: &Identity,
        authorization: &str,
    ) -> impl std::future::Future<Output = Result<u32, VaultError>> + Send;
}
