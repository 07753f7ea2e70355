//! Prediction Registry
//!
//! Ledger-resident state machine: one registration record per identity,
//! at most one submission ever. `submit` is the sole mutating entry
//! point; all reads are free of side effects.
//!
//! The central concurrency invariant: two near-simultaneous submissions
//! from the same identity result in exactly one accepted and one
//! rejected. The already-submitted check, proof verification, and the
//! state transition all happen under a single write lock, so the
//! read-check-write is indivisible per identity.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::ledger::state::{CiphertextHandle, Identity, RegistrationRecord, ValidityProof};
use crate::vault::service::ProofVerifier;

/// Registry errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Identity already holds a registered prediction.
    #[error("you already submitted")]
    AlreadySubmitted,

    /// The empty-sentinel handle cannot be registered; a record holding
    /// it would be indistinguishable from an unregistered one.
    #[error("ciphertext handle is the reserved empty sentinel")]
    ReservedHandle,

    /// The validity proof did not verify for this handle and identity.
    #[error("validity proof rejected")]
    ProofRejected,
}

/// The prediction registry.
///
/// Generic over the proof-verification contract so tests and
/// deployments can plug different confidential-value backends without
/// the registry depending on any of them.
pub struct PredictionRegistry<P> {
    /// Per-identity records. Identities absent from the map hold the
    /// default (unregistered) record.
    records: RwLock<BTreeMap<Identity, RegistrationRecord>>,
    /// Verification contract of the confidential value service.
    verifier: Arc<P>,
}

impl<P: ProofVerifier> PredictionRegistry<P> {
    /// Create an empty registry backed by the given verifier.
    pub fn new(verifier: Arc<P>) -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            verifier,
        }
    }

    /// Has this identity submitted a prediction? Pure read.
    pub async fn is_registered(&self, identity: &Identity) -> bool {
        let records = self.records.read().await;
        records.get(identity).map(|r| r.registered).unwrap_or(false)
    }

    /// Is this identity still eligible to submit?
    ///
    /// Advisory only: the authoritative check happens inside `submit`,
    /// so callers must not treat a `true` here as a reservation.
    pub async fn can_submit(&self, identity: &Identity) -> bool {
        !self.is_registered(identity).await
    }

    /// The stored ciphertext handle, or the empty sentinel for an
    /// unregistered identity. Pure read.
    pub async fn read_handle(&self, identity: &Identity) -> CiphertextHandle {
        let records = self.records.read().await;
        records
            .get(identity)
            .map(|r| r.handle)
            .unwrap_or(CiphertextHandle::EMPTY)
    }

    /// Record an encrypted prediction for an identity.
    ///
    /// Only on success does the record transition to registered with the
    /// handle stored, atomically. Rejections leave no state change:
    /// `AlreadySubmitted` is checked first, regardless of proof
    /// validity, then the reserved-handle guard, then the proof.
    pub async fn submit(
        &self,
        identity: Identity,
        handle: CiphertextHandle,
        proof: ValidityProof,
    ) -> Result<(), RegistryError> {
        let mut records = self.records.write().await;

        if records.get(&identity).map(|r| r.registered).unwrap_or(false) {
            warn!("submit rejected for {}: already registered", identity);
            return Err(RegistryError::AlreadySubmitted);
        }

        if handle.is_empty() {
            warn!("submit rejected for {}: reserved handle", identity);
            return Err(RegistryError::ReservedHandle);
        }

        if !self.verifier.verify_proof(&handle, &proof, &identity) {
            warn!("submit rejected for {}: proof did not verify", identity);
            return Err(RegistryError::ProofRejected);
        }

        records.insert(identity, RegistrationRecord { registered: true, handle });
        info!("prediction registered for {} under {}", identity, handle);

        Ok(())
    }

    /// Number of identities that have registered a prediction.
    pub async fn registered_count(&self) -> usize {
        let records = self.records.read().await;
        records.values().filter(|r| r.registered).count()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Verifier that accepts any non-tampered proof: valid proofs are
    /// all-one bytes by convention of these tests.
    struct TestVerifier;

    impl ProofVerifier for TestVerifier {
        fn verify_proof(
            &self,
            _handle: &CiphertextHandle,
            proof: &ValidityProof,
            _bound: &Identity,
        ) -> bool {
            proof.0 == [1u8; 32]
        }
    }

    fn test_registry() -> PredictionRegistry<TestVerifier> {
        PredictionRegistry::new(Arc::new(TestVerifier))
    }

    fn good_proof() -> ValidityProof {
        ValidityProof::new([1u8; 32])
    }

    #[tokio::test]
    async fn test_fresh_identity_is_unregistered() {
        let registry = test_registry();
        let identity = Identity::new([7; 20]);

        assert!(!registry.is_registered(&identity).await);
        assert!(registry.can_submit(&identity).await);
        assert!(registry.read_handle(&identity).await.is_empty());
        assert_eq!(registry.registered_count().await, 0);
    }

    #[tokio::test]
    async fn test_submit_registers_and_stores_handle() {
        let registry = test_registry();
        let identity = Identity::new([1; 20]);
        let handle = CiphertextHandle::new([9; 32]);

        registry.submit(identity, handle, good_proof()).await.unwrap();

        assert!(registry.is_registered(&identity).await);
        assert!(!registry.can_submit(&identity).await);
        assert_eq!(registry.read_handle(&identity).await, handle);
        assert!(!registry.read_handle(&identity).await.is_empty());
        assert_eq!(registry.registered_count().await, 1);
    }

    #[tokio::test]
    async fn test_second_submission_rejected() {
        let registry = test_registry();
        let identity = Identity::new([2; 20]);
        let first = CiphertextHandle::new([3; 32]);
        let second = CiphertextHandle::new([4; 32]);

        registry.submit(identity, first, good_proof()).await.unwrap();
        let result = registry.submit(identity, second, good_proof()).await;

        assert_eq!(result, Err(RegistryError::AlreadySubmitted));
        // Original handle untouched.
        assert_eq!(registry.read_handle(&identity).await, first);
    }

    #[tokio::test]
    async fn test_already_submitted_beats_bad_proof() {
        // The duplicate check fires before proof verification.
        let registry = test_registry();
        let identity = Identity::new([2; 20]);

        registry
            .submit(identity, CiphertextHandle::new([3; 32]), good_proof())
            .await
            .unwrap();

        let bad = ValidityProof::new([0xff; 32]);
        let result = registry.submit(identity, CiphertextHandle::new([4; 32]), bad).await;
        assert_eq!(result, Err(RegistryError::AlreadySubmitted));
    }

    #[tokio::test]
    async fn test_reserved_handle_rejected() {
        let registry = test_registry();
        let identity = Identity::new([5; 20]);

        let result = registry
            .submit(identity, CiphertextHandle::EMPTY, good_proof())
            .await;

        assert_eq!(result, Err(RegistryError::ReservedHandle));
        assert!(!registry.is_registered(&identity).await);
    }

    #[tokio::test]
    async fn test_bad_proof_leaves_no_state() {
        let registry = test_registry();
        let identity = Identity::new([6; 20]);
        let bad = ValidityProof::new([0xff; 32]);

        let result = registry
            .submit(identity, CiphertextHandle::new([8; 32]), bad)
            .await;

        assert_eq!(result, Err(RegistryError::ProofRejected));
        assert!(!registry.is_registered(&identity).await);
        assert!(registry.can_submit(&identity).await);
        assert!(registry.read_handle(&identity).await.is_empty());
    }

    #[tokio::test]
    async fn test_identities_are_independent() {
        let registry = test_registry();
        let alice = Identity::new([0xaa; 20]);
        let bob = Identity::new([0xbb; 20]);
        let alice_handle = CiphertextHandle::new([1; 32]);
        let bob_handle = CiphertextHandle::new([2; 32]);

        registry.submit(alice, alice_handle, good_proof()).await.unwrap();
        registry.submit(bob, bob_handle, good_proof()).await.unwrap();

        assert_eq!(registry.read_handle(&alice).await, alice_handle);
        assert_eq!(registry.read_handle(&bob).await, bob_handle);
        assert_eq!(registry.registered_count().await, 2);
    }

    #[tokio::test]
    async fn test_concurrent_submissions_accept_exactly_one() {
        let registry = Arc::new(test_registry());
        let identity = Identity::new([0xcc; 20]);

        let mut tasks = Vec::new();
        for i in 1u8..=8 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                registry
                    .submit(identity, CiphertextHandle::new([i; 32]), good_proof())
                    .await
            }));
        }

        let mut accepted = 0;
        let mut rejected = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(()) => accepted += 1,
                Err(RegistryError::AlreadySubmitted) => rejected += 1,
                Err(other) => panic!("unexpected rejection: {other}"),
            }
        }

        assert_eq!(accepted, 1);
        assert_eq!(rejected, 7);
        assert!(registry.is_registered(&identity).await);
        assert!(!registry.read_handle(&identity).await.is_empty());
    }
}
