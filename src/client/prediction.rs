//! Prediction Client
//!
//! Single-session orchestration over the registry and the confidential
//! value service: encrypt-then-submit, authorized decryption with a
//! local plaintext cache, and a polling snapshot for UI surfaces.
//!
//! The client is `&mut self` throughout. One session, one owner, no
//! internal locking; the registry's lock is the only shared state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::client::context::SessionContext;
use crate::ledger::registry::{PredictionRegistry, RegistryError};
use crate::ledger::state::CiphertextHandle;
use crate::vault::service::{ConfidentialValueService, ProofVerifier, VaultError};

/// Client-side failures.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The session may not perform this action: no signer, a call in
    /// flight, or a prediction already on record.
    #[error("session is not eligible for this action")]
    NotEligible,
    /// The confidential value service refused or failed.
    #[error(transparent)]
    Vault(#[from] VaultError),
    /// The registry refused the submission.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// A timestamped, human-readable status message.
#[derive(Debug, Clone, Serialize)]
pub struct StatusLine {
    /// When the status was recorded.
    pub at: DateTime<Utc>,
    /// Message text.
    pub text: String,
}

impl StatusLine {
    fn now(text: impl Into<String>) -> Self {
        Self {
            at: Utc::now(),
            text: text.into(),
        }
    }
}

/// Point-in-time view of the session, for polling UIs.
#[derive(Debug, Clone, Serialize)]
pub struct ClientSnapshot {
    /// Hex identity the session acts as.
    pub identity: String,
    /// Chain the session targets.
    pub chain: u64,
    /// Whether a submit or decrypt call is in flight.
    pub loading: bool,
    /// Whether this identity has a prediction on record.
    pub already_voted: bool,
    /// Whether the session could submit right now.
    pub ready_to_vote: bool,
    /// Whether the current handle has a decrypted non-zero plaintext.
    pub decrypted: bool,
    /// Hex of the current registry handle, if any.
    pub handle: Option<String>,
    /// Latest status line, if any.
    pub status: Option<StatusLine>,
}

impl ClientSnapshot {
    /// Serialize the snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Orchestrates one identity's interaction with the bracket registry.
pub struct PredictionClient<V: ConfidentialValueService + ProofVerifier> {
    ctx: SessionContext,
    registry: Arc<PredictionRegistry<V>>,
    vault: Arc<V>,
    loading: bool,
    status: Option<StatusLine>,
    handle: CiphertextHandle,
    cache: BTreeMap<CiphertextHandle, u32>,
}

impl<V: ConfidentialValueService + ProofVerifier> PredictionClient<V> {
    /// Create a client and load the identity's current registry state.
    pub async fn new(
        ctx: SessionContext,
        registry: Arc<PredictionRegistry<V>>,
        vault: Arc<V>,
    ) -> Self {
        let mut client = Self {
            ctx,
            registry,
            vault,
            loading: false,
            status: None,
            handle: CiphertextHandle::EMPTY,
            cache: BTreeMap::new(),
        };
        client.refresh_handle().await;
        client
    }

    /// Whether a call is currently in flight.
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// The latest status line, if any.
    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    /// The session context.
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Whether this identity already has a prediction on record.
    pub fn already_voted(&self) -> bool {
        !self.handle.is_empty()
    }

    /// Whether the session could submit a prediction right now.
    pub fn ready_to_vote(&self) -> bool {
        self.ctx.can_sign() && !self.loading && !self.already_voted()
    }

    /// Whether the current handle has been decrypted to a non-zero
    /// plaintext. Gates UI affordances only.
    pub fn decrypted(&self) -> bool {
        self.cached_plaintext().map(|v| v > 0).unwrap_or(false)
    }

    /// Cached plaintext for the current handle, if decrypted.
    pub fn cached_plaintext(&self) -> Option<u32> {
        if self.handle.is_empty() {
            return None;
        }
        self.cache.get(&self.handle).copied()
    }

    /// Encrypt `encoded` and submit the resulting handle to the
    /// registry.
    ///
    /// No-op unless [`ready_to_vote`](Self::ready_to_vote). `loading`
    /// is set for the duration and cleared on every exit path; a
    /// failure before the registry call leaves the registry untouched.
    pub async fn submit_prediction(&mut self, encoded: u32) -> Result<(), ClientError> {
        if !self.ready_to_vote() {
            return Err(ClientError::NotEligible);
        }

        self.loading = true;
        let result = self.submit_inner(encoded).await;
        self.loading = false;

        match &result {
            Ok(()) => {
                self.status = Some(StatusLine::now("prediction recorded"));
            }
            Err(ClientError::Registry(RegistryError::AlreadySubmitted)) => {
                self.status = Some(StatusLine::now(RegistryError::AlreadySubmitted.to_string()));
            }
            Err(e) => {
                self.status = Some(StatusLine::now(format!("submission failed: {}", e)));
            }
        }

        result
    }

    async fn submit_inner(&mut self, encoded: u32) -> Result<(), ClientError> {
        let identity = *self.ctx.identity();

        debug!("encrypting prediction for {}", identity);
        let (handle, proof) = self.vault.encrypt(encoded, &identity).await?;

        self.registry.submit(identity, handle, proof).await?;
        info!("prediction submitted for {} under {}", identity, handle);

        self.refresh_handle().await;
        Ok(())
    }

    /// Decrypt this identity's registered prediction.
    ///
    /// The empty sentinel decodes directly to 0 without contacting the
    /// service. A handle already in the cache short-circuits to the
    /// cached value; the authorization round-trip runs at most once per
    /// handle.
    pub async fn decrypt_my_prediction(&mut self) -> Result<u32, ClientError> {
        if self.handle.is_empty() {
            return Ok(0);
        }

        if let Some(cached) = self.cache.get(&self.handle) {
            debug!("decrypt cache hit for {}", self.handle);
            return Ok(*cached);
        }

        let signer = self.ctx.signer().ok_or(ClientError::NotEligible)?.clone();

        self.loading = true;
        let result = async {
            let token = signer
                .sign(self.ctx.identity(), &self.handle)
                .map_err(|e| ClientError::Vault(VaultError::AuthorizationFailure(e.to_string())))?;
            self.vault
                .authorize_decrypt(&self.handle, self.ctx.identity(), &token)
                .await
                .map_err(ClientError::from)
        }
        .await;
        self.loading = false;

        match result {
            Ok(plaintext) => {
                self.cache.insert(self.handle, plaintext);
                self.status = Some(StatusLine::now("prediction decrypted"));
                Ok(plaintext)
            }
            Err(e) => {
                warn!("decryption failed for {}: {}", self.ctx.identity(), e);
                self.status = Some(StatusLine::now(format!("decryption failed: {}", e)));
                Err(e)
            }
        }
    }

    /// Re-read this identity's handle from the registry.
    pub async fn refresh_handle(&mut self) {
        self.handle = self.registry.read_handle(self.ctx.identity()).await;
    }

    /// Replace the session context, e.g. on account or chain change.
    ///
    /// Clears the cache, the cached handle and the status, then reloads
    /// registry state for the new identity.
    pub async fn set_context(&mut self, ctx: SessionContext) {
        self.ctx = ctx;
        self.cache.clear();
        self.status = None;
        self.handle = CiphertextHandle::EMPTY;
        self.refresh_handle().await;
    }

    /// Point-in-time view of the session.
    pub fn snapshot(&self) -> ClientSnapshot {
        ClientSnapshot {
            identity: self.ctx.identity().to_hex(),
            chain: self.ctx.chain().0,
            loading: self.loading,
            already_voted: self.already_voted(),
            ready_to_vote: self.ready_to_vote(),
            decrypted: self.decrypted(),
            handle: if self.handle.is_empty() {
                None
            } else {
                Some(self.handle.to_hex())
            },
            status: self.status.clone(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
