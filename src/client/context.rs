//! Session Context
//!
//! The identity and chain a client session operates under, plus the
//! optional authorization signer that makes the session able to
//! request decryptions.

use crate::ledger::state::Identity;
use crate::vault::auth::AuthorizationSigner;

/// Identifier of the chain the registry lives on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ChainId(pub u64);

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chain-{}", self.0)
    }
}

/// Everything a client session knows about who it is acting as.
///
/// A context without a signer is read-only: it can observe registry
/// state but can neither submit nor decrypt.
#[derive(Debug, Clone)]
pub struct SessionContext {
    identity: Identity,
    chain: ChainId,
    signer: Option<AuthorizationSigner>,
}

impl SessionContext {
    /// Read-only context for `identity` on `chain`.
    pub fn new(identity: Identity, chain: ChainId) -> Self {
        Self {
            identity,
            chain,
            signer: None,
        }
    }

    /// Full context able to sign decryption authorizations.
    pub fn with_signer(identity: Identity, chain: ChainId, signer: AuthorizationSigner) -> Self {
        Self {
            identity,
            chain,
            signer: Some(signer),
        }
    }

    /// Identity this session acts as.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Chain the session targets.
    pub fn chain(&self) -> ChainId {
        self.chain
    }

    /// Whether the session can sign authorizations.
    pub fn can_sign(&self) -> bool {
        self.signer.is_some()
    }

    /// The session's signer, if any.
    pub fn signer(&self) -> Option<&AuthorizationSigner> {
        self.signer.as_ref()
    }
}
