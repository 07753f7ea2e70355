//! # Bracket Vault
//!
//! Confidential tournament-bracket predictions: pack a full bracket of
//! winner selections into one integer, seal it behind an opaque
//! ciphertext handle, register at most one handle per identity, and
//! release the plaintext only to its producer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      BRACKET VAULT                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  bracket/         - Bracket model and encoding (pure)        │
//! │  ├── team.rs      - Teams and power-of-two rosters           │
//! │  ├── draw.rs      - Matchups, rounds, round names            │
//! │  └── encode.rs    - Bit-packed prediction codec              │
//! │                                                              │
//! │  ledger/          - Registration state (shared, async)       │
//! │  ├── state.rs     - Identities, handles, proofs, records     │
//! │  └── registry.rs  - At-most-one-submission registry          │
//! │                                                              │
//! │  vault/           - Confidential value boundary              │
//! │  ├── service.rs   - Encrypt/decrypt traits + errors          │
//! │  ├── auth.rs      - Signed decryption authorizations         │
//! │  └── mock.rs      - In-memory backend for tests and demos    │
//! │                                                              │
//! │  client/          - Session orchestration                    │
//! │  ├── context.rs   - Identity, chain, signer                  │
//! │  └── prediction.rs- Submit/decrypt flows, snapshot           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Confidentiality Boundary
//!
//! The `bracket/` and `ledger/` modules never see plaintext
//! predictions; they operate on opaque 32-byte handles. Only the
//! confidential value service behind the [`vault`] traits ever holds
//! the sealed integer, and it releases it solely against a signed
//! authorization from the identity the ciphertext is bound to.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod bracket;
pub mod client;
pub mod ledger;
pub mod vault;

// Re-export commonly used types
pub use bracket::encode::{pack, unpack, EncodeError, Prediction};
pub use bracket::team::{Roster, Team, TeamId};
pub use client::{ChainId, PredictionClient, SessionContext};
pub use ledger::registry::{PredictionRegistry, RegistryError};
pub use ledger::state::{CiphertextHandle, Identity, ValidityProof};
pub use vault::{ConfidentialValueService, MockVault, ProofVerifier, VaultError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Width of the packed prediction plaintext in bits.
pub const PLAINTEXT_BITS: u32 = 32;
