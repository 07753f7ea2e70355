//! Confidential value service boundary: traits, authorization tokens
//! and the in-memory mock backend.

pub mod auth;
pub mod mock;
pub mod service;

pub use auth::{validate_authorization, AuthError, AuthorizationClaims, AuthorizationSigner};
pub use mock::MockVault;
pub use service::{ConfidentialValueService, ProofVerifier, VaultError};
