//! Ledger Module
//!
//! The public-ledger side of the system: identity-keyed registration
//! records and the registry state machine that enforces at most one
//! submission per identity.
//!
//! ## Module Structure
//!
//! - `state`: Identities, ciphertext handles, registration records
//! - `registry`: The submit/read state machine

pub mod state;
pub mod registry;

// Re-export key types
pub use state::{Identity, CiphertextHandle, ValidityProof, RegistrationRecord};
pub use registry::{PredictionRegistry, RegistryError};
