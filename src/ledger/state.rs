//! Ledger State Definitions
//!
//! Identities, ciphertext handles, and the per-identity registration
//! record. Uses fixed-size byte newtypes with Ord for deterministic
//! BTreeMap ordering.

use serde::{Serialize, Deserialize};

// =============================================================================
// IDENTITY
// =============================================================================

/// A submitting/reading party, the account-address equivalent
/// (20 bytes).
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub struct Identity(pub [u8; 20]);

impl Identity {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Parse from a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).ok()?;
        if bytes.len() != 20 {
            return None;
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Some(Self(arr))
    }

    /// Hex string with `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// True for the all-zero identity, which no valid session uses.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

// =============================================================================
// CIPHERTEXT HANDLE
// =============================================================================

/// Opaque reference to an encrypted value (32 bytes).
///
/// The all-zero value is the reserved empty sentinel: it marks "no
/// submission" in the ledger and is never produced by the confidential
/// value service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub struct CiphertextHandle(pub [u8; 32]);

impl CiphertextHandle {
    /// The reserved empty sentinel.
    pub const EMPTY: Self = Self([0u8; 32]);

    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// True for the reserved empty sentinel.
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Parse from a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).ok()?;
        if bytes.len() != 32 {
            return None;
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Some(Self(arr))
    }

    /// Hex string with `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short prefix for logs; full value via to_hex().
        write!(f, "0x{}..", hex::encode(&self.0[..4]))
    }
}

// =============================================================================
// VALIDITY PROOF
// =============================================================================

/// Evidence that a ciphertext handle was correctly formed for its bound
/// identity. Opaque to the registry; checked through the
/// `ProofVerifier` contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityProof(pub [u8; 32]);

impl ValidityProof {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

// =============================================================================
// REGISTRATION RECORD
// =============================================================================

/// Per-identity ledger entry.
///
/// Every identity implicitly starts with the default record
/// (unregistered, empty handle). The record is mutated exactly once,
/// by a successful submission, and never deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    /// Has this identity submitted a prediction?
    pub registered: bool,
    /// Handle of the submitted ciphertext, or the empty sentinel.
    pub handle: CiphertextHandle,
}

impl Default for RegistrationRecord {
    fn default() -> Self {
        Self {
            registered: false,
            handle: CiphertextHandle::EMPTY,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_hex_round_trip() {
        let id = Identity::new([0xab; 20]);
        let hex = id.to_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(Identity::from_hex(&hex), Some(id));
        // Prefix is optional on parse.
        assert_eq!(Identity::from_hex(&hex[2..]), Some(id));
    }

    #[test]
    fn test_identity_hex_rejects_bad_input() {
        assert_eq!(Identity::from_hex("0x1234"), None);
        assert_eq!(Identity::from_hex("not hex"), None);
    }

    #[test]
    fn test_identity_ordering() {
        let a = Identity::new([0; 20]);
        let b = Identity::new([1; 20]);
        assert!(a < b);
    }

    #[test]
    fn test_handle_sentinel() {
        assert!(CiphertextHandle::EMPTY.is_empty());
        assert!(!CiphertextHandle::new([1; 32]).is_empty());
        assert_eq!(CiphertextHandle::default(), CiphertextHandle::EMPTY);
    }

    #[test]
    fn test_handle_hex_round_trip() {
        let handle = CiphertextHandle::new([0x5a; 32]);
        assert_eq!(CiphertextHandle::from_hex(&handle.to_hex()), Some(handle));
    }

    #[test]
    fn test_default_record_is_unregistered() {
        let record = RegistrationRecord::default();
        assert!(!record.registered);
        assert!(record.handle.is_empty());
    }
}
