//! Content-addressed and opaque identifiers.
//!
//! Spec.md §3 defines `key_id`/`cert_id`/etc. as content hashes or opaque
//! strings on the wire, not UUIDs — unlike the teacher's `EntityId<T>`
//! (`src/domain/ids.rs`), these newtypes wrap `String`/`[u8; 32]` rather than
//! `Uuid`, but keep the teacher's phantom-typed-for-clarity naming.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 32-byte collision-resistant hash, as produced by the crypto capability's
/// `hash()` operation (spec.md §6).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash32(pub [u8; 32]);

impl Hash32 {
    /// Render as lowercase hex.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// Parse from lowercase hex.
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(arr))
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

macro_rules! opaque_string_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Build from any string-like value.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Borrow the underlying string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

opaque_string_id!(
    KeyId,
    "Content-hash identifier of a public key. Immutable, uniquely addressable."
);
opaque_string_id!(PersonId, "Opaque identity handle for a person.");
opaque_string_id!(CertId, "Identifier of a certificate record.");
opaque_string_id!(ProfileId, "Identifier of a profile record.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash32_hex_round_trips() {
        let h = Hash32([7u8; 32]);
        let hex = h.to_hex();
        assert_eq!(Hash32::from_hex(&hex), Some(h));
    }

    #[test]
    fn key_id_display_matches_inner_string() {
        let k = KeyId::new("abc123");
        assert_eq!(format!("{k}"), "abc123");
    }
}
