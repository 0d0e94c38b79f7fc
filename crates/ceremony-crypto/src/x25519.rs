//! Auxiliary (transport) key pairs over X25519.
//!
//! Guardians publish a [`TransportPublicKey`] in Round 1 so that peers can
//! encrypt partial key backups addressed to them.

use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

/// Long-lived X25519 secret held by a guardian for the ceremony.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct TransportSecret {
    inner: StaticSecret,
}

/// Public half of a [`TransportSecret`]. Serialized as hex.
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransportPublicKey {
    #[serde_as(as = "serde_with::hex::Hex")]
    bytes: [u8; 32],
}

/// Diffie-Hellman output. Wiped on drop.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SharedSecret {
    bytes: [u8; 32],
}

impl TransportSecret {
    /// Generate a new random secret.
    pub fn random() -> Self {
        Self {
            inner: StaticSecret::random_from_rng(OsRng),
        }
    }

    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self {
            inner: StaticSecret::from(bytes),
        }
    }

    pub fn public_key(&self) -> TransportPublicKey {
        TransportPublicKey {
            bytes: PublicKey::from(&self.inner).to_bytes(),
        }
    }

    pub fn diffie_hellman(&self, their_public: &TransportPublicKey) -> SharedSecret {
        let shared = self
            .inner
            .diffie_hellman(&PublicKey::from(their_public.bytes));
        SharedSecret {
            bytes: *shared.as_bytes(),
        }
    }
}

impl TransportPublicKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl SharedSecret {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}
