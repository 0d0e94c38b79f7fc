//! ECIES-X25519-ChaCha20-BLAKE3 encryption for partial key backups.
//!
//! ```text
//! Encrypt(recipient_pk, plaintext, aad):
//!   eph_sk     = random
//!   eph_pk     = X25519_basepoint_mult(eph_sk)
//!   shared     = X25519(eph_sk, recipient_pk)
//!   enc_key    = BLAKE3::derive_key("Ceremony v1 ecies-encryption-key",
//!                                   shared || eph_pk || recipient_pk)
//!   nonce      = BLAKE3::derive_key("Ceremony v1 ecies-nonce", shared || eph_pk)[:12]
//!   ciphertext = ChaCha20-Poly1305(enc_key, nonce, plaintext, aad = eph_pk || aad)
//!   return eph_pk || ciphertext || tag
//! ```
//!
//! The caller-supplied `aad` binds a backup to its (owner, designated) pair so
//! a ciphertext cannot be replayed under a different pair.

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Key, Nonce,
};

use crate::blake3::{self, contexts};
use crate::x25519::{SharedSecret, TransportPublicKey, TransportSecret};
use crate::{CryptoError, Result};

/// Poly1305 tag size.
pub const TAG_SIZE: usize = 16;

const EPH_PK_SIZE: usize = 32;
const NONCE_SIZE: usize = 12;

/// ECIES ciphertext: ephemeral public key + ciphertext + tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EciesCiphertext {
    pub eph_pk: [u8; EPH_PK_SIZE],
    pub ciphertext_and_tag: Vec<u8>,
}

impl EciesCiphertext {
    /// Serialize to bytes: eph_pk || ciphertext || tag.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(EPH_PK_SIZE + self.ciphertext_and_tag.len());
        out.extend_from_slice(&self.eph_pk);
        out.extend_from_slice(&self.ciphertext_and_tag);
        out
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < EPH_PK_SIZE + TAG_SIZE {
            return Err(CryptoError::Ecies("ciphertext too short".into()));
        }
        let mut eph_pk = [0u8; EPH_PK_SIZE];
        eph_pk.copy_from_slice(&data[..EPH_PK_SIZE]);
        Ok(Self {
            eph_pk,
            ciphertext_and_tag: data[EPH_PK_SIZE..].to_vec(),
        })
    }
}

/// Encrypt `plaintext` to `recipient_pk` under a fresh ephemeral key.
pub fn encrypt(
    recipient_pk: &TransportPublicKey,
    plaintext: &[u8],
    aad: &[u8],
) -> Result<EciesCiphertext> {
    let eph_secret = TransportSecret::random();
    let eph_pk = *eph_secret.public_key().as_bytes();
    let shared = eph_secret.diffie_hellman(recipient_pk);

    let (key, nonce) = derive_key_and_nonce(&shared, &eph_pk, recipient_pk);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
    let ciphertext_and_tag = cipher
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: &bind_aad(&eph_pk, aad),
            },
        )
        .map_err(|_| CryptoError::Ecies("encryption failed".into()))?;

    Ok(EciesCiphertext {
        eph_pk,
        ciphertext_and_tag,
    })
}

/// Decrypt an ECIES ciphertext with the recipient's secret.
pub fn decrypt(
    recipient_sk: &TransportSecret,
    ciphertext: &EciesCiphertext,
    aad: &[u8],
) -> Result<Vec<u8>> {
    let eph_pk = TransportPublicKey::from_bytes(ciphertext.eph_pk);
    let shared = recipient_sk.diffie_hellman(&eph_pk);

    let (key, nonce) =
        derive_key_and_nonce(&shared, &ciphertext.eph_pk, &recipient_sk.public_key());
    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
    cipher
        .decrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: &ciphertext.ciphertext_and_tag,
                aad: &bind_aad(&ciphertext.eph_pk, aad),
            },
        )
        .map_err(|_| CryptoError::AeadDecryption)
}

fn derive_key_and_nonce(
    shared: &SharedSecret,
    eph_pk: &[u8; EPH_PK_SIZE],
    recipient_pk: &TransportPublicKey,
) -> ([u8; 32], [u8; NONCE_SIZE]) {
    let key_material = [
        shared.as_bytes().as_slice(),
        eph_pk.as_slice(),
        recipient_pk.as_bytes().as_slice(),
    ]
    .concat();
    let enc_key = blake3::derive_key(contexts::ECIES_ENCRYPTION_KEY, &key_material);

    let nonce_material = [shared.as_bytes().as_slice(), eph_pk.as_slice()].concat();
    let nonce_full = blake3::derive_key(contexts::ECIES_NONCE, &nonce_material);
    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(&nonce_full[..NONCE_SIZE]);

    (enc_key, nonce)
}

fn bind_aad(eph_pk: &[u8; EPH_PK_SIZE], aad: &[u8]) -> Vec<u8> {
    blake3::encode_multi_field(&[eph_pk.as_slice(), aad])
}
