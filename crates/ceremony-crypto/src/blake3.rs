//! Domain-separated BLAKE3 hashing.
//!
//! Every derivation in the ceremony uses a registered context string so that
//! a key derived for one purpose can never collide with another.

/// Registered BLAKE3 context strings.
pub mod contexts {
    pub const ECIES_ENCRYPTION_KEY: &str = "Ceremony v1 ecies-encryption-key";
    pub const ECIES_NONCE: &str = "Ceremony v1 ecies-nonce";
    pub const COMMITMENT_HASH: &str = "Ceremony v1 commitment-hash";

    /// All registered context strings. Used for validation.
    pub const ALL_CONTEXTS: &[&str] = &[ECIES_ENCRYPTION_KEY, ECIES_NONCE, COMMITMENT_HASH];
}

/// Compute BLAKE3 hash of the input data.
pub fn hash(data: &[u8]) -> [u8; 32] {
    *::blake3::hash(data).as_bytes()
}

/// Derive a key using BLAKE3's key derivation mode.
///
/// `context` should be one of [`contexts::ALL_CONTEXTS`].
pub fn derive_key(context: &str, key_material: &[u8]) -> [u8; 32] {
    let mut hasher = ::blake3::Hasher::new_derive_key(context);
    hasher.update(key_material);
    *hasher.finalize().as_bytes()
}

/// Verify that a context string is registered.
pub fn is_registered_context(context: &str) -> bool {
    contexts::ALL_CONTEXTS.contains(&context)
}

/// Encode multiple dynamic fields using length-prefixed encoding.
///
/// `LE32(len(field1)) || field1 || LE32(len(field2)) || field2 || ...`
pub fn encode_multi_field(fields: &[&[u8]]) -> Vec<u8> {
    let total_len: usize = fields.iter().map(|f| 4 + f.len()).sum();
    let mut output = Vec::with_capacity(total_len);
    for field in fields {
        output.extend_from_slice(&(field.len() as u32).to_le_bytes());
        output.extend_from_slice(field);
    }
    output
}
