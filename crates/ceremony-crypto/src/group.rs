//! Scalars and group elements on BLS12-381 G1.
//!
//! The ceremony is written multiplicatively in the literature
//! (`K = g^s`, joint key `K = Π K_i`); here the group is additive, so the
//! same relations read `K = s·G` and `K = Σ K_i`.
//!
//! Both types serialize as lowercase hex of their canonical compressed
//! encoding (32 bytes for a scalar, 48 bytes for a point).

use std::fmt;
use std::ops::{Add, Mul};

use ark_bls12_381::{Fr, G1Projective as G1};
use ark_ec::Group;
use ark_ff::{BigInteger, Field, PrimeField, UniformRand};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::Zero;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

use crate::{CryptoError, Result};

/// Size of a compressed scalar encoding.
pub const SCALAR_SIZE: usize = 32;

/// Size of a compressed G1 encoding.
pub const ELEMENT_SIZE: usize = 48;

/// An element of the scalar field (integers mod the group order `q`).
///
/// Scalars are secret coefficients or shares, so `Debug` does not print them.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ElementModQ(Fr);

/// An element of the G1 group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupElement(G1);

impl ElementModQ {
    /// Uniformly random scalar from the OS RNG.
    pub fn random() -> Self {
        Self(Fr::rand(&mut rand::rngs::OsRng))
    }

    pub fn zero() -> Self {
        Self(Fr::zero())
    }

    pub fn from_u64(value: u64) -> Self {
        Self(Fr::from(value))
    }

    /// `self^exponent` in the scalar field.
    pub fn pow(&self, exponent: u64) -> Self {
        Self(self.0.pow([exponent]))
    }

    /// Little-endian canonical encoding.
    pub fn to_bytes(&self) -> [u8; SCALAR_SIZE] {
        let mut out = [0u8; SCALAR_SIZE];
        out.copy_from_slice(&self.0.into_bigint().to_bytes_le());
        out
    }

    /// Decode a canonical encoding. Non-reduced values are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SCALAR_SIZE {
            return Err(CryptoError::InvalidEncoding(format!(
                "scalar must be {SCALAR_SIZE} bytes, got {}",
                bytes.len()
            )));
        }
        Fr::deserialize_compressed(bytes)
            .map(Self)
            .map_err(|e| CryptoError::InvalidEncoding(format!("scalar: {e}")))
    }
}

impl GroupElement {
    /// The fixed generator `G`.
    pub fn generator() -> Self {
        Self(G1::generator())
    }

    /// The identity element. The combination of zero keys.
    pub fn identity() -> Self {
        Self(G1::zero())
    }

    /// `scalar · G`.
    pub fn g_pow(scalar: &ElementModQ) -> Self {
        Self(G1::generator() * scalar.0)
    }

    pub fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(ELEMENT_SIZE);
        // Writing into a Vec cannot fail.
        let _ = self.0.serialize_compressed(&mut out);
        out
    }

    /// Decode a compressed point, checking it lies in the prime-order subgroup.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        G1::deserialize_compressed(bytes)
            .map(Self)
            .map_err(|e| CryptoError::InvalidEncoding(format!("group element: {e}")))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl Add for ElementModQ {
    type Output = ElementModQ;

    fn add(self, rhs: ElementModQ) -> ElementModQ {
        ElementModQ(self.0 + rhs.0)
    }
}

impl Mul for ElementModQ {
    type Output = ElementModQ;

    fn mul(self, rhs: ElementModQ) -> ElementModQ {
        ElementModQ(self.0 * rhs.0)
    }
}

impl Add for GroupElement {
    type Output = GroupElement;

    fn add(self, rhs: GroupElement) -> GroupElement {
        GroupElement(self.0 + rhs.0)
    }
}

impl Mul<ElementModQ> for GroupElement {
    type Output = GroupElement;

    fn mul(self, rhs: ElementModQ) -> GroupElement {
        GroupElement(self.0 * rhs.0)
    }
}

impl std::iter::Sum for GroupElement {
    fn sum<I: Iterator<Item = GroupElement>>(iter: I) -> GroupElement {
        iter.fold(GroupElement::identity(), |acc, e| acc + e)
    }
}

impl Zeroize for ElementModQ {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for ElementModQ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ElementModQ(<redacted>)")
    }
}

impl fmt::Display for GroupElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for ElementModQ {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.to_bytes()))
    }
}

impl<'de> Deserialize<'de> for ElementModQ {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(de::Error::custom)?;
        ElementModQ::from_bytes(&bytes).map_err(de::Error::custom)
    }
}

impl Serialize for GroupElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for GroupElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(de::Error::custom)?;
        GroupElement::from_bytes(&bytes).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_debug_is_redacted() {
        let secret = ElementModQ::from_u64(0x1234_5678);
        let debug = format!("{secret:?}");
        assert_eq!(debug, "ElementModQ(<redacted>)");
        assert!(!debug.contains(&hex::encode(secret.to_bytes())));
    }

    #[test]
    fn test_g_pow_is_homomorphic() {
        let a = ElementModQ::from_u64(7);
        let b = ElementModQ::from_u64(35);
        assert_eq!(
            GroupElement::g_pow(&a) + GroupElement::g_pow(&b),
            GroupElement::g_pow(&(a + b))
        );
        assert_eq!(
            GroupElement::g_pow(&a) * b,
            GroupElement::g_pow(&(a * b))
        );
    }

    #[test]
    fn test_sum_of_nothing_is_identity() {
        let total: GroupElement = Vec::<GroupElement>::new().into_iter().sum();
        assert!(total.is_identity());
    }

    #[test]
    fn test_scalar_pow() {
        let x = ElementModQ::from_u64(3);
        assert_eq!(x.pow(0), ElementModQ::from_u64(1));
        assert_eq!(x.pow(4), ElementModQ::from_u64(81));
    }

    #[test]
    fn test_element_encoding_sizes() {
        let s = ElementModQ::random();
        assert_eq!(s.to_bytes().len(), SCALAR_SIZE);
        assert_eq!(GroupElement::g_pow(&s).to_bytes().len(), ELEMENT_SIZE);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(ElementModQ::from_bytes(&[0xff; SCALAR_SIZE]).is_err());
        assert!(ElementModQ::from_bytes(&[0x01; 31]).is_err());
        assert!(GroupElement::from_bytes(&[0x00; 10]).is_err());
    }

    #[test]
    fn test_serde_hex() {
        let s = ElementModQ::from_u64(42);
        let json = serde_json::to_string(&s).expect("serialize");
        let parsed: ElementModQ = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed, s);

        let e = GroupElement::g_pow(&s);
        let json = serde_json::to_string(&e).expect("serialize");
        assert_eq!(json.len(), 2 * ELEMENT_SIZE + 2);
        let parsed: GroupElement = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed, e);
    }
}
