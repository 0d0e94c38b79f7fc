//! Secret sharing polynomials with Feldman commitments.
//!
//! A guardian's election secret is the constant term `a_0` of a random
//! polynomial `P(x) = a_0 + a_1·x + … + a_{k-1}·x^{k-1}` where `k` is the
//! quorum. The guardian publishes `C_j = a_j·G` for every coefficient. Anyone
//! can then check that a disclosed coordinate `y = P(ℓ)` is consistent with
//! the commitments, since `y·G = Σ_j ℓ^j · C_j`.

use zeroize::Zeroize;

use crate::group::{ElementModQ, GroupElement};
use crate::{CryptoError, Result};

/// A secret polynomial and the public commitments to its coefficients.
///
/// Coefficients are wiped on drop.
#[derive(Clone)]
pub struct ElectionPolynomial {
    coefficients: Vec<ElementModQ>,
    commitments: Vec<GroupElement>,
}

impl ElectionPolynomial {
    /// Generate a random polynomial with `number_of_coefficients` terms.
    pub fn generate(number_of_coefficients: usize) -> Result<Self> {
        let coefficients = (0..number_of_coefficients)
            .map(|_| ElementModQ::random())
            .collect();
        Self::from_coefficients(coefficients)
    }

    /// Build a polynomial from explicit coefficients (constant term first).
    pub fn from_coefficients(coefficients: Vec<ElementModQ>) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(CryptoError::InvalidInput(
                "polynomial needs at least one coefficient".to_string(),
            ));
        }
        let commitments = coefficients.iter().map(GroupElement::g_pow).collect();
        Ok(Self {
            coefficients,
            commitments,
        })
    }

    /// The shared secret `a_0`.
    pub fn secret(&self) -> ElementModQ {
        self.coefficients[0]
    }

    /// The public key `a_0·G`, equal to the first commitment.
    pub fn public_key(&self) -> GroupElement {
        self.commitments[0]
    }

    pub fn commitments(&self) -> &[GroupElement] {
        &self.commitments
    }

    pub fn number_of_coefficients(&self) -> usize {
        self.coefficients.len()
    }

    /// Evaluate `P(x)` by Horner's rule.
    pub fn evaluate(&self, x: u64) -> ElementModQ {
        let x = ElementModQ::from_u64(x);
        self.coefficients
            .iter()
            .rev()
            .fold(ElementModQ::zero(), |acc, coefficient| acc * x + *coefficient)
    }
}

impl Drop for ElectionPolynomial {
    fn drop(&mut self) {
        for coefficient in self.coefficients.iter_mut() {
            coefficient.zeroize();
        }
    }
}

/// Check `coordinate·G == Σ_j x^j · commitments[j]`.
///
/// Returns `false` for an empty commitment list.
pub fn verify_polynomial_coordinate(
    coordinate: &ElementModQ,
    x: u64,
    commitments: &[GroupElement],
) -> bool {
    if commitments.is_empty() {
        return false;
    }
    let x = ElementModQ::from_u64(x);
    let expected: GroupElement = commitments
        .iter()
        .enumerate()
        .map(|(j, commitment)| *commitment * x.pow(j as u64))
        .sum();
    GroupElement::g_pow(coordinate) == expected
}
