//! Shamir secret sharing over the scalar field of the pairing groups.
//!
//! A secret is embedded as the constant term of a random polynomial of
//! degree t-1. Party i receives the evaluation at x = i (1-indexed, never 0),
//! and any t evaluations recover the constant term by Lagrange interpolation
//! at zero.

use ark_ff::PrimeField;
use ark_serialize::*;
use ark_std::{rand::RngCore, One, Zero};
use zeroize::Zeroize;

use crate::error::TtbeError;
use crate::utils::{inv_mod, random_scalar};

/// A polynomial given by its coefficients, `coeffs[0]` being the secret.
#[derive(CanonicalSerialize, CanonicalDeserialize, Clone)]
pub struct Polynomial<F: PrimeField> {
    coeffs: Vec<F>,
}

/// One evaluation point of a sharing polynomial.
#[derive(CanonicalSerialize, CanonicalDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Share<F: PrimeField> {
    /// Evaluation point (the party index as a scalar)
    pub x: F,
    /// Polynomial value at `x`
    pub y: F,
}

impl<F: PrimeField> Polynomial<F> {
    /// Creates a polynomial from its coefficients, lowest degree first.
    pub fn from_coefficients(coeffs: Vec<F>) -> Self {
        Polynomial { coeffs }
    }

    pub fn coefficients(&self) -> &[F] {
        &self.coeffs
    }

    /// The shared secret (constant term). Zero for an empty polynomial.
    pub fn secret(&self) -> F {
        self.coeffs.first().copied().unwrap_or_else(F::zero)
    }

    /// Evaluates the polynomial at `x` with Horner's rule.
    pub fn evaluate(&self, x: &F) -> F {
        self.coeffs
            .iter()
            .rev()
            .fold(F::zero(), |acc, coeff| acc * x + coeff)
    }
}

impl<F: PrimeField> Zeroize for Polynomial<F> {
    fn zeroize(&mut self) {
        self.coeffs.iter_mut().for_each(|c| c.zeroize());
    }
}

impl<F: PrimeField> Drop for Polynomial<F> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

// Coefficients are secret material
impl<F: PrimeField> std::fmt::Debug for Polynomial<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Polynomial")
            .field("degree", &self.coeffs.len().saturating_sub(1))
            .field("coeffs", &"[REDACTED]")
            .finish()
    }
}

impl<F: PrimeField> Zeroize for Share<F> {
    fn zeroize(&mut self) {
        self.x.zeroize();
        self.y.zeroize();
    }
}

/// Generates a random polynomial with `t` coefficients whose constant term is
/// `secret`.
///
/// `t = 0` and `t = 1` both yield the constant polynomial `secret`.
///
/// # Errors
/// Returns `RandomnessFailure` if the random source fails.
pub fn generate_random_polynomial<F: PrimeField, R: RngCore + ?Sized>(
    t: usize,
    secret: F,
    rng: &mut R,
) -> Result<Polynomial<F>, TtbeError> {
    let mut coeffs = Vec::with_capacity(t.max(1));
    coeffs.push(secret);
    for _ in 1..t {
        coeffs.push(random_scalar(rng)?);
    }

    Ok(Polynomial { coeffs })
}

/// Evaluates `poly` at x = 1..=n.
///
/// The layer does not enforce `n >= t`; with fewer shares than coefficients
/// the secret is simply not recoverable.
pub fn generate_shares<F: PrimeField>(poly: &Polynomial<F>, n: usize) -> Vec<Share<F>> {
    (1..=n as u64)
        .map(|i| {
            let x = F::from(i);
            Share {
                x,
                y: poly.evaluate(&x),
            }
        })
        .collect()
}

fn ensure_distinct<F: PrimeField>(xs: &[F]) -> Result<(), TtbeError> {
    for (i, a) in xs.iter().enumerate() {
        if xs[i + 1..].contains(a) {
            return Err(TtbeError::DuplicatePoint);
        }
    }
    Ok(())
}

/// Computes the Lagrange basis polynomial for `x_k` over `xs`, evaluated at 0:
/// prod_{x_j != x_k} x_j / (x_j - x_k).
///
/// # Errors
/// Returns `DuplicatePoint` if `xs` has repeated points and
/// `InvalidParameter` if `x_k` is not one of them.
pub fn lagrange_coefficient<F: PrimeField>(x_k: &F, xs: &[F]) -> Result<F, TtbeError> {
    ensure_distinct(xs)?;
    if !xs.contains(x_k) {
        return Err(TtbeError::InvalidParameter(
            "x_k is not one of the interpolation points".to_string(),
        ));
    }

    let mut numerator = F::one();
    let mut denominator = F::one();
    for x_j in xs.iter().filter(|x_j| *x_j != x_k) {
        numerator *= x_j;
        denominator *= *x_j - x_k;
    }

    Ok(numerator * inv_mod(&denominator)?)
}

/// Recovers the constant term of the sharing polynomial.
///
/// The caller must supply at least t shares of a degree t-1 polynomial;
/// with fewer the result is an unrelated field element.
///
/// # Errors
/// Returns `InvalidParameter` on an empty input and `DuplicatePoint` if two
/// shares have the same evaluation point.
pub fn reconstruct<F: PrimeField>(shares: &[Share<F>]) -> Result<F, TtbeError> {
    if shares.is_empty() {
        return Err(TtbeError::InvalidParameter(
            "cannot reconstruct from zero shares".to_string(),
        ));
    }

    let xs: Vec<F> = shares.iter().map(|share| share.x).collect();

    shares.iter().try_fold(F::zero(), |acc, share| -> Result<F, TtbeError> {
        Ok(acc + share.y * lagrange_coefficient(&share.x, &xs)?)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial, Polynomial as _};
    use ark_std::UniformRand;

    type Fr = ark_bls12_381::Fr;

    #[test]
    fn test_evaluate_small() {
        // 4 + 4x + x^2 at x = 4
        let poly = Polynomial::from_coefficients(vec![
            Fr::from(4u64),
            Fr::from(4u64),
            Fr::from(1u64),
        ]);
        assert_eq!(poly.evaluate(&Fr::from(4u64)), Fr::from(36u64));
    }

    #[test]
    fn test_evaluate_matches_dense_polynomial() {
        let mut rng = ark_std::test_rng();
        let coeffs: Vec<Fr> = (0..6).map(|_| Fr::rand(&mut rng)).collect();
        let poly = Polynomial::from_coefficients(coeffs.clone());
        let dense = DensePolynomial::from_coefficients_vec(coeffs);

        for _ in 0..8 {
            let x = Fr::rand(&mut rng);
            assert_eq!(poly.evaluate(&x), dense.evaluate(&x));
        }
    }

    #[test]
    fn test_generate_random_polynomial() {
        let mut rng = ark_std::test_rng();
        let secret = Fr::from(3u64);
        let poly = generate_random_polynomial(3, secret, &mut rng).unwrap();

        assert_eq!(poly.coefficients().len(), 3);
        assert_eq!(poly.secret(), secret);
        assert_eq!(poly.evaluate(&Fr::zero()), secret);
    }

    #[test]
    fn test_degenerate_threshold_is_constant() {
        let mut rng = ark_std::test_rng();
        let secret = Fr::rand(&mut rng);

        for t in [0, 1] {
            let poly = generate_random_polynomial(t, secret, &mut rng).unwrap();
            assert_eq!(poly.coefficients(), &[secret]);
            let shares = generate_shares(&poly, 4);
            assert!(shares.iter().all(|share| share.y == secret));
        }
    }

    #[test]
    fn test_shares_are_one_indexed() {
        let mut rng = ark_std::test_rng();
        let poly = generate_random_polynomial(3, Fr::rand(&mut rng), &mut rng).unwrap();
        let shares = generate_shares(&poly, 5);

        assert_eq!(shares.len(), 5);
        for (i, share) in shares.iter().enumerate() {
            assert_eq!(share.x, Fr::from(i as u64 + 1));
            assert_eq!(share.y, poly.evaluate(&share.x));
        }
    }

    #[test]
    fn test_reconstruct_any_threshold_subset() {
        let mut rng = ark_std::test_rng();
        let n = 6;
        let t = 4;
        let secret = Fr::rand(&mut rng);
        let poly = generate_random_polynomial(t, secret, &mut rng).unwrap();
        let shares = generate_shares(&poly, n);

        let subsets: [&[usize]; 4] = [&[0, 1, 2, 3], &[2, 3, 4, 5], &[0, 2, 4, 5], &[5, 1, 3, 0]];
        for subset in subsets {
            let picked: Vec<Share<Fr>> = subset.iter().map(|&i| shares[i].clone()).collect();
            assert_eq!(reconstruct(&picked).unwrap(), secret);
        }

        // more than t shares still interpolate the same polynomial
        assert_eq!(reconstruct(&shares).unwrap(), secret);
    }

    #[test]
    fn test_reconstruct_below_threshold_is_unrelated() {
        let mut rng = ark_std::test_rng();
        let secret = Fr::rand(&mut rng);
        let poly = generate_random_polynomial(3, secret, &mut rng).unwrap();
        let shares = generate_shares(&poly, 5);

        assert_ne!(reconstruct(&shares[..2]).unwrap(), secret);
    }

    #[test]
    fn test_lagrange_coefficients_sum_to_one() {
        let xs: Vec<Fr> = [1u64, 3, 5].iter().map(|&i| Fr::from(i)).collect();
        let sum = xs
            .iter()
            .map(|x| lagrange_coefficient(x, &xs).unwrap())
            .fold(Fr::zero(), |acc, l| acc + l);
        assert_eq!(sum, Fr::one());
    }

    #[test]
    fn test_lagrange_rejects_duplicates() {
        let xs = vec![Fr::from(1u64), Fr::from(2u64), Fr::from(2u64)];
        assert!(matches!(
            lagrange_coefficient(&Fr::from(1u64), &xs),
            Err(TtbeError::DuplicatePoint)
        ));

        let shares = vec![
            Share { x: Fr::from(1u64), y: Fr::from(7u64) },
            Share { x: Fr::from(1u64), y: Fr::from(9u64) },
        ];
        assert!(matches!(reconstruct(&shares), Err(TtbeError::DuplicatePoint)));
    }

    #[test]
    fn test_lagrange_rejects_foreign_point() {
        let xs = vec![Fr::from(1u64), Fr::from(2u64)];
        assert!(matches!(
            lagrange_coefficient(&Fr::from(3u64), &xs),
            Err(TtbeError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_reconstruct_empty() {
        let shares: Vec<Share<Fr>> = Vec::new();
        assert!(reconstruct(&shares).is_err());
    }
}
