//! Pairing equality checks.
//!
//! Every verification equation in the scheme has the shape
//! e(A, B) == e(C, D). It is evaluated as the single multi-pairing
//! e(A, B) · e(-C, D) and compared against the identity of GT.

use ark_ec::pairing::Pairing;
use ark_std::Zero;

/// Checks e(a, b) == e(c, d).
pub fn pairings_match<E: Pairing>(a: E::G1, b: E::G2, c: E::G1, d: E::G2) -> bool {
    E::multi_pairing([a, -c], [b, d]).is_zero()
}
