use ark_ff::{BigInteger, PrimeField};
use ark_serialize::CanonicalSerialize;
use ark_std::rand::RngCore;
use blake2::{Blake2b512, Digest};
use zeroize::Zeroize;

use crate::error::TtbeError;

/// Number of random bytes reduced into one scalar. Twice the size of the
/// field modulus keeps the bias of the reduction negligible.
const SCALAR_SAMPLE_BYTES: usize = 64;

/// Computes the inverse of `a` modulo the (prime) field order via Fermat's
/// little theorem: a^{-1} = a^{r-2} mod r.
///
/// # Errors
/// Returns `NotInvertible` if `a` is zero.
pub fn inv_mod<F: PrimeField>(a: &F) -> Result<F, TtbeError> {
    if a.is_zero() {
        return Err(TtbeError::NotInvertible);
    }

    let mut exponent = F::MODULUS;
    exponent.sub_with_borrow(&F::BigInt::from(2u64));

    Ok(a.pow(exponent))
}

/// Draws a scalar uniformly from [0, r).
///
/// Unlike `UniformRand`, a failure of the underlying source is reported
/// instead of panicking.
///
/// # Errors
/// Returns `RandomnessFailure` if the source cannot fill the sample buffer.
pub fn random_scalar<F: PrimeField, R: RngCore + ?Sized>(rng: &mut R) -> Result<F, TtbeError> {
    let mut bytes = [0u8; SCALAR_SAMPLE_BYTES];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| TtbeError::RandomnessFailure(e.to_string()))?;

    let scalar = F::from_le_bytes_mod_order(&bytes);
    bytes.zeroize();

    Ok(scalar)
}

/// Hashes `msg` under a domain separator into a scalar using Blake2b-512.
pub fn hash_to_scalar<F: PrimeField>(domain: &[u8], msg: &[u8]) -> F {
    let mut hasher = Blake2b512::new();
    hasher.update((domain.len() as u64).to_le_bytes());
    hasher.update(domain);
    hasher.update(msg);

    F::from_le_bytes_mod_order(&hasher.finalize())
}

/// Short hex fingerprint of a serializable value, used to identify
/// ciphertexts in log output.
pub fn fingerprint<T: CanonicalSerialize>(value: &T) -> String {
    let mut bytes = Vec::new();
    if value.serialize_compressed(&mut bytes).is_err() {
        return "<unserializable>".to_string();
    }

    let digest = Blake2b512::digest(&bytes);
    hex::encode(&digest[..8])
}
