use ark_ec::pairing::Pairing;
use ark_serialize::*;
use ark_std::rand::RngCore;
use tracing::debug;

use crate::error::TtbeError;
use crate::security::pairings_match;
use crate::setup::PublicKey;
use crate::utils::{fingerprint, hash_to_scalar, random_scalar};

/// Domain separator for hashing byte labels into tags.
pub const TAG_DOMAIN: &[u8] = b"TTBE-TAG-V1";

/// Public decryption context bound into every ciphertext.
#[derive(CanonicalSerialize, CanonicalDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tag<E: Pairing> {
    value: E::ScalarField,
}

impl<E: Pairing> Tag<E> {
    pub fn new(value: E::ScalarField) -> Self {
        Tag { value }
    }

    /// Derives a tag from an arbitrary context label.
    pub fn from_bytes(label: &[u8]) -> Self {
        Tag {
            value: hash_to_scalar(TAG_DOMAIN, label),
        }
    }

    pub fn scalar(&self) -> E::ScalarField {
        self.value
    }
}

impl<E: Pairing> From<u64> for Tag<E> {
    fn from(value: u64) -> Self {
        Tag {
            value: E::ScalarField::from(value),
        }
    }
}

/// A ciphertext of the scheme.
///
/// `c3` carries the masked message; `c4` and `c5` bind `c1` and `c2` to the
/// tag and make the ciphertext publicly verifiable.
#[derive(CanonicalSerialize, CanonicalDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Ciphertext<E: Pairing> {
    /// r1·H1
    pub c1: E::G1,
    /// r2·V1
    pub c2: E::G1,
    /// M + (r1 + r2)·U1
    pub c3: E::G1,
    /// r1·(tag·U1 + W1)
    pub c4: E::G1,
    /// r2·(tag·U1 + Z1)
    pub c5: E::G1,
}

impl<E: Pairing> Ciphertext<E> {
    /// Short identifier for log output.
    pub fn fingerprint(&self) -> String {
        fingerprint(self)
    }
}

/// Encrypts a G1 message under `tag`.
///
/// # Arguments
/// * `tpk` - The public key
/// * `tag` - The decryption context
/// * `message` - The message, a G1 element
/// * `rng` - A random number generator (must be cryptographically secure outside tests)
///
/// # Errors
/// Returns `RandomnessFailure` if fresh randomness cannot be drawn.
pub fn encrypt<E: Pairing, R: RngCore>(
    tpk: &PublicKey<E>,
    tag: &Tag<E>,
    message: E::G1,
    rng: &mut R,
) -> Result<Ciphertext<E>, TtbeError> {
    let r1 = random_scalar(rng)?;
    let r2 = random_scalar(rng)?;

    Ok(encrypt_with_randomness(tpk, tag, message, r1, r2))
}

/// Deterministic core of `encrypt`. `r1` and `r2` must never be reused.
pub(crate) fn encrypt_with_randomness<E: Pairing>(
    tpk: &PublicKey<E>,
    tag: &Tag<E>,
    message: E::G1,
    r1: E::ScalarField,
    r2: E::ScalarField,
) -> Ciphertext<E> {
    let ut = tpk.u1 * tag.scalar();

    Ciphertext {
        c1: tpk.h1 * r1,
        c2: tpk.v1 * r2,
        c3: message + tpk.u1 * (r1 + r2),
        c4: (ut + tpk.w1) * r1,
        c5: (ut + tpk.z1) * r2,
    }
}

/// Publicly checks that `ct` was produced for `tag`.
///
/// Verifies e(C1, tag·U2 + W2) == e(C4, H2) and
/// e(C2, tag·U2 + Z2) == e(C5, V2).
pub fn verify_ciphertext<E: Pairing>(tpk: &PublicKey<E>, tag: &Tag<E>, ct: &Ciphertext<E>) -> bool {
    let ut = tpk.u2 * tag.scalar();

    let valid = pairings_match::<E>(ct.c1, ut + tpk.w2, ct.c4, tpk.h2)
        && pairings_match::<E>(ct.c2, ut + tpk.z2, ct.c5, tpk.v2);

    if !valid {
        debug!(ciphertext = %ct.fingerprint(), "ciphertext failed tag verification");
    }

    valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ThresholdConfig, setup::setup, utils::tests::FailingRng};
    use ark_std::UniformRand;

    type E = ark_bls12_381::Bls12_381;
    type G1 = <E as Pairing>::G1;
    type Fr = <E as Pairing>::ScalarField;

    fn public_key() -> PublicKey<E> {
        let mut rng = ark_std::test_rng();
        let config = ThresholdConfig::new(5, 3).unwrap();
        setup::<E, _>(&config, &mut rng).unwrap().public_key
    }

    #[test]
    fn test_encryption_verifies() {
        let mut rng = ark_std::test_rng();
        let tpk = public_key();

        for tag_value in [0u64, 1, 8, u64::MAX] {
            let tag = Tag::<E>::from(tag_value);
            for _ in 0..3 {
                let message = G1::rand(&mut rng);
                let ct = encrypt(&tpk, &tag, message, &mut rng).unwrap();
                assert!(verify_ciphertext(&tpk, &tag, &ct));
            }
        }
    }

    #[test]
    fn test_wrong_tag_is_rejected() {
        let mut rng = ark_std::test_rng();
        let tpk = public_key();
        let tag = Tag::<E>::from(8);
        let ct = encrypt(&tpk, &tag, G1::rand(&mut rng), &mut rng).unwrap();

        assert!(!verify_ciphertext(&tpk, &Tag::from(9), &ct));
        assert!(!verify_ciphertext(&tpk, &Tag::from_bytes(b"other"), &ct));
    }

    #[test]
    fn test_tampered_ciphertext_is_rejected() {
        let mut rng = ark_std::test_rng();
        let tpk = public_key();
        let tag = Tag::<E>::from_bytes(b"escrow/2024");
        let ct = encrypt(&tpk, &tag, G1::rand(&mut rng), &mut rng).unwrap();

        let mut tampered = ct.clone();
        tampered.c1 += G1::rand(&mut rng);
        assert!(!verify_ciphertext(&tpk, &tag, &tampered));

        let mut tampered = ct;
        tampered.c5 = G1::rand(&mut rng);
        assert!(!verify_ciphertext(&tpk, &tag, &tampered));
    }

    #[test]
    fn test_encryption_is_deterministic_given_randomness() {
        let mut rng = ark_std::test_rng();
        let tpk = public_key();
        let tag = Tag::<E>::from(8);
        let message = G1::rand(&mut rng);
        let r1 = Fr::rand(&mut rng);
        let r2 = Fr::rand(&mut rng);

        let a = encrypt_with_randomness(&tpk, &tag, message, r1, r2);
        let b = encrypt_with_randomness(&tpk, &tag, message, r1, r2);
        assert_eq!(a, b);

        let c = encrypt(&tpk, &tag, message, &mut rng).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_encrypt_propagates_source_failure() {
        let mut rng = ark_std::test_rng();
        let tpk = public_key();
        let tag = Tag::<E>::from(8);

        assert!(matches!(
            encrypt(&tpk, &tag, G1::rand(&mut rng), &mut FailingRng),
            Err(TtbeError::RandomnessFailure(_))
        ));
    }

    #[test]
    fn test_ciphertext_serialization() {
        let mut rng = ark_std::test_rng();
        let tpk = public_key();
        let tag = Tag::<E>::from(8);
        let ct = encrypt(&tpk, &tag, G1::rand(&mut rng), &mut rng).unwrap();

        let mut ct_bytes = Vec::new();
        ct.serialize_compressed(&mut ct_bytes).unwrap();
        // five compressed BLS12-381 G1 points
        assert_eq!(ct_bytes.len(), 5 * 48);

        let decoded = Ciphertext::<E>::deserialize_compressed(&ct_bytes[..]).unwrap();
        assert_eq!(decoded, ct);
        assert!(verify_ciphertext(&tpk, &tag, &decoded));
    }
}
