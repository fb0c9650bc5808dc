use ark_ec::{pairing::Pairing, PrimeGroup};
use ark_serialize::*;
use ark_std::{rand::RngCore, Zero};
use rayon::prelude::*;
use tracing::{debug, warn};
use zeroize::Zeroize;

use crate::config::ThresholdConfig;
use crate::error::TtbeError;
use crate::security::pairings_match;
use crate::shamir::{generate_random_polynomial, generate_shares};
use crate::utils::{inv_mod, random_scalar};

/// How many times `setup` redraws its secrets after hitting a zero scalar
/// before giving up on the random source.
pub const MAX_SETUP_ATTEMPTS: usize = 8;

/// Public parameters of the scheme (TPK).
///
/// Every G1 element has a G2 mirror with the same discrete log relative to
/// the respective generator: U = u·H, V = v⁻¹·U, W = w·H, Z = z·V.
#[derive(CanonicalSerialize, CanonicalDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PublicKey<E: Pairing> {
    /// Number of authorities and decryption threshold
    pub config: ThresholdConfig,
    pub h1: E::G1,
    pub u1: E::G1,
    pub v1: E::G1,
    pub w1: E::G1,
    pub z1: E::G1,
    pub h2: E::G2,
    pub u2: E::G2,
    pub v2: E::G2,
    pub w2: E::G2,
    pub z2: E::G2,
}

/// Secret key share of authority `index` (TSK_i).
///
/// Holds the `index`-th Shamir shares of the master scalars u and v.
/// Zeroized on drop; never printed.
#[derive(CanonicalSerialize, CanonicalDeserialize, Clone)]
pub struct SecretKeyShare<E: Pairing> {
    index: u64,
    u: E::ScalarField,
    v: E::ScalarField,
}

/// Public verification key of authority `index` (TVK_i): `u = u_i·H2`,
/// `v = v_i·V2`.
#[derive(CanonicalSerialize, CanonicalDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct VerificationKeyShare<E: Pairing> {
    pub index: u64,
    pub u: E::G2,
    pub v: E::G2,
}

/// Everything produced by a single `setup` run.
#[derive(Clone, Debug)]
pub struct KeyMaterial<E: Pairing> {
    pub public_key: PublicKey<E>,
    /// Secret key shares, ordered by index 1..=n
    pub secret_keys: Vec<SecretKeyShare<E>>,
    /// Verification key shares, ordered by index 1..=n
    pub verification_keys: Vec<VerificationKeyShare<E>>,
}

impl<E: Pairing> PublicKey<E> {
    pub fn n(&self) -> usize {
        self.config.n()
    }

    pub fn t(&self) -> usize {
        self.config.t()
    }

    /// Checks that each G1 element and its G2 mirror carry the same exponent
    /// and that the base H is not the identity.
    ///
    /// Uses e(X1, H2) == e(H1, X2) for X in {U, V, W, Z}, and
    /// e(H1, g2) == e(g1, H2) for H itself.
    pub fn is_well_formed(&self) -> bool {
        if self.h1.is_zero() || self.h2.is_zero() {
            return false;
        }

        pairings_match::<E>(self.h1, E::G2::generator(), E::G1::generator(), self.h2)
            && pairings_match::<E>(self.u1, self.h2, self.h1, self.u2)
            && pairings_match::<E>(self.v1, self.h2, self.h1, self.v2)
            && pairings_match::<E>(self.w1, self.h2, self.h1, self.w2)
            && pairings_match::<E>(self.z1, self.h2, self.h1, self.z2)
    }
}

impl<E: Pairing> SecretKeyShare<E> {
    /// Creates a key share from its Shamir shares of u and v.
    pub fn new(index: u64, u: E::ScalarField, v: E::ScalarField) -> Self {
        SecretKeyShare { index, u, v }
    }

    /// The authority index (1-indexed)
    pub fn index(&self) -> u64 {
        self.index
    }

    pub(crate) fn u(&self) -> &E::ScalarField {
        &self.u
    }

    pub(crate) fn v(&self) -> &E::ScalarField {
        &self.v
    }

    /// Recomputes the verification key matching this share, letting an
    /// authority check the key published for it.
    pub fn verification_key(&self, tpk: &PublicKey<E>) -> VerificationKeyShare<E> {
        VerificationKeyShare {
            index: self.index,
            u: tpk.h2 * self.u,
            v: tpk.v2 * self.v,
        }
    }
}

impl<E: Pairing> Zeroize for SecretKeyShare<E> {
    fn zeroize(&mut self) {
        self.u.zeroize();
        self.v.zeroize();
    }
}

impl<E: Pairing> Drop for SecretKeyShare<E> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

// Prevent debug output from leaking the key shares
impl<E: Pairing> std::fmt::Debug for SecretKeyShare<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKeyShare")
            .field("index", &self.index)
            .field("u", &"[REDACTED]")
            .field("v", &"[REDACTED]")
            .finish()
    }
}

/// Finds the verification key published for authority `index`.
pub fn find_verification_key<E: Pairing>(
    tvks: &[VerificationKeyShare<E>],
    index: u64,
) -> Option<&VerificationKeyShare<E>> {
    tvks.iter().find(|tvk| tvk.index == index)
}

/// Generates the public key together with one secret key share and one
/// verification key share per authority.
///
/// A zero draw for h, u or v makes the scheme degenerate (v must be
/// invertible, and h = 0 or u = 0 removes the masking); the secrets are then
/// redrawn, up to `MAX_SETUP_ATTEMPTS` times.
///
/// # Arguments
/// * `config` - Number of authorities and threshold
/// * `rng` - A random number generator (must be cryptographically secure outside tests)
///
/// # Errors
/// Returns `RandomnessFailure` if the random source fails or keeps producing
/// degenerate secrets.
pub fn setup<E: Pairing, R: RngCore>(
    config: &ThresholdConfig,
    rng: &mut R,
) -> Result<KeyMaterial<E>, TtbeError> {
    for attempt in 1..=MAX_SETUP_ATTEMPTS {
        match try_setup::<E, R>(config, rng) {
            Err(TtbeError::DegenerateSecret) => {
                warn!(attempt, "setup drew a degenerate secret, retrying");
            }
            result => return result,
        }
    }

    Err(TtbeError::RandomnessFailure(format!(
        "setup drew a degenerate secret {} times in a row",
        MAX_SETUP_ATTEMPTS
    )))
}

fn try_setup<E: Pairing, R: RngCore>(
    config: &ThresholdConfig,
    rng: &mut R,
) -> Result<KeyMaterial<E>, TtbeError> {
    let mut h: E::ScalarField = random_scalar(rng)?;
    let mut w: E::ScalarField = random_scalar(rng)?;
    let mut z: E::ScalarField = random_scalar(rng)?;
    // u and v are the Shamir secrets behind the key shares (u_i, v_i)
    let mut u: E::ScalarField = random_scalar(rng)?;
    let mut v: E::ScalarField = random_scalar(rng)?;

    if h.is_zero() || u.is_zero() || v.is_zero() {
        return Err(TtbeError::DegenerateSecret);
    }

    let poly_u = generate_random_polynomial(config.t(), u, rng)?;
    let poly_v = generate_random_polynomial(config.t(), v, rng)?;
    let mut u_shares = generate_shares(&poly_u, config.n());
    let mut v_shares = generate_shares(&poly_v, config.n());

    let g1 = E::G1::generator();
    let g2 = E::G2::generator();
    let mut v_inv = inv_mod(&v)?;

    let h1 = g1 * h;
    let h2 = g2 * h;
    let u1 = h1 * u;
    let u2 = h2 * u;
    let v1 = u1 * v_inv;
    let v2 = u2 * v_inv;
    let w1 = h1 * w;
    let w2 = h2 * w;
    let z1 = v1 * z;
    let z2 = v2 * z;

    let (secret_keys, verification_keys): (Vec<_>, Vec<_>) = u_shares
        .par_iter()
        .zip(v_shares.par_iter())
        .enumerate()
        .map(|(i, (u_share, v_share))| {
            let index = i as u64 + 1;
            let tsk = SecretKeyShare::<E>::new(index, u_share.y, v_share.y);
            let tvk = VerificationKeyShare {
                index,
                u: h2 * u_share.y,
                v: v2 * v_share.y,
            };
            (tsk, tvk)
        })
        .unzip();

    u_shares.zeroize();
    v_shares.zeroize();
    for secret in [&mut h, &mut w, &mut z, &mut u, &mut v, &mut v_inv] {
        secret.zeroize();
    }

    debug!(n = config.n(), t = config.t(), "generated threshold key material");

    Ok(KeyMaterial {
        public_key: PublicKey {
            config: *config,
            h1,
            u1,
            v1,
            w1,
            z1,
            h2,
            u2,
            v2,
            w2,
            z2,
        },
        secret_keys,
        verification_keys,
    })
}
