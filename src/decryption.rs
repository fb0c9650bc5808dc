use std::collections::BTreeSet;

use ark_ec::{pairing::Pairing, CurveGroup, VariableBaseMSM};
use ark_serialize::*;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::encryption::{verify_ciphertext, Ciphertext, Tag};
use crate::error::TtbeError;
use crate::security::pairings_match;
use crate::setup::{find_verification_key, PublicKey, SecretKeyShare, VerificationKeyShare};
use crate::shamir::lagrange_coefficient;

/// Partial decryption contributed by authority `index`.
#[derive(CanonicalSerialize, CanonicalDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuditClue<E: Pairing> {
    pub index: u64,
    /// u_i·C1
    pub ac1: E::G1,
    /// v_i·C2
    pub ac2: E::G1,
}

/// Helper function to compute MSM over G1 group elements.
///
/// # Errors
/// Returns an error if MSM computation fails
fn compute_msm_g1<E: Pairing>(
    bases: &[E::G1],
    scalars: &[E::ScalarField],
    operation_name: &str,
) -> Result<E::G1, TtbeError> {
    let bases = E::G1::normalize_batch(bases);
    E::G1::msm(&bases, scalars).map_err(|e| {
        TtbeError::InvalidParameter(format!("MSM failed in {}: {:?}", operation_name, e))
    })
}

fn ensure_ciphertext_valid<E: Pairing>(
    tpk: &PublicKey<E>,
    tag: &Tag<E>,
    ct: &Ciphertext<E>,
) -> Result<(), TtbeError> {
    if verify_ciphertext(tpk, tag, ct) {
        Ok(())
    } else {
        Err(TtbeError::CiphertextInvalid)
    }
}

/// Computes the audit clue of authority `tsk.index()` for a ciphertext.
///
/// # Errors
/// Returns `InvalidIndex` if the key share's index is outside `1..=n` and
/// `CiphertextInvalid` if the ciphertext does not verify for `tag`.
pub fn share_decrypt<E: Pairing>(
    tpk: &PublicKey<E>,
    tsk: &SecretKeyShare<E>,
    tag: &Tag<E>,
    ct: &Ciphertext<E>,
) -> Result<AuditClue<E>, TtbeError> {
    if !tpk.config.contains_index(tsk.index()) {
        return Err(TtbeError::InvalidIndex(tsk.index()));
    }
    ensure_ciphertext_valid(tpk, tag, ct)?;

    Ok(AuditClue {
        index: tsk.index(),
        ac1: ct.c1 * *tsk.u(),
        ac2: ct.c2 * *tsk.v(),
    })
}

fn clue_matches_key<E: Pairing>(
    tpk: &PublicKey<E>,
    tvk: &VerificationKeyShare<E>,
    ct: &Ciphertext<E>,
    clue: &AuditClue<E>,
) -> bool {
    clue.index == tvk.index
        && pairings_match::<E>(clue.ac1, tpk.h2, ct.c1, tvk.u)
        && pairings_match::<E>(clue.ac2, tpk.v2, ct.c2, tvk.v)
}

/// Checks that `clue` was honestly computed by the holder of the secret key
/// share behind `tvk`.
///
/// Returns false if the ciphertext does not verify for `tag`, if the clue and
/// key indices differ, or if either of e(AC1, H2) == e(C1, TVK.U) and
/// e(AC2, V2) == e(C2, TVK.V) fails.
pub fn verify_clue<E: Pairing>(
    tpk: &PublicKey<E>,
    tvk: &VerificationKeyShare<E>,
    tag: &Tag<E>,
    ct: &Ciphertext<E>,
    clue: &AuditClue<E>,
) -> bool {
    if !verify_ciphertext(tpk, tag, ct) {
        return false;
    }

    let valid = clue_matches_key(tpk, tvk, ct, clue);
    if !valid {
        debug!(
            index = clue.index,
            ciphertext = %ct.fingerprint(),
            "audit clue failed verification"
        );
    }

    valid
}

/// Interpolates u·C1 + v·C2 = (r1 + r2)·U1 in the exponent and strips it
/// from C3.
fn unmask<E: Pairing>(
    tpk: &PublicKey<E>,
    clues: &[AuditClue<E>],
    ct: &Ciphertext<E>,
) -> Result<E::G1, TtbeError> {
    let mut seen = BTreeSet::new();
    for clue in clues {
        if !tpk.config.contains_index(clue.index) {
            return Err(TtbeError::InvalidIndex(clue.index));
        }
        if !seen.insert(clue.index) {
            return Err(TtbeError::DuplicateIndex(clue.index));
        }
    }

    if clues.len() < tpk.t() {
        return Err(TtbeError::InsufficientClues {
            required: tpk.t(),
            provided: clues.len(),
        });
    }

    let xs: Vec<E::ScalarField> = clues
        .iter()
        .map(|clue| E::ScalarField::from(clue.index))
        .collect();
    let lambdas = xs
        .iter()
        .map(|x| lagrange_coefficient(x, &xs))
        .collect::<Result<Vec<_>, _>>()?;

    // one MSM over [AC1_k..., AC2_k...] with weights [λ_k..., λ_k...]
    let mut bases = Vec::with_capacity(2 * clues.len());
    bases.extend(clues.iter().map(|clue| clue.ac1));
    bases.extend(clues.iter().map(|clue| clue.ac2));
    let mut scalars = lambdas.clone();
    scalars.extend_from_slice(&lambdas);

    let mask = compute_msm_g1::<E>(&bases, &scalars, "mask interpolation")?;

    Ok(ct.c3 - mask)
}

/// Recovers the message from at least t audit clues with distinct indices.
///
/// The clues are expected to have passed `verify_clue`; use
/// `combine_verified` to have them checked here.
///
/// # Errors
/// Returns `CiphertextInvalid` if the ciphertext does not verify for `tag`,
/// `InvalidIndex`/`DuplicateIndex` for out-of-range or repeated clue indices,
/// and `InsufficientClues` if fewer than t clues are supplied.
pub fn combine<E: Pairing>(
    tpk: &PublicKey<E>,
    clues: &[AuditClue<E>],
    tag: &Tag<E>,
    ct: &Ciphertext<E>,
) -> Result<E::G1, TtbeError> {
    ensure_ciphertext_valid(tpk, tag, ct)?;

    let message = unmask(tpk, clues, ct)?;
    debug!(
        clues = clues.len(),
        ciphertext = %ct.fingerprint(),
        "combined audit clues"
    );

    Ok(message)
}

/// Verifies every clue against its authority's verification key, then
/// recovers the message.
///
/// # Errors
/// In addition to the errors of `combine`, returns `InvalidIndex` if no
/// verification key is published for a clue's index and `ClueInvalid(i)`
/// naming an authority whose clue does not verify.
pub fn combine_verified<E: Pairing>(
    tpk: &PublicKey<E>,
    tvks: &[VerificationKeyShare<E>],
    clues: &[AuditClue<E>],
    tag: &Tag<E>,
    ct: &Ciphertext<E>,
) -> Result<E::G1, TtbeError> {
    ensure_ciphertext_valid(tpk, tag, ct)?;

    clues.par_iter().try_for_each(|clue| -> Result<(), TtbeError> {
        let tvk = find_verification_key(tvks, clue.index)
            .ok_or(TtbeError::InvalidIndex(clue.index))?;
        if clue_matches_key(tpk, tvk, ct, clue) {
            Ok(())
        } else {
            warn!(index = clue.index, "rejecting invalid audit clue");
            Err(TtbeError::ClueInvalid(clue.index))
        }
    })?;

    unmask(tpk, clues, ct)
}
