//! Traceable Threshold Broadcast Encryption
//!
//! This library implements a pairing-based threshold encryption scheme with
//! public auditability: decryption authority is Shamir-shared among `n`
//! authorities, any `t` of them can recover a message, every ciphertext is
//! publicly verifiable against its tag, and every partial decryption (audit
//! clue) is publicly verifiable against the contributing authority's
//! verification key.
//!
//! ## Key Components
//!
//! - **Setup**: Generate the public key, `n` secret key shares and `n` verification key shares
//! - **Encryption**: Encrypt a G1 message under a tag
//! - **Share Decryption**: Each authority checks the ciphertext and produces an audit clue
//! - **Combination**: Interpolate `t` verified clues in the exponent to recover the message
//!
//! ## Example
//!
//! ```rust,no_run
//! use ark_std::UniformRand;
//! use ttbe::{
//!     config::ThresholdConfig,
//!     decryption::{combine, share_decrypt, verify_clue},
//!     encryption::{encrypt, verify_ciphertext, Tag},
//!     setup::setup,
//! };
//!
//! type E = ark_bls12_381::Bls12_381;
//! type G1 = <E as ark_ec::pairing::Pairing>::G1;
//!
//! let mut rng = ark_std::test_rng();
//! let config = ThresholdConfig::new(5, 3).unwrap();
//! let keys = setup::<E, _>(&config, &mut rng).unwrap();
//! let tpk = &keys.public_key;
//!
//! // Encryption
//! let tag = Tag::<E>::from(8);
//! let message = G1::rand(&mut rng);
//! let ct = encrypt(tpk, &tag, message, &mut rng).unwrap();
//! assert!(verify_ciphertext(tpk, &tag, &ct));
//!
//! // Share decryption by authorities 1, 3 and 5
//! let mut clues = Vec::new();
//! for i in [0, 2, 4] {
//!     let clue = share_decrypt(tpk, &keys.secret_keys[i], &tag, &ct).unwrap();
//!     assert!(verify_clue(tpk, &keys.verification_keys[i], &tag, &ct, &clue));
//!     clues.push(clue);
//! }
//!
//! let recovered = combine(tpk, &clues, &tag, &ct).unwrap();
//! assert_eq!(recovered, message);
//! ```

pub mod config;
pub mod decryption;
pub mod encryption;
pub mod error;
pub mod security;
pub mod setup;
pub mod shamir;
pub mod utils;

pub use error::TtbeError;

#[cfg(test)]
pub(crate) fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    });
}
