//! Error types for the traceable threshold broadcast encryption library

#[derive(Debug, thiserror::Error)]
pub enum TtbeError {
    /// The ciphertext does not satisfy the pairing checks for the given tag
    #[error("ciphertext is not well-formed for the given tag")]
    CiphertextInvalid,

    /// Fewer distinct-index clues than the threshold were supplied
    #[error("insufficient audit clues: required {required}, provided {provided}")]
    InsufficientClues { required: usize, provided: usize },

    /// The secure random source could not produce a value
    #[error("randomness failure: {0}")]
    RandomnessFailure(String),

    /// Setup drew a zero scalar where an invertible one is required
    #[error("degenerate secret: drawn scalar is zero")]
    DegenerateSecret,

    /// Two shares or clues carry the same index
    #[error("duplicate index {0}")]
    DuplicateIndex(u64),

    /// Interpolation points are not pairwise distinct
    #[error("interpolation points are not pairwise distinct")]
    DuplicatePoint,

    /// Index is zero or outside the configured authority range
    #[error("invalid index {0}")]
    InvalidIndex(u64),

    /// Modular inverse of zero was requested
    #[error("element is not invertible")]
    NotInvertible,

    /// Invalid parameter provided (e.g., threshold larger than the number of parties)
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An audit clue failed verification against its authority's verification key
    #[error("audit clue from authority {0} failed verification")]
    ClueInvalid(u64),
}
