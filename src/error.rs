//! Error taxonomy for the PDP library
//!
//! Everything fallible surfaces through [`Error`]; nothing is retried
//! internally. Proof verification is the one exception to the error
//! channel: a well-formed but invalid proof is a plain `false`, never
//! an `Err`.

use thiserror::Error;

/// Errors that can occur across the parameter, math and scheme layers.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed Type-A parameter file: bad line, unknown key, or an
    /// inconsistent parameter set.
    #[error("invalid parameter file: {0}")]
    ConfigParse(String),

    /// Malformed external string form. The first field names the object
    /// being restored, the second the offending part.
    #[error("failed to restore {0}: {1}")]
    Decode(&'static str, String),

    /// A deserialized point does not satisfy the curve equation.
    #[error("point is not on the curve")]
    OffCurve,

    /// The point at infinity where a finite point is required.
    #[error("unexpected point at infinity")]
    InfinitePoint,

    /// The system CSPRNG failed.
    #[error("random source: {0}")]
    Random(#[from] rand::Error),

    /// The scrypt key derivation failed.
    #[error("key derivation: {0}")]
    Kdf(String),

    /// The caller-provided data stream failed mid-digest.
    #[error("data stream: {0}")]
    Stream(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
