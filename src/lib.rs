//! Provable Data Possession over a Type-A symmetric pairing
//!
//! This crate lets a verifier check that a remote custodian still holds
//! an unaltered data object without downloading it. The construction is
//! the Shacham–Waters homomorphic-authenticator audit:
//!
//! 1. The verifier derives a secret scalar x, publishes
//!    (v = g^x, u, e = ê(u, v)), and tags each block as
//!    σ = (H(idx) · u^{H2(data)})^x.
//! 2. Per audit, the verifier sends a challenge (idx, ν).
//! 3. The custodian blinds with a fresh ρ and answers
//!    (μ = ρ + γ·ν·H2(data), σ^ν, R = e^ρ) where γ = H3(R).
//! 4. The verifier accepts iff R · ê(σ^γ, g) = ê(H(idx)^{νγ} · u^μ, v).
//!
//! Architecture, leaves first:
//! - [`fp`]: the prime fields F_q and F_r (distinct types)
//! - [`fp2`]: the quadratic extension F_{q²}, the pairing target
//! - [`curve`]: E(F_q): y² = x³ + x, with hash-to-point
//! - [`pairing`]: Miller loop + Tate exponentiation
//! - [`scheme`]: the PDP operations and their wire forms
//! - [`bls`]: a short-signature sibling on the same primitives
//! - [`params`]: the fixed Type-A parameter set and its file format

pub mod bls;
pub mod curve;
pub mod error;
pub mod fp;
pub mod fp2;
pub mod pairing;
pub mod params;
pub mod scheme;

// Re-exports - Public API
pub use bls::{generate_sign_priv_key, verify_signature, SignPrivKey, SignPubKey, Signature};
pub use curve::CurvePoint;
pub use error::{Error, Result};
pub use fp::{FqElem, FrElem};
pub use fp2::Fq2Elem;
pub use pairing::pairing;
pub use params::TypeAParams;
pub use scheme::{
    gen_chal, gen_chal_with_seed, gen_tag, generate_private_params, marshal_tag, parse_tag, prove,
    verify_proof, Chal, PrivateParams, Proof, PublicParams, Tag,
};
