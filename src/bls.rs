//! Short signatures over the same pairing
//!
//! A BLS-style sibling of the PDP scheme, sharing its key derivation
//! and primitives: the secret scalar signs by exponentiating a hashed
//! point, verification compares two pairings.

use crate::curve::CurvePoint;
use crate::error::Result;
use crate::fp::FrElem;
use crate::pairing::pairing;
use crate::scheme::derive_secret_scalar;

/// A signature is a single curve point.
pub type Signature = CurvePoint;

/// Verification key: g^x.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignPubKey {
    key: CurvePoint,
}

/// Signing key with its public counterpart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignPrivKey {
    key: FrElem,
    pk: SignPubKey,
}

/// Derives a signing key pair from a caller secret (scrypt + hash-to-
/// scalar, same path as the PDP private parameters).
pub fn generate_sign_priv_key(secret: &[u8]) -> Result<SignPrivKey> {
    let key = derive_secret_scalar(secret)?;
    let pk = SignPubKey {
        key: CurvePoint::generator().mul(key.value()),
    };
    Ok(SignPrivKey { key, pk })
}

impl SignPrivKey {
    /// σ = H(h)^x over the message digest `h`.
    pub fn sign(&self, h: &[u8]) -> Signature {
        CurvePoint::hash_to_point(h).mul(self.key.value())
    }

    pub fn public(&self) -> &SignPubKey {
        &self.pk
    }
}

/// Accepts iff ê(σ, g) == ê(H(h), pk).
pub fn verify_signature(sig: &Signature, h: &[u8], pk: &SignPubKey) -> bool {
    let lhs = pairing(sig, CurvePoint::generator());
    let rhs = pairing(&CurvePoint::hash_to_point(h), &pk.key);
    lhs == rhs
}
