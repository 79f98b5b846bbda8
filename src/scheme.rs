//! The PDP scheme: key derivation, tagging, challenge, proof, verify
//!
//! A verifier derives a secret scalar x, publishes (v = g^x, u, e =
//! ê(u, v)), and tags each data block. Audits are a single round trip:
//! the verifier sends (idx, ν), the custodian answers (μ, σ, R), and a
//! pairing equation settles it. Data never travels — both tag and proof
//! digest the block through a stream.
//!
//! String forms are standard Base64 of the component byte forms, joined
//! by commas, as produced by [`PublicParams::marshal`] and friends.

use std::io::{self, Read};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::curve::CurvePoint;
use crate::error::{Error, Result};
use crate::fp::{Field, FrElem, R};
use crate::fp2::Fq2Elem;
use crate::pairing::pairing;

const SCRYPT_LOG_N: u8 = 15; // N = 32768
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;
const SCRYPT_LEN: usize = 32;
const SALT_LEN: usize = 8;

/// The verifier's secret: a single scalar x ∈ F_r.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivateParams {
    x: FrElem,
}

/// Public audit material (v = g^x, u, e = ê(u, v)). Several
/// `PublicParams` may correspond to the same `PrivateParams`, one per
/// choice of u.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicParams {
    v: CurvePoint,
    u: CurvePoint,
    e: Fq2Elem,
}

/// Per-block authenticator: a single curve point.
pub type Tag = CurvePoint;

/// An audit challenge: the block index and a fresh scalar ν.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chal {
    idx: Vec<u8>,
    nu: FrElem,
}

/// The custodian's answer (μ, σ, R).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    mu: FrElem,
    sigma: CurvePoint,
    r: Fq2Elem,
}

/// Stretches a caller secret into a field scalar: scrypt under a fresh
/// salt, then the hash-to-scalar map. The salt is deliberately not
/// retained — the derived scalar itself is the persistent identity.
pub(crate) fn derive_secret_scalar(secret: &[u8]) -> Result<FrElem> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.try_fill_bytes(&mut salt)?;

    let params = scrypt::Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, SCRYPT_LEN)
        .map_err(|e| Error::Kdf(e.to_string()))?;
    let mut key = [0u8; SCRYPT_LEN];
    scrypt::scrypt(secret, &salt, &params, &mut key).map_err(|e| Error::Kdf(e.to_string()))?;

    Ok(FrElem::from_hash(&key))
}

/// Consumes the data stream into a SHA-256 digest and reduces it into
/// F_r.
fn digest_to_scalar<Rd: Read>(data: &mut Rd) -> Result<FrElem> {
    let mut hasher = Sha256::new();
    io::copy(data, &mut hasher)?;
    Ok(FrElem::from_hash(&hasher.finalize()))
}

/// γ = hash-to-scalar of R's byte form; binds μ to the commitment R.
fn gamma_of(r: &Fq2Elem) -> FrElem {
    FrElem::from_hash(&Sha256::digest(r.bytes()))
}

/// Derives fresh private parameters from a caller secret.
pub fn generate_private_params(secret: &[u8]) -> Result<PrivateParams> {
    Ok(PrivateParams {
        x: derive_secret_scalar(secret)?,
    })
}

impl PrivateParams {
    /// Builds the public counterpart for a caller-chosen point u.
    /// The point at infinity is a misuse and is rejected.
    pub fn generate_public_params(&self, u: CurvePoint) -> Result<PublicParams> {
        if u.is_infinity() {
            return Err(Error::InfinitePoint);
        }
        let v = CurvePoint::generator().mul(self.x.value());
        let e = pairing(&u, &v);
        Ok(PublicParams { v, u, e })
    }

    pub fn marshal(&self) -> String {
        BASE64.encode(self.x.bytes())
    }

    pub fn parse(s: &str) -> Result<Self> {
        Ok(PrivateParams {
            x: scalar_from_part("private params", s)?,
        })
    }
}

impl PublicParams {
    pub fn marshal(&self) -> String {
        format!(
            "{},{},{}",
            BASE64.encode(self.v.bytes()),
            BASE64.encode(self.u.bytes()),
            BASE64.encode(self.e.bytes())
        )
    }

    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return Err(Error::Decode("public params", "unmatched part count".into()));
        }
        let v = CurvePoint::from_bytes(&decode_part("public params", parts[0])?)?;
        let u = CurvePoint::from_bytes(&decode_part("public params", parts[1])?)?;
        if u.is_infinity() {
            return Err(Error::InfinitePoint);
        }
        let e = Fq2Elem::from_bytes(&decode_part("public params", parts[2])?)?;
        Ok(PublicParams { v, u, e })
    }
}

/// Tags one data block under the given key pair. `idx` is an opaque
/// block identifier; `data` is streamed, never held in memory.
pub fn gen_tag<Rd: Read>(
    sp: &PrivateParams,
    pp: &PublicParams,
    idx: &[u8],
    data: &mut Rd,
) -> Result<Tag> {
    let m = digest_to_scalar(data)?;
    // σ = (H(idx) · u^m)^x
    let t = CurvePoint::hash_to_point(idx).add(&pp.u.mul(m.value()));
    Ok(t.mul(sp.x.value()))
}

/// Issues a challenge for `idx` with a fresh random ν.
pub fn gen_chal(idx: &[u8]) -> Result<Chal> {
    Ok(Chal {
        idx: idx.to_vec(),
        nu: FrElem::random(&mut OsRng)?,
    })
}

/// Deterministic challenge variant: ν is derived from `seed` through
/// the hash-to-scalar map. Equal inputs give equal challenges.
pub fn gen_chal_with_seed(idx: &[u8], seed: &[u8]) -> Chal {
    Chal {
        idx: idx.to_vec(),
        nu: FrElem::from_hash(seed),
    }
}

impl Chal {
    pub fn marshal(&self) -> String {
        format!(
            "{},{}",
            BASE64.encode(&self.idx),
            BASE64.encode(self.nu.bytes())
        )
    }

    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return Err(Error::Decode("challenge", "unmatched part count".into()));
        }
        Ok(Chal {
            idx: decode_part("challenge", parts[0])?,
            nu: scalar_from_part("challenge", parts[1])?,
        })
    }

    /// The challenged block index.
    pub fn idx(&self) -> &[u8] {
        &self.idx
    }
}

/// Answers a challenge from the tag and the locally stored data.
/// Each call draws a fresh blinding scalar ρ.
pub fn prove<Rd: Read>(pp: &PublicParams, chal: &Chal, tag: &Tag, data: &mut Rd) -> Result<Proof> {
    let rho = FrElem::random(&mut OsRng)?;
    let r = pp.e.pow(rho.value());

    let m = digest_to_scalar(data)?;
    let gamma = gamma_of(&r);
    // μ = ρ + γ·ν·m
    let mu = chal.nu.mul(&m).mul(&gamma).add(&rho);
    // σ = tag^ν
    let sigma = tag.mul(chal.nu.value());

    Ok(Proof { mu, sigma, r })
}

/// Checks R · ê(σ^γ, g) == ê(H(idx)^{ν·γ} · u^μ, v). A malformed proof
/// never reaches this point (parsing rejects it); a well-formed but
/// wrong proof simply returns `false`.
pub fn verify_proof(pp: &PublicParams, chal: &Chal, proof: &Proof) -> bool {
    let gamma = gamma_of(&proof.r);

    let sigma_gamma = proof.sigma.mul(gamma.value());
    let lhs = proof.r.mul(&pairing(&sigma_gamma, CurvePoint::generator()));

    let hashed = CurvePoint::hash_to_point(&chal.idx)
        .mul(chal.nu.value())
        .mul(gamma.value());
    let rhs_point = hashed.add(&pp.u.mul(proof.mu.value()));
    let rhs = pairing(&rhs_point, &pp.v);

    lhs == rhs
}

impl Proof {
    pub fn marshal(&self) -> String {
        format!(
            "{},{},{}",
            BASE64.encode(self.mu.bytes()),
            BASE64.encode(self.sigma.bytes()),
            BASE64.encode(self.r.bytes())
        )
    }

    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return Err(Error::Decode("proof", "unmatched part count".into()));
        }
        Ok(Proof {
            mu: scalar_from_part("proof", parts[0])?,
            sigma: CurvePoint::from_bytes(&decode_part("proof", parts[1])?)?,
            r: Fq2Elem::from_bytes(&decode_part("proof", parts[2])?)?,
        })
    }
}

/// Serializes a tag (a single curve point).
pub fn marshal_tag(tag: &Tag) -> String {
    BASE64.encode(tag.bytes())
}

/// Restores a tag, re-validating the curve equation.
pub fn parse_tag(s: &str) -> Result<Tag> {
    CurvePoint::from_bytes(&decode_part("tag", s)?)
}

fn decode_part(object: &'static str, part: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(part)
        .map_err(|e| Error::Decode(object, e.to_string()))
}

fn scalar_from_part(object: &'static str, part: &str) -> Result<FrElem> {
    let data = decode_part(object, part)?;
    let width = R::byte_len();
    if data.len() != width {
        return Err(Error::Decode(
            object,
            format!("scalar must be {} bytes, got {}", width, data.len()),
        ));
    }
    Ok(FrElem::from_bytes(&data))
}
