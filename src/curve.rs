//! The elliptic curve E(F_q): y² = x³ + x
//!
//! Points are a two-variant sum type; the point at infinity carries no
//! coordinates. Every construction from external data re-checks the
//! curve equation. The group is written additively here; the scheme
//! layer composes these operations into its multiplicative notation.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use num_bigint::BigUint;
use once_cell::sync::Lazy;
use rand::RngCore;

use crate::error::{Error, Result};
use crate::fp::{random_below, Field, FqElem, Q};
use crate::params;

static COFACTOR: Lazy<BigUint> = Lazy::new(|| params::parse_dec(params::COFACTOR_DEC));

static GENERATOR: Lazy<CurvePoint> = Lazy::new(|| {
    let data = BASE64
        .decode(params::GENERATOR_B64)
        .expect("generator literal is valid Base64");
    CurvePoint::from_bytes(&data).expect("generator lies on the curve")
});

/// A point of E(F_q), either at infinity or affine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CurvePoint {
    Infinity,
    Affine { x: FqElem, y: FqElem },
}

/// Right-hand side of the curve equation: x³ + x.
fn curve_rhs(x: &FqElem) -> FqElem {
    x.sqr().add(&FqElem::one()).mul(x)
}

impl CurvePoint {
    /// The fixed generator of the order-r subgroup.
    pub fn generator() -> &'static CurvePoint {
        &GENERATOR
    }

    /// The curve cofactor h = (q + 1) / r.
    pub fn cofactor() -> &'static BigUint {
        &COFACTOR
    }

    /// Builds a finite point, verifying the curve equation.
    pub fn from_affine(x: FqElem, y: FqElem) -> Result<Self> {
        let p = CurvePoint::Affine { x, y };
        if !p.is_on_curve() {
            return Err(Error::OffCurve);
        }
        Ok(p)
    }

    /// Parses the x‖y byte form; the empty string is the point at
    /// infinity.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(CurvePoint::Infinity);
        }
        let width = Q::byte_len();
        if data.len() != 2 * width {
            return Err(Error::Decode(
                "curve point",
                format!("expected {} bytes, got {}", 2 * width, data.len()),
            ));
        }
        Self::from_affine(
            FqElem::from_bytes(&data[..width]),
            FqElem::from_bytes(&data[width..]),
        )
    }

    /// Byte form x‖y; infinity serializes to the empty string.
    pub fn bytes(&self) -> Vec<u8> {
        match self {
            CurvePoint::Infinity => Vec::new(),
            CurvePoint::Affine { x, y } => {
                let mut out = x.bytes();
                out.extend_from_slice(&y.bytes());
                out
            }
        }
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, CurvePoint::Infinity)
    }

    pub fn is_on_curve(&self) -> bool {
        match self {
            CurvePoint::Infinity => true,
            CurvePoint::Affine { x, y } => y.sqr() == curve_rhs(x),
        }
    }

    /// Group addition by the chord rule, with all the coincidence
    /// cases: either operand at infinity, equal points (doubling),
    /// mutually inverse points.
    pub fn add(&self, rhs: &CurvePoint) -> CurvePoint {
        let (x1, y1) = match self {
            CurvePoint::Infinity => return rhs.clone(),
            CurvePoint::Affine { x, y } => (x, y),
        };
        let (x2, y2) = match rhs {
            CurvePoint::Infinity => return self.clone(),
            CurvePoint::Affine { x, y } => (x, y),
        };
        if x1 == x2 {
            if y1 == y2 {
                if y1.is_zero() {
                    return CurvePoint::Infinity;
                }
                return self.double();
            }
            // y1 = −y2, the chord is vertical
            return CurvePoint::Infinity;
        }
        let s = y2.sub(y1).mul(&x2.sub(x1).inv());
        let x3 = s.sqr().sub(x1).sub(x2);
        let y3 = x1.sub(&x3).mul(&s).sub(y1);
        CurvePoint::Affine { x: x3, y: y3 }
    }

    /// Tangent-rule doubling; points on the x-axis double to infinity.
    pub fn double(&self) -> CurvePoint {
        match self {
            CurvePoint::Infinity => CurvePoint::Infinity,
            CurvePoint::Affine { x, y } => {
                if y.is_zero() {
                    return CurvePoint::Infinity;
                }
                // s = (3x² + 1) / 2y
                let s = x
                    .sqr()
                    .mul_u64(3)
                    .add(&FqElem::one())
                    .mul(&y.mul_u64(2).inv());
                let x3 = s.sqr().sub(&x.mul_u64(2));
                let y3 = x.sub(&x3).mul(&s).sub(y);
                CurvePoint::Affine { x: x3, y: y3 }
            }
        }
    }

    pub fn neg(&self) -> CurvePoint {
        match self {
            CurvePoint::Infinity => CurvePoint::Infinity,
            CurvePoint::Affine { x, y } => CurvePoint::Affine {
                x: x.clone(),
                y: y.neg(),
            },
        }
    }

    /// Scalar multiplication, right-to-left double-and-add. A zero
    /// scalar yields the point at infinity.
    pub fn mul(&self, n: &BigUint) -> CurvePoint {
        let mut acc = CurvePoint::Infinity;
        let mut base = self.clone();
        for bit in 0..n.bits() {
            if n.bit(bit) {
                acc = acc.add(&base);
            }
            base = base.double();
        }
        acc
    }

    /// Deterministic map of arbitrary bytes onto the order-r subgroup:
    /// the candidate x comes from the field hash map, then x is stepped
    /// by x ← x² + 1 until x³ + x is a residue; the root is
    /// sign-normalized and the point is cleared by the cofactor.
    pub fn hash_to_point(hash: &[u8]) -> CurvePoint {
        let mut x = FqElem::from_hash(hash);
        let (x, y) = loop {
            let t = curve_rhs(&x);
            if t.is_square() {
                let mut y = t.sqrt().expect("residue has a root");
                if y.sign() < 0 {
                    y = y.neg();
                }
                break (x, y);
            }
            x = x.sqr().add(&FqElem::one());
        };
        CurvePoint::Affine { x, y }.mul(&COFACTOR)
    }

    /// A uniformly random subgroup point (a random multiple of the
    /// generator). CSPRNG failures are propagated.
    pub fn random<Rg: RngCore>(rng: &mut Rg) -> Result<CurvePoint> {
        let n = random_below(Q::modulus(), rng)?;
        Ok(Self::generator().mul(&n))
    }
}
