//! The quadratic extension F_{q²}
//!
//! Elements are pairs (x, y) over F_q representing x + y·i with
//! i² = −1; this is the target group of the pairing. Multiplication is
//! Karatsuba over the two components, inversion goes through the norm
//! x² + y².

use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::fp::{Field, FqElem, Q};

/// An element of F_{q²}.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fq2Elem {
    pub(crate) x: FqElem,
    pub(crate) y: FqElem,
}

impl Fq2Elem {
    pub fn new(x: FqElem, y: FqElem) -> Self {
        Fq2Elem { x, y }
    }

    /// The multiplicative identity (1, 0).
    pub fn one() -> Self {
        Fq2Elem {
            x: FqElem::one(),
            y: FqElem::zero(),
        }
    }

    /// Real component.
    pub fn re(&self) -> &FqElem {
        &self.x
    }

    /// Imaginary component.
    pub fn im(&self) -> &FqElem {
        &self.y
    }

    /// (x, −y); for unitary elements this is also the inverse.
    pub fn conjugate(&self) -> Self {
        Fq2Elem {
            x: self.x.clone(),
            y: self.y.neg(),
        }
    }

    /// Karatsuba product: three F_q multiplications instead of four.
    pub fn mul(&self, rhs: &Self) -> Self {
        let a = self.x.mul(&rhs.x);
        let b = self.y.mul(&rhs.y);
        let cross = self.x.add(&self.y).mul(&rhs.x.add(&rhs.y));
        Fq2Elem {
            x: a.sub(&b),
            y: cross.sub(&a).sub(&b),
        }
    }

    /// (x+y)(x−y) + 2xy·i.
    pub fn sqr(&self) -> Self {
        let re = self.x.add(&self.y).mul(&self.x.sub(&self.y));
        let im = self.x.mul(&self.y).mul_u64(2);
        Fq2Elem { x: re, y: im }
    }

    /// Inverse through the norm: (x − y·i) / (x² + y²).
    pub fn inv(&self) -> Self {
        let norm_inv = self.x.sqr().add(&self.y.sqr()).inv();
        Fq2Elem {
            x: self.x.mul(&norm_inv),
            y: self.y.mul(&norm_inv.neg()),
        }
    }

    /// Binary-ladder exponentiation.
    pub fn pow(&self, e: &BigUint) -> Self {
        let mut res = Fq2Elem::one();
        let mut base = self.clone();
        let mut bit = 0u64;
        let bits = e.bits();
        while bit < bits {
            if e.bit(bit) {
                res = res.mul(&base);
            }
            base = base.sqr();
            bit += 1;
        }
        res
    }

    pub fn is_one(&self) -> bool {
        self.x == FqElem::one() && self.y.is_zero()
    }

    pub fn is_zero(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    /// Byte form: x‖y, each component left-padded to the F_q width.
    pub fn bytes(&self) -> Vec<u8> {
        let mut out = self.x.bytes();
        out.extend_from_slice(&self.y.bytes());
        out
    }

    /// Parses the x‖y byte form; the length must be exactly two F_q
    /// components.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let width = Q::byte_len();
        if data.len() != 2 * width {
            return Err(Error::Decode(
                "quadratic element",
                format!("expected {} bytes, got {}", 2 * width, data.len()),
            ));
        }
        Ok(Fq2Elem {
            x: FqElem::from_bytes(&data[..width]),
            y: FqElem::from_bytes(&data[width..]),
        })
    }
}
